//! Strategy traits that teach the parser a new element.
//!
//! Block strategies claim whole blocks with [`BlockParseFactory::can_parse`].
//! Inline strategies report the ranges they would like with
//! [`InlinerParseFactory::outline_ranges`]; the parser resolves overlaps and
//! then asks the owner of each surviving range for its parse data.

use std::any::Any;
use std::sync::LazyLock;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use bitran_core::{Dom, ElementMeta, ElementNode, GroupKind, NodeId, ParseData};
use regex::{Captures, Regex};
use serde_yaml::Value;

use super::options::ParseState;
use super::parser::Parser;
use crate::error::ParseError;
use crate::range::Range;
use crate::utils::{
    str::{dedent, split_first_line},
    yaml::parse_yaml,
};

static EMPTY_META: LazyLock<ElementMeta> = LazyLock::new(ElementMeta::new);

#[async_trait]
pub trait BlockParseFactory: Send + Sync {
    /// Whether this element claims the block. `str_block` has its meta
    /// already detached.
    fn can_parse(&self, str_block: &str) -> bool;

    /// Builds the element's parse data. An error turns the block into an
    /// error node that keeps the raw text.
    async fn create_parse_data(
        &self,
        cx: &mut ParseCx<'_>,
        str_block: &str,
    ) -> anyhow::Result<ParseData>;

    /// Rewrites the generated id before it is made unique.
    async fn alter_auto_id(&self, id: String, _element: &ElementNode, _raw: &str) -> String {
        id
    }
}

#[async_trait]
pub trait InlinerParseFactory: Send + Sync {
    /// Every span of `text` this element would parse, in discovery order.
    fn outline_ranges(&self, text: &str) -> Vec<Range>;

    async fn create_parse_data(
        &self,
        cx: &mut ParseCx<'_>,
        str_inliner: &str,
    ) -> anyhow::Result<ParseData>;

    async fn alter_auto_id(&self, id: String, _element: &ElementNode, _raw: &str) -> String {
        id
    }
}

/// What a strategy sees while building parse data.
pub struct ParseCx<'a> {
    pub(crate) parser: &'a Parser,
    pub(crate) dom: &'a mut Dom,
    pub(crate) state: &'a mut ParseState,
    pub(crate) node: NodeId,
}

impl<'a> ParseCx<'a> {
    /// The node being parsed.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn element(&self) -> Option<&ElementNode> {
        self.dom.element(self.node)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.element().map_or("", |element| element.name.as_str())
    }

    /// Meta detached from the node's source, available before parse data.
    #[must_use]
    pub fn meta(&self) -> &ElementMeta {
        self.element().map_or(&EMPTY_META, |element| &element.meta)
    }

    /// The payload registered alongside this element.
    #[must_use]
    pub fn provide<T: Any>(&self) -> Option<&T> {
        self.parser.transpilers().get(self.name())?.provide::<T>()
    }

    #[must_use]
    pub fn dom(&self) -> &Dom {
        &*self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut *self.dom
    }

    /// Parses nested blocks into a group owned by this node.
    pub async fn parse_blocks(&mut self, text: &str) -> Result<NodeId, ParseError> {
        let group = self.dom.create_group(GroupKind::Blocks, Some(self.node))?;
        let blocks = self.parser.blocks(&mut *self.dom, &mut *self.state, text).await?;
        self.dom.append(group, blocks)?;
        Ok(group)
    }

    /// Parses inline content into a group owned by this node.
    pub async fn parse_inliners(&mut self, text: &str) -> Result<NodeId, ParseError> {
        let group = self.dom.create_group(GroupKind::Inliners, Some(self.node))?;
        let inliners = self.parser.inliners(&mut *self.dom, &mut *self.state, text).await?;
        self.dom.append(group, inliners)?;
        Ok(group)
    }
}

/// How the body of an object block is handed to the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjParseMode {
    /// Raw dedented text.
    String,
    /// A YAML mapping; anything else fails the block.
    #[default]
    Object,
    /// Any YAML value.
    Any,
}

/// Object blocks: an `@name` line followed by an indented body.
///
/// ```text
/// @heading
///     level: 2
///     title: Object Heading
/// ```
#[async_trait]
pub trait ObjBlockParseFactory: Send + Sync {
    fn obj_name(&self) -> &str;

    fn parse_mode(&self) -> ObjParseMode {
        ObjParseMode::Object
    }

    async fn parse_data_from_obj(
        &self,
        cx: &mut ParseCx<'_>,
        obj: Value,
        str_block: &str,
    ) -> anyhow::Result<ParseData>;

    async fn alter_auto_id(&self, id: String, _element: &ElementNode, _raw: &str) -> String {
        id
    }
}

#[async_trait]
impl<T: ObjBlockParseFactory> BlockParseFactory for T {
    fn can_parse(&self, str_block: &str) -> bool {
        let (first, _) = split_first_line(str_block);
        first.strip_prefix('@') == Some(self.obj_name())
    }

    async fn create_parse_data(
        &self,
        cx: &mut ParseCx<'_>,
        str_block: &str,
    ) -> anyhow::Result<ParseData> {
        let (_, body) = split_first_line(str_block);
        let body = dedent(body);
        let obj = match self.parse_mode() {
            ObjParseMode::String => Value::String(body),
            ObjParseMode::Object => match parse_yaml(&body)? {
                mapping @ Value::Mapping(_) => mapping,
                _ => bail!("@{} expects a mapping body", self.obj_name()),
            },
            ObjParseMode::Any => parse_yaml(&body)?,
        };
        self.parse_data_from_obj(cx, obj, str_block).await
    }

    async fn alter_auto_id(&self, id: String, element: &ElementNode, raw: &str) -> String {
        ObjBlockParseFactory::alter_auto_id(self, id, element, raw).await
    }
}

/// Inliners found by a regex. Each non-empty match is a candidate range.
#[async_trait]
pub trait RegexInlinerParseFactory: Send + Sync {
    fn regex(&self) -> &Regex;

    async fn parse_data_from_captures(
        &self,
        cx: &mut ParseCx<'_>,
        captures: &Captures<'_>,
    ) -> anyhow::Result<ParseData>;

    async fn alter_auto_id(&self, id: String, _element: &ElementNode, _raw: &str) -> String {
        id
    }
}

#[async_trait]
impl<T: RegexInlinerParseFactory> InlinerParseFactory for T {
    fn outline_ranges(&self, text: &str) -> Vec<Range> {
        self.regex()
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(Range::from)
            .collect()
    }

    async fn create_parse_data(
        &self,
        cx: &mut ParseCx<'_>,
        str_inliner: &str,
    ) -> anyhow::Result<ParseData> {
        let captures = self.regex().captures(str_inliner).ok_or_else(|| {
            anyhow!("`{str_inliner}` does not match /{}/", self.regex().as_str())
        })?;
        self.parse_data_from_captures(cx, &captures).await
    }

    async fn alter_auto_id(&self, id: String, element: &ElementNode, raw: &str) -> String {
        RegexInlinerParseFactory::alter_auto_id(self, id, element, raw).await
    }
}
