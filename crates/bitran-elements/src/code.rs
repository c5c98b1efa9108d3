//! Raw code. Inline as `` `code` ``, and as an object block whose indented
//! body is kept verbatim:
//!
//! ```text
//! @code
//!     fn main() {}
//! ```
//!
//! Nothing inside either form is parsed further, so registering `code` ahead
//! of other inline elements makes its spans win over theirs.

use std::sync::LazyLock;

use anyhow::Context;
use async_trait::async_trait;
use bitran_core::ParseData;
use bitran_transpiler::utils::yaml::to_str_object_block;
use bitran_transpiler::{
    ElementTranspiler, ObjBlockParseFactory, ObjParseMode, ParseCx, RegexInlinerParseFactory,
    StringifyCx, StringifyFactory,
};
use regex::{Captures, Regex};
use serde_yaml::Value;

pub const NAME: &str = "code";

static INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("valid inline code regex"));

/// Source text of either form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeData(pub String);

pub struct InlineCodeParser;

#[async_trait]
impl RegexInlinerParseFactory for InlineCodeParser {
    fn regex(&self) -> &Regex {
        &INLINE
    }

    async fn parse_data_from_captures(
        &self,
        _cx: &mut ParseCx<'_>,
        captures: &Captures<'_>,
    ) -> anyhow::Result<ParseData> {
        Ok(ParseData::new(CodeData(captures[1].to_string())))
    }
}

pub struct CodeBlockParser;

#[async_trait]
impl ObjBlockParseFactory for CodeBlockParser {
    fn obj_name(&self) -> &str {
        NAME
    }

    fn parse_mode(&self) -> ObjParseMode {
        ObjParseMode::String
    }

    async fn parse_data_from_obj(
        &self,
        _cx: &mut ParseCx<'_>,
        obj: Value,
        _str_block: &str,
    ) -> anyhow::Result<ParseData> {
        let code = obj.as_str().context("code body is not text")?;
        Ok(ParseData::new(CodeData(code.to_string())))
    }
}

pub struct CodeStringifier;

#[async_trait]
impl StringifyFactory for CodeStringifier {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        let CodeData(code) = cx.parse_data::<CodeData>().context("code has no source")?;
        let is_block = cx.element().is_some_and(|element| element.is_block());
        if is_block {
            Ok(to_str_object_block(NAME, &Value::String(code.clone())))
        } else {
            Ok(format!("`{code}`"))
        }
    }
}

#[must_use]
pub fn transpiler() -> ElementTranspiler {
    ElementTranspiler::new(CodeStringifier)
        .block_parser(CodeBlockParser)
        .inliner_parser(InlineCodeParser)
}
