//! Small element set used by the integration tests: a heading with a line
//! form and an object form, a `**bold**` regex inliner and a ` -- ` dash.

#![allow(dead_code)]

use std::sync::{Arc, LazyLock, Mutex};

use anyhow::{Context, bail};
use async_trait::async_trait;
use bitran_core::{Dom, ElementNode, NodeId, ParseData};
use bitran_transpiler::utils::yaml::to_str_object_block;
use bitran_transpiler::{
    BlockParseFactory, ElementTranspiler, InlinerParseFactory, ObjBlockParseFactory, ParseCx,
    Range, RegexInlinerParseFactory, StringifyCx, StringifyFactory, Transpilers,
};
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#+) (.+)$").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingData {
    pub level: usize,
    pub title: String,
    pub obj: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HeadingProvide {
    pub prefix: String,
    pub postfix: String,
}

impl HeadingProvide {
    pub fn new(prefix: &str, postfix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            postfix: postfix.to_string(),
        }
    }
}

fn decorate(cx: &ParseCx<'_>, title: &str) -> String {
    let provide = cx.provide::<HeadingProvide>().cloned().unwrap_or_default();
    format!("{}{title}{}", provide.prefix, provide.postfix)
}

pub struct HeadingParser;

#[async_trait]
impl BlockParseFactory for HeadingParser {
    fn can_parse(&self, str_block: &str) -> bool {
        HEADING_LINE.is_match(str_block)
    }

    async fn create_parse_data(
        &self,
        cx: &mut ParseCx<'_>,
        str_block: &str,
    ) -> anyhow::Result<ParseData> {
        if cx.meta().flag("throw") {
            bail!("Heading wanted to throw!");
        }
        let captures = HEADING_LINE
            .captures(str_block)
            .context("not a heading line")?;
        Ok(ParseData::new(HeadingData {
            level: captures[1].len(),
            title: decorate(cx, captures[2].trim()),
            obj: false,
        }))
    }

    async fn alter_auto_id(&self, id: String, _element: &ElementNode, raw: &str) -> String {
        match HEADING_LINE.captures(raw) {
            Some(captures) => format!("custom-heading:{}", captures[2].trim()),
            None => id,
        }
    }
}

pub struct ObjHeadingParser;

#[async_trait]
impl ObjBlockParseFactory for ObjHeadingParser {
    fn obj_name(&self) -> &str {
        "heading"
    }

    async fn parse_data_from_obj(
        &self,
        cx: &mut ParseCx<'_>,
        obj: Value,
        _str_block: &str,
    ) -> anyhow::Result<ParseData> {
        let (Some(level), Some(title)) = (
            obj.get("level").and_then(Value::as_u64),
            obj.get("title").and_then(Value::as_str),
        ) else {
            bail!("Invalid heading object!");
        };
        Ok(ParseData::new(HeadingData {
            level: level as usize,
            title: decorate(cx, title.trim()),
            obj: true,
        }))
    }
}

pub struct HeadingStringifier;

#[async_trait]
impl StringifyFactory for HeadingStringifier {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        let data = cx
            .parse_data::<HeadingData>()
            .context("heading without data")?;
        if data.obj {
            let mut obj = Mapping::new();
            obj.insert("level".into(), Value::from(data.level as u64));
            obj.insert("title".into(), Value::from(data.title.clone()));
            Ok(to_str_object_block("heading", &Value::Mapping(obj)))
        } else {
            Ok(format!("{} {}", "#".repeat(data.level), data.title))
        }
    }
}

pub struct DashParser;

#[async_trait]
impl InlinerParseFactory for DashParser {
    fn outline_ranges(&self, text: &str) -> Vec<Range> {
        text.match_indices(" -- ")
            .filter_map(|(start, dash)| Range::try_new(start, start + dash.len()))
            .collect()
    }

    async fn create_parse_data(
        &self,
        _cx: &mut ParseCx<'_>,
        _str_inliner: &str,
    ) -> anyhow::Result<ParseData> {
        Ok(ParseData::none())
    }
}

pub struct DashStringifier;

#[async_trait]
impl StringifyFactory for DashStringifier {
    async fn stringify_element(&self, _cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        Ok(" -- ".to_string())
    }
}

pub struct BoldParser;

#[async_trait]
impl RegexInlinerParseFactory for BoldParser {
    fn regex(&self) -> &Regex {
        &BOLD
    }

    async fn parse_data_from_captures(
        &self,
        _cx: &mut ParseCx<'_>,
        captures: &Captures<'_>,
    ) -> anyhow::Result<ParseData> {
        Ok(ParseData::new(captures[1].to_string()))
    }
}

pub struct BoldStringifier;

#[async_trait]
impl StringifyFactory for BoldStringifier {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        let text = cx.parse_data::<String>().context("bold without text")?;
        Ok(format!("**{text}**"))
    }
}

pub fn heading_transpiler(provide: HeadingProvide) -> ElementTranspiler {
    ElementTranspiler::new(HeadingStringifier)
        .block_parser(HeadingParser)
        .block_parser(ObjHeadingParser)
        .with_provide(provide)
}

pub fn dash_transpiler() -> ElementTranspiler {
    ElementTranspiler::new(DashStringifier).inliner_parser(DashParser)
}

pub fn bold_transpiler() -> ElementTranspiler {
    ElementTranspiler::new(BoldStringifier).inliner_parser(BoldParser)
}

/// Heading, dash and bold in that order. The heading decorates titles with
/// the default prefix and postfix.
pub fn transpilers() -> Transpilers {
    transpilers_with(HeadingProvide::new("[default prefix] ", " [default postfix]"))
}

pub fn transpilers_with(heading: HeadingProvide) -> Transpilers {
    Transpilers::builder()
        .element("heading", heading_transpiler(heading))
        .element("dash", dash_transpiler())
        .element("bold", bold_transpiler())
        .build()
        .unwrap()
}

/// Element names of a group's children, errors included.
pub fn child_names(dom: &Dom, group: NodeId) -> Vec<String> {
    dom.children(group)
        .iter()
        .map(|&child| match dom[child].as_element() {
            Some(element) => element.name.clone(),
            None => dom[child].label(),
        })
        .collect()
}

/// Records every step call as `(label, text)`.
pub fn recorder() -> (
    Arc<Mutex<Vec<(String, String)>>>,
    impl FnMut(&Dom, NodeId, &str) + Send + 'static,
) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let step = move |dom: &Dom, node: NodeId, text: &str| {
        sink.lock().unwrap().push((dom[node].label(), text.to_string()));
    };
    (calls, step)
}
