use std::sync::LazyLock;

use anyhow::Context;
use async_trait::async_trait;
use bitran_core::{NodeId, ParseData};
use bitran_transpiler::{
    ElementTranspiler, ParseCx, RegexInlinerParseFactory, StringifyCx, StringifyFactory,
};
use regex::{Captures, Regex};

pub const NAME: &str = "bold";

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));

/// `**...**`. The content is parsed as inliners of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoldData {
    pub content: NodeId,
}

pub struct BoldParser;

#[async_trait]
impl RegexInlinerParseFactory for BoldParser {
    fn regex(&self) -> &Regex {
        &BOLD
    }

    async fn parse_data_from_captures(
        &self,
        cx: &mut ParseCx<'_>,
        captures: &Captures<'_>,
    ) -> anyhow::Result<ParseData> {
        let content = cx.parse_inliners(&captures[1]).await?;
        Ok(ParseData::new(BoldData { content }))
    }
}

pub struct BoldStringifier;

#[async_trait]
impl StringifyFactory for BoldStringifier {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        let content = cx
            .parse_data::<BoldData>()
            .context("bold has no content")?
            .content;
        Ok(format!("**{}**", cx.stringify(content).await?))
    }
}

#[must_use]
pub fn transpiler() -> ElementTranspiler {
    ElementTranspiler::new(BoldStringifier).inliner_parser(BoldParser)
}
