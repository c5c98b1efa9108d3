//! Headings, written either as a `## Title` line or as an object block:
//!
//! ```text
//! @heading
//!     level: 2
//!     title: Title
//! ```

use std::sync::LazyLock;

use anyhow::{Context, bail};
use async_trait::async_trait;
use bitran_core::{ElementNode, ParseData};
use bitran_transpiler::utils::yaml::to_str_object_block;
use bitran_transpiler::{
    BlockParseFactory, ElementTranspiler, ObjBlockParseFactory, ParseCx, StringifyCx,
    StringifyFactory,
};
use regex::Regex;
use serde_yaml::{Mapping, Value};

pub const NAME: &str = "heading";
pub const MAX_LEVEL: usize = 6;

static LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(#{1,6}) (.+)\z").expect("valid heading regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingForm {
    Line,
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingData {
    pub level: usize,
    pub title: String,
    pub form: HeadingForm,
}

/// Lowercased alphanumeric words joined by `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn slug_id(id: String, element: &ElementNode) -> String {
    match element.parse_data.get::<HeadingData>() {
        Some(data) if !slugify(&data.title).is_empty() => {
            format!("{NAME}:{}", slugify(&data.title))
        }
        _ => id,
    }
}

pub struct LineHeadingParser;

#[async_trait]
impl BlockParseFactory for LineHeadingParser {
    fn can_parse(&self, str_block: &str) -> bool {
        !str_block.contains('\n') && LINE.is_match(str_block)
    }

    async fn create_parse_data(
        &self,
        _cx: &mut ParseCx<'_>,
        str_block: &str,
    ) -> anyhow::Result<ParseData> {
        let captures = LINE.captures(str_block).context("not a heading line")?;
        Ok(ParseData::new(HeadingData {
            level: captures[1].len(),
            title: captures[2].to_string(),
            form: HeadingForm::Line,
        }))
    }

    async fn alter_auto_id(&self, id: String, element: &ElementNode, _raw: &str) -> String {
        slug_id(id, element)
    }
}

pub struct ObjHeadingParser;

#[async_trait]
impl ObjBlockParseFactory for ObjHeadingParser {
    fn obj_name(&self) -> &str {
        NAME
    }

    async fn parse_data_from_obj(
        &self,
        _cx: &mut ParseCx<'_>,
        obj: Value,
        _str_block: &str,
    ) -> anyhow::Result<ParseData> {
        let level = obj
            .get("level")
            .and_then(Value::as_u64)
            .context("heading object needs a numeric `level`")?;
        let title = obj
            .get("title")
            .and_then(Value::as_str)
            .context("heading object needs a `title`")?;
        let level = usize::try_from(level)?;
        if !(1..=MAX_LEVEL).contains(&level) {
            bail!("heading level {level} is outside 1..={MAX_LEVEL}");
        }
        Ok(ParseData::new(HeadingData {
            level,
            title: title.trim().to_string(),
            form: HeadingForm::Object,
        }))
    }

    async fn alter_auto_id(&self, id: String, element: &ElementNode, _raw: &str) -> String {
        slug_id(id, element)
    }
}

pub struct HeadingStringifier;

#[async_trait]
impl StringifyFactory for HeadingStringifier {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        let data = cx
            .parse_data::<HeadingData>()
            .context("heading has no heading data")?;
        Ok(match data.form {
            HeadingForm::Line => format!("{} {}", "#".repeat(data.level), data.title),
            HeadingForm::Object => {
                let mut obj = Mapping::new();
                obj.insert("level".into(), Value::from(data.level as u64));
                obj.insert("title".into(), Value::from(data.title.as_str()));
                to_str_object_block(NAME, &Value::Mapping(obj))
            }
        })
    }
}

#[must_use]
pub fn transpiler() -> ElementTranspiler {
    ElementTranspiler::new(HeadingStringifier)
        .block_parser(LineHeadingParser)
        .block_parser(ObjHeadingParser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Getting Started", "getting-started")]
    #[case("  Spaces   everywhere ", "spaces-everywhere")]
    #[case("C++ & Rust: 2024!", "c-rust-2024")]
    #[case("Ünïcode Title", "ünïcode-title")]
    #[case("!!!", "")]
    fn test_slugify(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(slugify(title), expected);
    }

    #[rstest]
    #[case("# Title", true)]
    #[case("###### Six", true)]
    #[case("####### Seven", false)]
    #[case("#NoSpace", false)]
    #[case("# ", false)]
    #[case("# Title\nmore text", false)]
    fn test_line_can_parse(#[case] block: &str, #[case] expected: bool) {
        assert_eq!(LineHeadingParser.can_parse(block), expected);
    }

    #[test]
    fn test_slug_id_falls_back_without_title_words() {
        let mut element = ElementNode::block(NAME);
        element.parse_data = ParseData::new(HeadingData {
            level: 1,
            title: "???".to_string(),
            form: HeadingForm::Line,
        });

        assert_eq!(slug_id("heading:abc123".to_string(), &element), "heading:abc123");
    }
}
