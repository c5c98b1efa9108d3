use async_trait::async_trait;
use bitran_core::ParseData;
use bitran_transpiler::{
    ElementTranspiler, InlinerParseFactory, ParseCx, Range, StringifyCx, StringifyFactory,
};

pub const NAME: &str = "dash";

const DASH: &str = " -- ";

/// A spaced double hyphen standing for an em dash.
pub struct DashParser;

#[async_trait]
impl InlinerParseFactory for DashParser {
    fn outline_ranges(&self, text: &str) -> Vec<Range> {
        text.match_indices(DASH)
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
        Ok(DASH.to_string())
    }
}

#[must_use]
pub fn transpiler() -> ElementTranspiler {
    ElementTranspiler::new(DashStringifier).inliner_parser(DashParser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outline_ranges() {
        let ranges = DashParser.outline_ranges("a -- b -- c --d");

        assert_eq!(
            ranges,
            [Range::new(1, 5).unwrap(), Range::new(6, 10).unwrap()]
        );
    }

    #[test]
    fn test_outline_ranges_do_not_overlap() {
        assert_eq!(DashParser.outline_ranges("a -- -- b").len(), 1);
    }
}
