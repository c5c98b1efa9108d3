use anyhow::anyhow;
use async_trait::async_trait;
use bitran_core::ParagraphData;

use super::factory::{StringifyCx, StringifyFactory};

/// Writes a paragraph's inliner group.
pub struct ParagraphStringifier;

#[async_trait]
impl StringifyFactory for ParagraphStringifier {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        let content = cx
            .parse_data::<ParagraphData>()
            .map(|data| data.content)
            .ok_or_else(|| anyhow!("paragraph {} has no content group", cx.node()))?;
        Ok(cx.stringify(content).await?)
    }
}

pub struct TextStringifier;

#[async_trait]
impl StringifyFactory for TextStringifier {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        cx.parse_data::<String>()
            .cloned()
            .ok_or_else(|| anyhow!("text {} carries no string", cx.node()))
    }
}
