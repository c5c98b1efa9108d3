//! Elements every document understands without registration.

use crate::dom::NodeId;

/// Fallback block for text no block strategy claims.
pub const PARAGRAPH_NAME: &str = "paragraph";

/// Plain text run between inliners. Its parse data is the raw `String`.
pub const TEXT_NAME: &str = "text";

/// Parse data of a paragraph: the inliner group holding its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphData {
    pub content: NodeId,
}
