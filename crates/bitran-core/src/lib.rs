//! Node tree shared by the bitran parser and stringifier.
//!
//! ## Modules
//!
//! - [`dom`]: the arena tree, its node kinds and group operations
//! - [`meta`]: element attributes (`#id .class key=value`)
//! - [`defaults`]: built-in `paragraph` and `text` elements

pub mod defaults;
pub mod dom;
pub mod meta;

pub use defaults::{PARAGRAPH_NAME, ParagraphData, TEXT_NAME};
pub use dom::trace::{trace_node_down, trace_node_down_with, trace_node_up};
pub use dom::{
    Dom, DomError, ElementNode, ElementRole, ErrorNode, GroupKind, Node, NodeId, ParseData,
};
pub use meta::ElementMeta;
