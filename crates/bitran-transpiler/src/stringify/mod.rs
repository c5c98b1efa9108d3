//! Tree to markup.
//!
//! Mirrors [`crate::parse`]: each element's stringify strategy writes the
//! element's own text and the stringifier re-attaches meta around it. Error
//! nodes are written back as the raw text they were parsed from.

pub mod defaults;
pub mod factory;
pub mod options;
pub mod stringifier;

pub use defaults::{ParagraphStringifier, TextStringifier};
pub use factory::{ObjStringifyFactory, StringifyCx, StringifyFactory};
pub use options::StringifyOptions;
pub use stringifier::Stringifier;
