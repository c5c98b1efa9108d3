//! Bidirectional transpiler for the bitran markup language.
//!
//! Elements are registered in a [`Transpilers`] table; the [`Parser`] turns
//! text into a [`bitran_core::Dom`] with them and the [`Stringifier`] writes
//! the tree back so that unchanged input round-trips exactly.
//!
//! ## Modules
//!
//! - [`parse`]: block splitting, inline range resolution, parse strategies
//! - [`stringify`]: tree to text, stringify strategies
//! - [`meta`]: `{ #id .class key=value }` and YAML block attributes
//! - [`range`]: half-open spans used by inline strategies
//! - [`transpiler`]: the element registry
//! - [`utils`]: string, YAML and hashing helpers

pub mod error;
pub mod meta;
pub mod parse;
pub mod range;
pub mod step;
pub mod stringify;
pub mod transpiler;
pub mod utils;

pub use error::{ParseError, StringifyError, TranspilerError};
pub use parse::{
    AutoIdRegistry, AutoIdStrategy, BlockParseFactory, HashAutoId, InlinerParseFactory,
    ObjBlockParseFactory, ObjParseMode, ParseCx, ParseOptions, Parser, RegexInlinerParseFactory,
};
pub use range::{Range, RangeError, RangeIntersection, intersection};
pub use step::{FnStep, NodeStep};
pub use stringify::{
    ObjStringifyFactory, ParagraphStringifier, Stringifier, StringifyCx, StringifyFactory,
    StringifyOptions, TextStringifier,
};
pub use transpiler::{BitranTranspiler, ElementTranspiler, ParseStrategy, Transpilers};
