//! Markup to tree.
//!
//! A document is split into blocks on blank lines. Each block loses its
//! leading meta, then the first block strategy whose `can_parse` accepts it
//! builds the element; unclaimed blocks become paragraphs of inline content.
//! Inline content is carved up by the ranges inline strategies outline, with
//! earlier-registered strategies winning overlaps.
//!
//! ## Modules
//!
//! - [`parser`]: the [`Parser`] driving both passes
//! - [`factory`]: strategy traits, [`ParseCx`], object and regex helpers
//! - [`options`]: per-call [`ParseOptions`]
//! - [`auto_id`]: content-derived ids

pub mod auto_id;
pub mod factory;
pub mod options;
pub mod parser;

pub use auto_id::{AutoIdRegistry, AutoIdStrategy, HashAutoId};
pub use factory::{
    BlockParseFactory, InlinerParseFactory, ObjBlockParseFactory, ObjParseMode, ParseCx,
    RegexInlinerParseFactory,
};
pub use options::ParseOptions;
pub use parser::Parser;
