use bitran_core::{DomError, NodeId};
use thiserror::Error;

/// Failures that abort a whole parse pass. Strategy errors never show up
/// here; they become error nodes in the tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("auto id \"{0}\" is already taken")]
    DuplicateAutoId(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

#[derive(Debug, Error)]
pub enum StringifyError {
    #[error("node {id} is not part of this tree\n{trace}")]
    UnknownNode { id: NodeId, trace: String },

    #[error("no stringifier registered for element \"{name}\"\n{trace}")]
    MissingStringifier { name: String, trace: String },

    #[error("failed to stringify element \"{name}\": {source}")]
    Element {
        name: String,
        source: anyhow::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranspilerError {
    #[error("element \"{0}\" is registered more than once")]
    DuplicateElement(String),

    #[error("element name must not be empty")]
    EmptyName,
}
