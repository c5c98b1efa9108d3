use std::any::Any;
use std::fmt;

use crate::meta::ElementMeta;

/// Index of a node inside a [`Dom`](super::Dom) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether an element lives at block level or inside a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Block,
    Inliner,
}

/// Ordered child containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Root,
    Blocks,
    Inliners,
}

impl GroupKind {
    /// Root and block groups hold blocks separated by blank lines.
    #[must_use]
    pub fn holds_blocks(self) -> bool {
        matches!(self, GroupKind::Root | GroupKind::Blocks)
    }
}

#[derive(Debug)]
pub enum Node {
    Group(GroupKind),
    Element(ElementNode),
    Error(ErrorNode),
}

impl Node {
    #[must_use]
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_error(&self) -> Option<&ErrorNode> {
        match self {
            Node::Error(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            Node::Group(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Short label used by tree traces.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Node::Group(GroupKind::Root) => "<root>".to_string(),
            Node::Group(GroupKind::Blocks) => "<blocks>".to_string(),
            Node::Group(GroupKind::Inliners) => "<inliners>".to_string(),
            Node::Element(element) => element.name.clone(),
            Node::Error(error) => format!("<{}> (error)", error.name),
        }
    }
}

/// A parsed element: a block (heading, paragraph) or an inliner (bold, text).
#[derive(Debug)]
pub struct ElementNode {
    pub name: String,
    pub role: ElementRole,
    pub auto_id: Option<String>,
    pub meta: ElementMeta,
    pub parse_data: ParseData,
}

impl ElementNode {
    pub fn new(name: impl Into<String>, role: ElementRole) -> Self {
        Self {
            name: name.into(),
            role,
            auto_id: None,
            meta: ElementMeta::new(),
            parse_data: ParseData::none(),
        }
    }

    pub fn block(name: impl Into<String>) -> Self {
        Self::new(name, ElementRole::Block)
    }

    pub fn inliner(name: impl Into<String>) -> Self {
        Self::new(name, ElementRole::Inliner)
    }

    #[must_use]
    pub fn with_meta(mut self, meta: ElementMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Explicit `#id` from meta, otherwise the generated id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.meta.id().or(self.auto_id.as_deref())
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        self.role == ElementRole::Block
    }
}

/// Stand-in for an element whose strategy failed. Keeps the untouched source
/// so the document still stringifies back verbatim.
#[derive(Debug)]
pub struct ErrorNode {
    pub name: String,
    pub role: ElementRole,
    pub source: String,
    pub error: anyhow::Error,
}

impl ErrorNode {
    pub fn new(
        name: impl Into<String>,
        role: ElementRole,
        source: impl Into<String>,
        error: anyhow::Error,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            source: source.into(),
            error,
        }
    }
}

/// Element-specific payload produced by a parse strategy.
#[derive(Default)]
pub struct ParseData(Option<Box<dyn Any + Send + Sync>>);

impl ParseData {
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self(Some(Box::new(data)))
    }

    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_ref()?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_mut()?.downcast_mut()
    }
}

impl fmt::Debug for ParseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("ParseData(..)"),
            None => f.write_str("ParseData(None)"),
        }
    }
}
