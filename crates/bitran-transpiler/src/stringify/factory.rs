use std::any::Any;
use std::sync::LazyLock;

use async_trait::async_trait;
use bitran_core::{Dom, ElementMeta, ElementNode, NodeId, trace_node_up};
use serde_yaml::Value;

use super::options::StringifyState;
use super::stringifier::Stringifier;
use crate::error::StringifyError;
use crate::utils::yaml::to_str_object_block;

static EMPTY_META: LazyLock<ElementMeta> = LazyLock::new(ElementMeta::new);

/// Writes an element back to markup. Meta is attached by the stringifier,
/// so implementations only emit the element's own text.
#[async_trait]
pub trait StringifyFactory: Send + Sync {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String>;
}

/// What a stringify strategy sees.
pub struct StringifyCx<'a> {
    pub(crate) stringifier: &'a Stringifier,
    pub(crate) dom: &'a Dom,
    pub(crate) state: &'a mut StringifyState,
    pub(crate) node: NodeId,
}

impl<'a> StringifyCx<'a> {
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn element(&self) -> Option<&'a ElementNode> {
        self.dom.element(self.node)
    }

    #[must_use]
    pub fn meta(&self) -> &'a ElementMeta {
        self.element().map_or(&EMPTY_META, |element| &element.meta)
    }

    /// The node's parse data, if it has the expected type.
    #[must_use]
    pub fn parse_data<T: Any>(&self) -> Option<&'a T> {
        self.element()?.parse_data.get::<T>()
    }

    #[must_use]
    pub fn provide<T: Any>(&self) -> Option<&'a T> {
        let name = self.element()?.name.as_str();
        self.stringifier.transpilers().get(name)?.provide::<T>()
    }

    #[must_use]
    pub fn dom(&self) -> &'a Dom {
        self.dom
    }

    /// Stringifies another node with the same options, usually a group the
    /// current element owns.
    pub async fn stringify(&mut self, node: NodeId) -> Result<String, StringifyError> {
        if !self.dom.contains(node) {
            return Err(StringifyError::UnknownNode {
                id: node,
                trace: trace_node_up(self.dom, self.node),
            });
        }
        self.stringifier.node(self.dom, &mut *self.state, node).await
    }
}

/// Counterpart of object-block parsing: `@name` and an indented YAML body.
#[async_trait]
pub trait ObjStringifyFactory: Send + Sync {
    fn obj_name(&self) -> &str;

    async fn create_raw_object(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<Value>;
}

#[async_trait]
impl<T: ObjStringifyFactory> StringifyFactory for T {
    async fn stringify_element(&self, cx: &mut StringifyCx<'_>) -> anyhow::Result<String> {
        let obj = self.create_raw_object(cx).await?;
        Ok(to_str_object_block(self.obj_name(), &obj))
    }
}
