use std::collections::HashMap;
use std::sync::Arc;

use bitran_core::{Dom, ElementNode, Node, NodeId, PARAGRAPH_NAME, TEXT_NAME, trace_node_up};
use futures::future::{BoxFuture, FutureExt};

use super::defaults::{ParagraphStringifier, TextStringifier};
use super::factory::{StringifyCx, StringifyFactory};
use super::options::{StringifyOptions, StringifyState};
use crate::error::StringifyError;
use crate::meta::stringify_meta;
use crate::step::run_step;
use crate::transpiler::Transpilers;

const BLOCK_SEPARATOR: &str = "\n\n";

/// Turns a [`Dom`] (or any subtree of it) back into markup.
pub struct Stringifier {
    transpilers: Arc<Transpilers>,
    factories: HashMap<String, Arc<dyn StringifyFactory>>,
}

impl Stringifier {
    pub fn new(transpilers: impl Into<Arc<Transpilers>>) -> Self {
        let transpilers = transpilers.into();
        let mut factories: HashMap<String, Arc<dyn StringifyFactory>> = transpilers
            .iter()
            .map(|(name, transpiler)| (name.to_string(), Arc::clone(transpiler.stringifier())))
            .collect();
        factories
            .entry(PARAGRAPH_NAME.to_string())
            .or_insert_with(|| Arc::new(ParagraphStringifier));
        factories
            .entry(TEXT_NAME.to_string())
            .or_insert_with(|| Arc::new(TextStringifier));
        Self {
            transpilers,
            factories,
        }
    }

    #[must_use]
    pub fn transpilers(&self) -> &Transpilers {
        &self.transpilers
    }

    pub async fn stringify(
        &self,
        dom: &Dom,
        node: NodeId,
        options: StringifyOptions,
    ) -> Result<String, StringifyError> {
        let mut state = StringifyState::from(options);
        self.node(dom, &mut state, node).await
    }

    pub(crate) fn node<'a>(
        &'a self,
        dom: &'a Dom,
        state: &'a mut StringifyState,
        node: NodeId,
    ) -> BoxFuture<'a, Result<String, StringifyError>> {
        async move {
            let Some(kind) = dom.get(node) else {
                return Err(StringifyError::UnknownNode {
                    id: node,
                    trace: format!("{node} is not one of the {} nodes", dom.node_count()),
                });
            };

            match kind {
                Node::Error(error) => {
                    run_step(&mut state.step, dom, node, &error.source).await;
                    Ok(error.source.clone())
                }
                Node::Group(group) => {
                    let mut parts = Vec::with_capacity(dom.children(node).len());
                    for &child in dom.children(node) {
                        parts.push(self.node(dom, &mut *state, child).await?);
                    }
                    if group.holds_blocks() {
                        Ok(parts.join(BLOCK_SEPARATOR).trim().to_string())
                    } else {
                        Ok(parts.concat())
                    }
                }
                Node::Element(element) => self.element(dom, state, node, element).await,
            }
        }
        .boxed()
    }

    async fn element(
        &self,
        dom: &Dom,
        state: &mut StringifyState,
        node: NodeId,
        element: &ElementNode,
    ) -> Result<String, StringifyError> {
        let Some(factory) = self.factories.get(&element.name) else {
            let trace = trace_node_up(dom, node);
            log::error!("no stringifier for `{}`:\n{trace}", element.name);
            return Err(StringifyError::MissingStringifier {
                name: element.name.clone(),
                trace,
            });
        };

        let body = {
            let mut cx = StringifyCx {
                stringifier: self,
                dom,
                state: &mut *state,
                node,
            };
            factory.stringify_element(&mut cx).await
        };
        let body = body.map_err(|error| match error.downcast::<StringifyError>() {
            Ok(structural) => structural,
            Err(source) => StringifyError::Element {
                name: element.name.clone(),
                source,
            },
        })?;

        let output = if element.meta.is_empty() {
            body
        } else if element.is_block() {
            format!("{}\n{body}", stringify_meta(&element.meta, true))
        } else {
            format!("{body}{}", stringify_meta(&element.meta, false))
        };

        run_step(&mut state.step, dom, node, &output).await;
        Ok(output)
    }
}
