use async_trait::async_trait;
use bitran_core::{Dom, NodeId};

/// Per-node callback run by the parser (with the node's raw text) and the
/// stringifier (with the node's output), once per node in emission order.
#[async_trait]
pub trait NodeStep: Send {
    async fn step(&mut self, dom: &Dom, node: NodeId, text: &str);
}

/// Adapts a plain closure into a [`NodeStep`].
pub struct FnStep<F>(pub F);

#[async_trait]
impl<F> NodeStep for FnStep<F>
where
    F: FnMut(&Dom, NodeId, &str) + Send,
{
    async fn step(&mut self, dom: &Dom, node: NodeId, text: &str) {
        (self.0)(dom, node, text);
    }
}

pub(crate) async fn run_step(
    step: &mut Option<Box<dyn NodeStep>>,
    dom: &Dom,
    node: NodeId,
    text: &str,
) {
    if let Some(step) = step {
        step.step(dom, node, text).await;
    }
}
