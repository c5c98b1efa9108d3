use bitran_core::{Dom, NodeId};

use super::auto_id::{AutoIdStrategy, AutoIds, HashAutoId};
use crate::step::{FnStep, NodeStep};

/// Per-call parse settings. Each call gets a fresh id registry.
#[derive(Default)]
pub struct ParseOptions {
    auto_id: Option<Box<dyn AutoIdStrategy>>,
    step: Option<Box<dyn NodeStep>>,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_auto_id(mut self, strategy: impl AutoIdStrategy + 'static) -> Self {
        self.auto_id = Some(Box::new(strategy));
        self
    }

    /// Called with each node and the raw text it was parsed from.
    #[must_use]
    pub fn with_step<F>(self, step: F) -> Self
    where
        F: FnMut(&Dom, NodeId, &str) + Send + 'static,
    {
        self.with_step_handler(FnStep(step))
    }

    #[must_use]
    pub fn with_step_handler(mut self, step: impl NodeStep + 'static) -> Self {
        self.step = Some(Box::new(step));
        self
    }
}

/// State threaded through one parse pass, nested strategy calls included.
pub(crate) struct ParseState {
    pub(crate) auto_ids: AutoIds,
    pub(crate) step: Option<Box<dyn NodeStep>>,
}

impl From<ParseOptions> for ParseState {
    fn from(options: ParseOptions) -> Self {
        let strategy = options
            .auto_id
            .unwrap_or_else(|| Box::new(HashAutoId::default()));
        Self {
            auto_ids: AutoIds::new(strategy),
            step: options.step,
        }
    }
}
