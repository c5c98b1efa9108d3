use bitran_core::{Dom, NodeId};

use crate::step::{FnStep, NodeStep};

#[derive(Default)]
pub struct StringifyOptions {
    step: Option<Box<dyn NodeStep>>,
}

impl StringifyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with each element or error node and the text written for it.
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

pub(crate) struct StringifyState {
    pub(crate) step: Option<Box<dyn NodeStep>>,
}

impl From<StringifyOptions> for StringifyState {
    fn from(options: StringifyOptions) -> Self {
        Self { step: options.step }
    }
}
