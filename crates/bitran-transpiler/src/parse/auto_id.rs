//! Content-derived element ids.

use std::collections::HashSet;

use bitran_core::ElementNode;

use crate::error::ParseError;
use crate::utils::hash::hash_string;

pub const DEFAULT_HASH_LENGTH: usize = 6;
pub const DEFAULT_SUFFIX: &str = "-";

/// How candidate ids are produced and made unique.
pub trait AutoIdStrategy: Send + Sync {
    fn generate(&self, element: &ElementNode, raw: &str) -> String;

    /// Turns a candidate into an id the registry does not hold yet.
    fn finalize(&self, candidate: String, registry: &AutoIdRegistry) -> String;
}

/// `name:hash` ids, disambiguated by appending a suffix until unique.
#[derive(Debug, Clone)]
pub struct HashAutoId {
    length: usize,
    suffix: String,
}

impl HashAutoId {
    pub fn new(length: usize, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self {
            length,
            suffix: if suffix.is_empty() {
                DEFAULT_SUFFIX.to_string()
            } else {
                suffix
            },
        }
    }
}

impl Default for HashAutoId {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_LENGTH, DEFAULT_SUFFIX)
    }
}

impl AutoIdStrategy for HashAutoId {
    fn generate(&self, element: &ElementNode, raw: &str) -> String {
        format!("{}:{}", element.name, hash_string(raw, self.length))
    }

    fn finalize(&self, candidate: String, registry: &AutoIdRegistry) -> String {
        let mut id = candidate;
        while registry.exists(&id) {
            id.push_str(&self.suffix);
        }
        id
    }
}

/// Ids handed out during one parse pass.
#[derive(Debug, Default)]
pub struct AutoIdRegistry {
    ids: HashSet<String>,
}

impl AutoIdRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn push(&mut self, id: impl Into<String>) -> Result<(), ParseError> {
        let id = id.into();
        if self.ids.contains(&id) {
            return Err(ParseError::DuplicateAutoId(id));
        }
        self.ids.insert(id);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A strategy together with the ids it has issued in the current pass.
pub(crate) struct AutoIds {
    strategy: Box<dyn AutoIdStrategy>,
    registry: AutoIdRegistry,
}

impl AutoIds {
    pub(crate) fn new(strategy: Box<dyn AutoIdStrategy>) -> Self {
        Self {
            strategy,
            registry: AutoIdRegistry::new(),
        }
    }

    pub(crate) fn generate(&self, element: &ElementNode, raw: &str) -> String {
        self.strategy.generate(element, raw)
    }

    /// Finalizes and registers `candidate`.
    pub(crate) fn assign(&mut self, candidate: String) -> Result<String, ParseError> {
        let id = self.strategy.finalize(candidate, &self.registry);
        self.registry.push(id.clone())?;
        Ok(id)
    }
}
