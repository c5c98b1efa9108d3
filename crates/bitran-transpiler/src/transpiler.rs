//! Element registry shared by the parser and the stringifier.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::TranspilerError;
use crate::parse::{BlockParseFactory, InlinerParseFactory, Parser};
use crate::stringify::{StringifyFactory, Stringifier};

#[derive(Clone)]
pub enum ParseStrategy {
    Block(Arc<dyn BlockParseFactory>),
    Inliner(Arc<dyn InlinerParseFactory>),
}

/// Everything needed to read and write one element kind.
///
/// Parse strategies are tried in the order they are added. Block strategies
/// produce block nodes, inline strategies inliner nodes.
#[derive(Clone)]
pub struct ElementTranspiler {
    parsers: Vec<ParseStrategy>,
    stringifier: Arc<dyn StringifyFactory>,
    provide: Option<Arc<dyn Any + Send + Sync>>,
}

impl ElementTranspiler {
    pub fn new(stringifier: impl StringifyFactory + 'static) -> Self {
        Self {
            parsers: Vec::new(),
            stringifier: Arc::new(stringifier),
            provide: None,
        }
    }

    #[must_use]
    pub fn block_parser(mut self, factory: impl BlockParseFactory + 'static) -> Self {
        self.parsers.push(ParseStrategy::Block(Arc::new(factory)));
        self
    }

    #[must_use]
    pub fn inliner_parser(mut self, factory: impl InlinerParseFactory + 'static) -> Self {
        self.parsers.push(ParseStrategy::Inliner(Arc::new(factory)));
        self
    }

    /// Attaches a payload strategies can read back with `provide::<T>()`.
    #[must_use]
    pub fn with_provide<T: Any + Send + Sync>(mut self, provide: T) -> Self {
        self.provide = Some(Arc::new(provide));
        self
    }

    #[must_use]
    pub fn parsers(&self) -> &[ParseStrategy] {
        &self.parsers
    }

    #[must_use]
    pub fn stringifier(&self) -> &Arc<dyn StringifyFactory> {
        &self.stringifier
    }

    #[must_use]
    pub fn provide<T: Any>(&self) -> Option<&T> {
        self.provide.as_deref()?.downcast_ref()
    }
}

/// Registered elements in declaration order. Built once, then read-only.
#[derive(Clone, Default)]
pub struct Transpilers {
    elements: Vec<(String, ElementTranspiler)>,
}

impl Transpilers {
    #[must_use]
    pub fn builder() -> TranspilersBuilder {
        TranspilersBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ElementTranspiler> {
        self.elements
            .iter()
            .find(|(element, _)| element == name)
            .map(|(_, transpiler)| transpiler)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementTranspiler)> {
        self.elements
            .iter()
            .map(|(name, transpiler)| (name.as_str(), transpiler))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[derive(Default)]
pub struct TranspilersBuilder {
    elements: Vec<(String, ElementTranspiler)>,
}

impl TranspilersBuilder {
    #[must_use]
    pub fn element(mut self, name: impl Into<String>, transpiler: ElementTranspiler) -> Self {
        self.elements.push((name.into(), transpiler));
        self
    }

    /// Adds every element of `other` after the ones already declared.
    #[must_use]
    pub fn extend(mut self, other: &Transpilers) -> Self {
        self.elements.extend(other.elements.iter().cloned());
        self
    }

    pub fn build(self) -> Result<Transpilers, TranspilerError> {
        let mut seen = HashSet::new();
        for (name, _) in &self.elements {
            if name.is_empty() {
                return Err(TranspilerError::EmptyName);
            }
            if !seen.insert(name.as_str()) {
                return Err(TranspilerError::DuplicateElement(name.clone()));
            }
        }
        Ok(Transpilers {
            elements: self.elements,
        })
    }
}

/// A parser and a stringifier over the same registry.
pub struct BitranTranspiler {
    pub transpilers: Arc<Transpilers>,
    pub parser: Parser,
    pub stringifier: Stringifier,
}

impl BitranTranspiler {
    pub fn new(transpilers: impl Into<Arc<Transpilers>>) -> Self {
        let transpilers = transpilers.into();
        Self {
            parser: Parser::new(Arc::clone(&transpilers)),
            stringifier: Stringifier::new(Arc::clone(&transpilers)),
            transpilers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stringify::TextStringifier;

    struct Prefix(&'static str);

    #[test]
    fn test_builder_keeps_declaration_order() {
        let transpilers = Transpilers::builder()
            .element("b", ElementTranspiler::new(TextStringifier))
            .element("a", ElementTranspiler::new(TextStringifier))
            .build()
            .unwrap();

        let names: Vec<_> = transpilers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(transpilers.len(), 2);
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let result = Transpilers::builder()
            .element("bold", ElementTranspiler::new(TextStringifier))
            .element("bold", ElementTranspiler::new(TextStringifier))
            .build();

        assert_eq!(
            result.err(),
            Some(TranspilerError::DuplicateElement("bold".to_string()))
        );
    }

    #[test]
    fn test_builder_rejects_empty_name() {
        let result = Transpilers::builder()
            .element("", ElementTranspiler::new(TextStringifier))
            .build();

        assert_eq!(result.err(), Some(TranspilerError::EmptyName));
    }

    #[test]
    fn test_extend_detects_clash() {
        let base = Transpilers::builder()
            .element("bold", ElementTranspiler::new(TextStringifier))
            .build()
            .unwrap();
        let result = Transpilers::builder()
            .extend(&base)
            .element("bold", ElementTranspiler::new(TextStringifier))
            .build();

        assert!(matches!(result, Err(TranspilerError::DuplicateElement(_))));
    }

    #[test]
    fn test_provide_downcasts() {
        let transpiler = ElementTranspiler::new(TextStringifier).with_provide(Prefix(">> "));

        assert_eq!(transpiler.provide::<Prefix>().map(|p| p.0), Some(">> "));
        assert!(transpiler.provide::<String>().is_none());
        assert!(ElementTranspiler::new(TextStringifier).provide::<Prefix>().is_none());
    }

    #[test]
    fn test_get_unknown_element() {
        assert!(Transpilers::default().get("heading").is_none());
        assert!(Transpilers::default().is_empty());
    }
}
