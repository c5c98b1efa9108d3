use std::sync::Arc;

use bitran_core::{
    Dom, DomError, ElementMeta, ElementNode, ElementRole, ErrorNode, GroupKind, Node, NodeId,
    PARAGRAPH_NAME, ParagraphData, ParseData, TEXT_NAME,
};
use futures::future::{BoxFuture, FutureExt};

use super::factory::{BlockParseFactory, InlinerParseFactory, ParseCx};
use super::options::{ParseOptions, ParseState};
use crate::error::ParseError;
use crate::meta::{detach_inline_meta, detach_meta};
use crate::range::{Range, RangeIntersection, intersection};
use crate::step::run_step;
use crate::transpiler::{ParseStrategy, Transpilers};
use crate::utils::str::{normalize_line_endings, text_to_str_blocks};

type Named<T> = (String, Arc<T>);

/// Turns markup into a [`Dom`] using the registered element strategies.
pub struct Parser {
    transpilers: Arc<Transpilers>,
    block_factories: Vec<Named<dyn BlockParseFactory>>,
    inliner_factories: Vec<Named<dyn InlinerParseFactory>>,
}

impl Parser {
    pub fn new(transpilers: impl Into<Arc<Transpilers>>) -> Self {
        let transpilers = transpilers.into();
        let mut block_factories = Vec::new();
        let mut inliner_factories = Vec::new();
        for (name, transpiler) in transpilers.iter() {
            for strategy in transpiler.parsers() {
                match strategy {
                    ParseStrategy::Block(factory) => {
                        block_factories.push((name.to_string(), Arc::clone(factory)));
                    }
                    ParseStrategy::Inliner(factory) => {
                        inliner_factories.push((name.to_string(), Arc::clone(factory)));
                    }
                }
            }
        }
        Self {
            transpilers,
            block_factories,
            inliner_factories,
        }
    }

    #[must_use]
    pub fn transpilers(&self) -> &Transpilers {
        &self.transpilers
    }

    /// Parses a whole document into a fresh tree.
    pub async fn parse(&self, text: &str, options: ParseOptions) -> Result<Dom, ParseError> {
        let mut state = ParseState::from(options);
        let mut dom = Dom::new();
        let blocks = self.blocks(&mut dom, &mut state, text).await?;
        let root = dom.root();
        dom.set_nodes(root, blocks)?;
        Ok(dom)
    }

    /// Parses blocks into `dom` without attaching them anywhere.
    pub async fn parse_blocks(
        &self,
        dom: &mut Dom,
        text: &str,
        options: ParseOptions,
    ) -> Result<Vec<NodeId>, ParseError> {
        let mut state = ParseState::from(options);
        self.blocks(dom, &mut state, text).await
    }

    /// Parses inline content into `dom` without attaching it anywhere.
    pub async fn parse_inliners(
        &self,
        dom: &mut Dom,
        text: &str,
        options: ParseOptions,
    ) -> Result<Vec<NodeId>, ParseError> {
        let mut state = ParseState::from(options);
        self.inliners(dom, &mut state, text).await
    }

    pub(crate) fn blocks<'a>(
        &'a self,
        dom: &'a mut Dom,
        state: &'a mut ParseState,
        text: &'a str,
    ) -> BoxFuture<'a, Result<Vec<NodeId>, ParseError>> {
        async move {
            let text = normalize_line_endings(text);
            let mut blocks = Vec::new();
            for str_block in text_to_str_blocks(&text) {
                blocks.push(self.block(dom, state, &str_block).await?);
            }
            Ok(blocks)
        }
        .boxed()
    }

    async fn block(
        &self,
        dom: &mut Dom,
        state: &mut ParseState,
        str_block: &str,
    ) -> Result<NodeId, ParseError> {
        let (meta, rest_text) = detach_meta(str_block);

        let Some((name, factory)) = self
            .block_factories
            .iter()
            .find(|(_, factory)| factory.can_parse(rest_text))
        else {
            return self.paragraph(dom, state, meta, str_block, rest_text).await;
        };

        log::debug!("block claimed by `{name}`");
        let block = dom.create(Node::Element(ElementNode::block(name).with_meta(meta)));
        let result = {
            let mut cx = ParseCx {
                parser: self,
                dom: &mut *dom,
                state: &mut *state,
                node: block,
            };
            factory.create_parse_data(&mut cx, rest_text).await
        };

        match result {
            Ok(parse_data) => {
                if let Some(element) = dom.element_mut(block) {
                    element.parse_data = parse_data;
                }
                let element = element_of(dom, block)?;
                let id = state.auto_ids.generate(element, str_block);
                let candidate = factory.alter_auto_id(id, element, str_block).await;
                assign_auto_id(dom, state, block, candidate)?;
            }
            Err(error) => {
                log::warn!("`{name}` failed to parse block: {error:#}");
                dom.reset(
                    block,
                    Node::Error(ErrorNode::new(name, ElementRole::Block, str_block, error)),
                )?;
            }
        }
        run_step(&mut state.step, dom, block, str_block).await;
        Ok(block)
    }

    async fn paragraph(
        &self,
        dom: &mut Dom,
        state: &mut ParseState,
        meta: ElementMeta,
        str_block: &str,
        rest_text: &str,
    ) -> Result<NodeId, ParseError> {
        let paragraph = dom.create(Node::Element(ElementNode::block(PARAGRAPH_NAME).with_meta(meta)));
        let candidate = state.auto_ids.generate(element_of(dom, paragraph)?, str_block);
        assign_auto_id(dom, state, paragraph, candidate)?;

        let content = dom.create_group(GroupKind::Inliners, Some(paragraph))?;
        let inliners = self.inliners(dom, state, rest_text).await?;
        dom.append(content, inliners)?;
        if let Some(element) = dom.element_mut(paragraph) {
            element.parse_data = ParseData::new(ParagraphData { content });
        }

        run_step(&mut state.step, dom, paragraph, str_block).await;
        Ok(paragraph)
    }

    pub(crate) fn inliners<'a>(
        &'a self,
        dom: &'a mut Dom,
        state: &'a mut ParseState,
        text: &'a str,
    ) -> BoxFuture<'a, Result<Vec<NodeId>, ParseError>> {
        async move {
            let normalized = normalize_line_endings(text);
            let text: &str = &normalized;
            if text.is_empty() {
                return Ok(Vec::new());
            }

            let accepted = self.resolve_ranges(text);
            let mut nodes = Vec::new();

            let first_start = accepted.first().map_or(text.len(), |(_, range)| range.start);
            self.push_text(dom, state, &text[..first_start], &mut nodes).await?;

            for (i, (index, range)) in accepted.iter().enumerate() {
                let next_start = accepted
                    .get(i + 1)
                    .map_or(text.len(), |(_, next)| next.start);
                let mut after = &text[range.end..next_start];
                let mut meta = ElementMeta::new();
                if let Some((inline_meta, rest)) = detach_inline_meta(after) {
                    meta = inline_meta;
                    after = rest;
                }

                let str_inliner = &text[range.start..range.end];
                // Error nodes keep the meta text so they round-trip verbatim.
                let source = &text[range.start..next_start - after.len()];
                let node = self
                    .inliner(dom, state, *index, meta, str_inliner, source)
                    .await?;
                nodes.push(node);
                self.push_text(dom, state, after, &mut nodes).await?;
            }
            Ok(nodes)
        }
        .boxed()
    }

    /// Merges every strategy's candidate ranges, earlier strategies first.
    /// Returns `(strategy index, range)` sorted by start.
    fn resolve_ranges(&self, text: &str) -> Vec<(usize, Range)> {
        let mut accepted: Vec<(usize, Range)> = Vec::new();

        for (index, (name, factory)) in self.inliner_factories.iter().enumerate() {
            'candidates: for candidate in factory.outline_ranges(text) {
                if candidate.is_empty() {
                    continue;
                }
                if text.get(candidate.start..candidate.end).is_none() {
                    log::warn!("`{name}` outlined {candidate:?}, which is not a valid span of the text");
                    continue;
                }

                let mut replaced = Vec::new();
                for (position, (_, existing)) in accepted.iter().enumerate() {
                    match intersection(candidate, *existing) {
                        RangeIntersection::Partial | RangeIntersection::Inside => {
                            log::debug!("`{name}` range {candidate:?} rejected by {existing:?}");
                            continue 'candidates;
                        }
                        RangeIntersection::Contain => replaced.push(position),
                        RangeIntersection::None => {}
                    }
                }

                for position in replaced.into_iter().rev() {
                    accepted.remove(position);
                }
                let at = accepted
                    .iter()
                    .position(|(_, range)| range.start > candidate.start)
                    .unwrap_or(accepted.len());
                accepted.insert(at, (index, candidate));
            }
        }
        accepted
    }

    async fn inliner(
        &self,
        dom: &mut Dom,
        state: &mut ParseState,
        index: usize,
        meta: ElementMeta,
        str_inliner: &str,
        source: &str,
    ) -> Result<NodeId, ParseError> {
        let (name, factory) = &self.inliner_factories[index];
        let inliner = dom.create(Node::Element(ElementNode::inliner(name).with_meta(meta)));
        let result = {
            let mut cx = ParseCx {
                parser: self,
                dom: &mut *dom,
                state: &mut *state,
                node: inliner,
            };
            factory.create_parse_data(&mut cx, str_inliner).await
        };

        match result {
            Ok(parse_data) => {
                if let Some(element) = dom.element_mut(inliner) {
                    element.parse_data = parse_data;
                }
                let element = element_of(dom, inliner)?;
                let id = state.auto_ids.generate(element, str_inliner);
                let candidate = factory.alter_auto_id(id, element, str_inliner).await;
                assign_auto_id(dom, state, inliner, candidate)?;
            }
            Err(error) => {
                log::warn!("`{name}` failed to parse inliner: {error:#}");
                dom.reset(
                    inliner,
                    Node::Error(ErrorNode::new(name, ElementRole::Inliner, source, error)),
                )?;
            }
        }
        run_step(&mut state.step, dom, inliner, str_inliner).await;
        Ok(inliner)
    }

    async fn push_text(
        &self,
        dom: &mut Dom,
        state: &mut ParseState,
        text: &str,
        nodes: &mut Vec<NodeId>,
    ) -> Result<(), ParseError> {
        if text.is_empty() {
            return Ok(());
        }
        let mut element = ElementNode::inliner(TEXT_NAME);
        element.parse_data = ParseData::new(text.to_string());
        let candidate = state.auto_ids.generate(&element, text);
        let node = dom.create(Node::Element(element));
        assign_auto_id(dom, state, node, candidate)?;

        run_step(&mut state.step, dom, node, text).await;
        nodes.push(node);
        Ok(())
    }
}

fn element_of(dom: &Dom, node: NodeId) -> Result<&ElementNode, ParseError> {
    dom.element(node)
        .ok_or(ParseError::Dom(DomError::UnknownNode(node)))
}

fn assign_auto_id(
    dom: &mut Dom,
    state: &mut ParseState,
    node: NodeId,
    candidate: String,
) -> Result<(), ParseError> {
    let id = state.auto_ids.assign(candidate)?;
    if let Some(element) = dom.element_mut(node) {
        element.auto_id = Some(id);
    }
    Ok(())
}
