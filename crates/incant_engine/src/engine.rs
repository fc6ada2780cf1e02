//! The match engine.
//!
//! An [`Engine`] owns the frozen registries and answers match queries.
//! Candidates are tried in priority order; placeholders recurse into
//! expression parsing through the engine itself, which is where the
//! mutual recursion between patterns and sub-expressions lives.

use std::sync::Arc;

use incant_pattern::{Pattern, Placeholder};
use incant_registry::{
    Conflict, Context, ConverterGraph, Element, ParseOutput, Slot, SyntaxKind, SyntaxRegistry,
    TypeInfo, TypeRegistry,
};

use crate::log::{Failure, ParseLog};
use crate::matcher::{self, SlotParser};

/// Sub-expression nesting deeper than this fails the branch and is noted
/// in the parse log.
pub const MAX_NESTING_DEPTH: usize = 16;

/// A successful match: the constructed element and the parse result it
/// was built from.
#[derive(Debug)]
pub struct Match {
    /// The element the winning candidate's factory constructed.
    pub element: Box<dyn Element>,
    /// The parse result handed to the factory.
    pub output: ParseOutput,
}

/// The frozen match engine.
///
/// Built once by [`EngineBuilder`](crate::EngineBuilder); read-only
/// afterwards, so it can be shared across worker threads. Each `parse`
/// call owns its own parse state and log.
#[derive(Debug)]
pub struct Engine {
    types: TypeRegistry,
    converters: ConverterGraph,
    syntaxes: SyntaxRegistry,
}

impl Engine {
    pub(crate) fn from_parts(
        types: TypeRegistry,
        converters: ConverterGraph,
        syntaxes: SyntaxRegistry,
    ) -> Self {
        Self {
            types,
            converters,
            syntaxes,
        }
    }

    /// The semantic type registry.
    #[must_use]
    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// The converter graph.
    #[must_use]
    pub const fn converters(&self) -> &ConverterGraph {
        &self.converters
    }

    /// The syntax registry.
    #[must_use]
    pub const fn syntaxes(&self) -> &SyntaxRegistry {
        &self.syntaxes
    }

    /// Scans the registered patterns for likely registration conflicts.
    #[must_use]
    pub fn conflicts(&self) -> Vec<Conflict> {
        self.syntaxes.conflicts()
    }

    /// Finds the best-matching element of `kind` for a line of script
    /// text.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::EmptyInput`] for blank text, and otherwise the
    /// best diagnostic collected from the failed candidates.
    pub fn parse(&self, kind: SyntaxKind, text: &str, ctx: &Context) -> Result<Match, Failure> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Failure::EmptyInput);
        }

        let mut log = ParseLog::new();
        match self.attempt(kind, text, ctx, 0, &mut log) {
            Some(matched) => Ok(matched),
            None => Err(log.into_failure(kind, text, MAX_NESTING_DEPTH)),
        }
    }

    /// Tries every candidate of `kind` against `text`, in priority order.
    fn attempt(
        &self,
        kind: SyntaxKind,
        text: &str,
        ctx: &Context,
        depth: usize,
        log: &mut ParseLog,
    ) -> Option<Match> {
        for entry in self.syntaxes.candidates(kind) {
            for (index, pattern) in entry.patterns.iter().enumerate() {
                let mut nested = NestedParser {
                    engine: self,
                    ctx,
                    depth,
                    log: &mut *log,
                };
                let outcome = matcher::run_pattern(pattern, text, &mut nested);

                let Some(state) = outcome.matched else {
                    log.record(
                        &entry.origin,
                        entry.priority,
                        outcome.furthest,
                        format!("does not match '{}'", pattern.source()),
                    );
                    continue;
                };

                let mut slots = state.slots;
                if let Err(message) = self.fill_defaults(pattern, &mut slots) {
                    log.record(&entry.origin, entry.priority, outcome.furthest, message);
                    continue;
                }

                let output = ParseOutput {
                    pattern_index: index,
                    matched: text.to_string(),
                    slots,
                    mark: state.mark,
                    tags: state.tags,
                    captures: state.captures,
                };
                match (entry.factory)(&output, ctx) {
                    Ok(element) => return Some(Match { element, output }),
                    // "Syntax matched" and "element accepted" are separate
                    // outcomes; a rejection just eliminates this candidate.
                    Err(rejection) => {
                        log.record(&entry.origin, entry.priority, text.len(), rejection.reason);
                    }
                }
            }
        }
        None
    }

    /// Fills mandatory placeholders the match left empty from their types'
    /// default suppliers. A slot with no supplier fails the candidate.
    fn fill_defaults(&self, pattern: &Pattern, slots: &mut [Slot]) -> Result<(), String> {
        for placeholder in pattern.placeholders() {
            if !slots[placeholder.slot].is_absent() || placeholder.optional {
                continue;
            }
            let filled = placeholder.types.iter().find_map(|accepted| {
                self.types
                    .info(accepted.id)
                    .and_then(TypeInfo::default_value)
                    .map(|value| Slot::Literal {
                        value,
                        type_id: accepted.id,
                    })
            });
            match filled {
                Some(slot) => slots[placeholder.slot] = slot,
                None => {
                    return Err(format!(
                        "the %{}% slot matched no text and has no default value",
                        placeholder.types[0].name,
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parses placeholder sub-spans by recursing into the engine.
struct NestedParser<'a> {
    engine: &'a Engine,
    ctx: &'a Context,
    depth: usize,
    log: &'a mut ParseLog,
}

impl SlotParser for NestedParser<'_> {
    fn parse_slot(&mut self, span: &str, placeholder: &Placeholder) -> Option<Slot> {
        let span = span.trim();
        if span.is_empty() {
            return None;
        }
        if !placeholder.excluded {
            if let Some(slot) = self.literal_slot(span, placeholder) {
                return Some(slot);
            }
        }
        self.expression_slot(span, placeholder)
    }
}

impl NestedParser<'_> {
    /// Parses the span through the accepted types' own text parsers, in
    /// declaration order.
    fn literal_slot(&self, span: &str, placeholder: &Placeholder) -> Option<Slot> {
        for accepted in &placeholder.types {
            let Some(info) = self.engine.types.info(accepted.id) else {
                continue;
            };
            let Some(value) = info.parse(span) else {
                continue;
            };
            if placeholder.requires_single() && value.arity() != 1 {
                continue;
            }
            return Some(Slot::Literal {
                value,
                type_id: accepted.id,
            });
        }
        None
    }

    /// Parses the span as a nested expression and accepts it if its
    /// result type converts to one of the placeholder's types.
    fn expression_slot(&mut self, span: &str, placeholder: &Placeholder) -> Option<Slot> {
        if self.depth + 1 >= MAX_NESTING_DEPTH {
            self.log.note_recursion_limit();
            return None;
        }

        // Sub-parse failures stay out of the top-level log: their offsets
        // are relative to the sub-span and would corrupt the consumed-depth
        // ranking. Only the recursion note survives.
        let mut sub_log = ParseLog::new();
        let matched =
            self.engine
                .attempt(SyntaxKind::Expression, span, self.ctx, self.depth + 1, &mut sub_log);
        if sub_log.recursion_limited() {
            self.log.note_recursion_limit();
        }

        let matched = matched?;
        let element: Arc<dyn Element> = Arc::from(matched.element);
        if placeholder.requires_single() && !element.is_single() {
            return None;
        }

        let produced = element.result_type();
        let (accepted, conversion) = placeholder.types.iter().find_map(|accepted| {
            self.engine
                .converters
                .path(produced, accepted.id)
                .map(|path| (accepted.id, path))
        })?;
        Some(Slot::Expression {
            element,
            produced,
            accepted,
            conversion,
        })
    }
}
