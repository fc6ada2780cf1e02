//! Integration tests for syntax registration
//!
//! Candidate order is fixed at load time by priority class and
//! registration sequence; conflict detection runs over pattern
//! expansions.

use std::any::Any;
use std::sync::Arc;

use incant_foundation::TypeId;
use incant_pattern::{ResolvedType, TypeLookup, compile};
use incant_registry::{
    Context, Element, ElementFactory, ParseOutput, Priority, SyntaxKind, SyntaxRegistry,
};

struct NumberOnly;

impl TypeLookup for NumberOnly {
    fn resolve_type(&self, name: &str) -> Option<ResolvedType> {
        match name {
            "number" => Some(ResolvedType {
                id: TypeId::from_index(0),
                single: true,
            }),
            "numbers" => Some(ResolvedType {
                id: TypeId::from_index(0),
                single: false,
            }),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Stub;

impl Element for Stub {
    fn result_type(&self) -> TypeId {
        TypeId::from_index(0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn stub_factory() -> ElementFactory {
    Arc::new(|_: &ParseOutput, _: &Context| Ok(Box::new(Stub) as Box<dyn Element>))
}

fn register(
    registry: &mut SyntaxRegistry,
    kind: SyntaxKind,
    source: &str,
    priority: Priority,
) {
    let pattern = compile(source, &NumberOnly).expect("pattern should compile");
    registry.register(kind, vec![pattern], priority, stub_factory());
}

#[test]
fn candidate_order_interleaves_priority_classes() {
    let mut registry = SyntaxRegistry::new();
    register(&mut registry, SyntaxKind::Expression, "everything", Priority::CATCH_ALL);
    register(&mut registry, SyntaxKind::Expression, "health of %number%", Priority::PROPERTY);
    register(&mut registry, SyntaxKind::Expression, "%number% plus %number%", Priority::COMBINED);
    register(&mut registry, SyntaxKind::Expression, "the spawn point", Priority::SIMPLE);

    let order: Vec<&str> = registry
        .candidates(SyntaxKind::Expression)
        .map(|entry| entry.origin.as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "the spawn point",
            "%number% plus %number%",
            "health of %number%",
            "everything",
        ]
    );
}

#[test]
fn registration_sequence_breaks_priority_ties() {
    let mut registry = SyntaxRegistry::new();
    register(&mut registry, SyntaxKind::Condition, "it rains", Priority::SIMPLE);
    register(&mut registry, SyntaxKind::Condition, "it snows", Priority::SIMPLE);
    register(&mut registry, SyntaxKind::Condition, "it hails", Priority::SIMPLE);

    let order: Vec<&str> = registry
        .candidates(SyntaxKind::Condition)
        .map(|entry| entry.origin.as_str())
        .collect();
    assert_eq!(order, vec!["it rains", "it snows", "it hails"]);
}

#[test]
fn categories_do_not_leak_into_each_other() {
    let mut registry = SyntaxRegistry::new();
    register(&mut registry, SyntaxKind::Effect, "wave", Priority::SIMPLE);
    register(&mut registry, SyntaxKind::Condition, "wave", Priority::SIMPLE);

    assert_eq!(registry.candidates(SyntaxKind::Effect).count(), 1);
    assert_eq!(registry.candidates(SyntaxKind::Condition).count(), 1);
    assert_eq!(registry.candidates(SyntaxKind::Expression).count(), 0);
}

#[test]
fn overlapping_expansions_are_flagged_as_conflicts() {
    let mut registry = SyntaxRegistry::new();
    register(&mut registry, SyntaxKind::Effect, "toggle [the] switch", Priority::SIMPLE);
    register(&mut registry, SyntaxKind::Effect, "(toggle|flip) the switch", Priority::SIMPLE);

    let conflicts = registry.conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].alternative, "toggle the switch");
    assert_eq!(conflicts[0].first, "toggle [the] switch");
    assert_eq!(conflicts[0].second, "(toggle|flip) the switch");
}

#[test]
fn placeholder_positions_participate_in_conflicts() {
    let mut registry = SyntaxRegistry::new();
    register(&mut registry, SyntaxKind::Effect, "heal %number%", Priority::SIMPLE);
    register(&mut registry, SyntaxKind::Effect, "heal %numbers%", Priority::SIMPLE);

    // Both expand to "heal *": a likely registration mistake.
    assert_eq!(registry.conflicts().len(), 1);
}

#[test]
fn cross_category_duplicates_are_not_conflicts() {
    let mut registry = SyntaxRegistry::new();
    register(&mut registry, SyntaxKind::Effect, "ring the bell", Priority::SIMPLE);
    register(&mut registry, SyntaxKind::Condition, "ring the bell", Priority::SIMPLE);

    assert!(registry.conflicts().is_empty());
}
