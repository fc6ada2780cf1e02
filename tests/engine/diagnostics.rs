//! Integration tests for failure diagnostics
//!
//! When every candidate fails, the surfaced failure must come from the
//! candidate that got furthest through the input.

use incant_engine::{EngineBuilder, Failure, stdlib};
use incant_registry::{Context, Priority, SyntaxKind};

use crate::effect_engine;

#[test]
fn deepest_partial_match_is_surfaced() {
    let (engine, _) = effect_engine(&[
        // Fails immediately: the first literal never matches.
        "grant %number% gold to %text%",
        // Gets past "give " then prunes on the missing " silver" anchor.
        "give %number% silver to %text%",
        // Gets all the way to the final placeholder before failing.
        "give %number% gold to %number%",
    ]);

    let err = engine
        .parse(SyntaxKind::Effect, "give 5 gold to bob", &Context::new())
        .unwrap_err();
    let Failure::NoMatch {
        origin, consumed, ..
    } = err
    else {
        panic!("expected NoMatch");
    };
    assert_eq!(origin.as_deref(), Some("give %number% gold to %number%"));
    assert!(consumed > "give ".len());
}

#[test]
fn equal_depth_ties_break_on_priority() {
    let mut builder = EngineBuilder::new();
    let types = stdlib::install(&mut builder);
    builder
        .register_syntax(
            SyntaxKind::Effect,
            &["ring twice"],
            Priority::CATCH_ALL,
            stdlib::capture_factory(types.number),
        )
        .unwrap();
    builder
        .register_syntax(
            SyntaxKind::Effect,
            &["ring thrice"],
            Priority::SIMPLE,
            stdlib::capture_factory(types.number),
        )
        .unwrap();
    let engine = builder.build();

    // Both candidates fail without consuming anything; the more specific
    // priority class wins the tie.
    let err = engine
        .parse(SyntaxKind::Effect, "chime once", &Context::new())
        .unwrap_err();
    let Failure::NoMatch { origin, .. } = err else {
        panic!("expected NoMatch");
    };
    assert_eq!(origin.as_deref(), Some("ring thrice"));
}

#[test]
fn failure_message_names_an_attempted_candidate() {
    let (engine, _) = effect_engine(&["wait %number%", "shout %text%"]);
    let err = engine
        .parse(SyntaxKind::Effect, "xyz", &Context::new())
        .unwrap_err();
    let Failure::NoMatch { message, .. } = err else {
        panic!("expected NoMatch");
    };
    assert!(
        message.contains("wait %number%") || message.contains("shout %text%"),
        "message should reference a candidate: {message}"
    );
}

#[test]
fn failure_message_names_the_category() {
    let (engine, _) = effect_engine(&["wait %number%"]);
    let err = engine
        .parse(SyntaxKind::Effect, "xyz", &Context::new())
        .unwrap_err();
    let Failure::NoMatch { message, .. } = err else {
        panic!("expected NoMatch");
    };
    assert!(message.contains("effect"), "message: {message}");
    assert!(message.contains("xyz"), "message: {message}");
}

#[test]
fn empty_registry_still_fails_precisely() {
    let mut builder = EngineBuilder::new();
    stdlib::install(&mut builder);
    let engine = builder.build();

    let err = engine
        .parse(SyntaxKind::Condition, "it rains", &Context::new())
        .unwrap_err();
    assert!(matches!(err, Failure::NoMatch { origin: None, .. }));
}
