//! Integration tests for structural matching
//!
//! Optional greediness, choice marks and tags, whitespace handling, and
//! regex elements, driven through the full engine.

use incant_registry::{Context, SyntaxKind};

use crate::effect_engine;

#[test]
fn optional_group_matches_with_and_without() {
    let (engine, _) = effect_engine(&["[a] b"]);
    let ctx = Context::new();

    assert!(engine.parse(SyntaxKind::Effect, "b", &ctx).is_ok());
    assert!(engine.parse(SyntaxKind::Effect, "a b", &ctx).is_ok());
    // Extra internal whitespace collapses.
    assert!(engine.parse(SyntaxKind::Effect, "a  b", &ctx).is_ok());
    assert!(engine.parse(SyntaxKind::Effect, "c", &ctx).is_err());
}

#[test]
fn choice_branches_are_exclusive() {
    let (engine, _) = effect_engine(&["(1\u{a6}cat|2\u{a6}dog)"]);
    let ctx = Context::new();

    assert_eq!(
        engine.parse(SyntaxKind::Effect, "cat", &ctx).unwrap().output.mark,
        1
    );
    assert_eq!(
        engine.parse(SyntaxKind::Effect, "dog", &ctx).unwrap().output.mark,
        2
    );
    assert!(engine.parse(SyntaxKind::Effect, "fish", &ctx).is_err());
}

#[test]
fn marks_accumulate_across_groups() {
    let (engine, _) = effect_engine(&["(1\u{a6}give|2\u{a6}take) (4\u{a6}gold|8\u{a6}silver)"]);
    let matched = engine
        .parse(SyntaxKind::Effect, "take gold", &Context::new())
        .unwrap();
    assert_eq!(matched.output.mark, 2 | 4);
}

#[test]
fn tags_surface_on_the_parse_output() {
    let (engine, _) = effect_engine(&["say it [quietly:quietly]"]);
    let ctx = Context::new();

    let matched = engine.parse(SyntaxKind::Effect, "say it quietly", &ctx).unwrap();
    assert!(matched.output.has_tag("quietly"));

    let matched = engine.parse(SyntaxKind::Effect, "say it", &ctx).unwrap();
    assert!(!matched.output.has_tag("quietly"));
}

#[test]
fn literals_match_case_insensitively() {
    let (engine, _) = effect_engine(&["Ring The Bell"]);
    assert!(
        engine
            .parse(SyntaxKind::Effect, "ring the bell", &Context::new())
            .is_ok()
    );
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let (engine, _) = effect_engine(&["ring the bell"]);
    assert!(
        engine
            .parse(SyntaxKind::Effect, "   ring  the \t bell  ", &Context::new())
            .is_ok()
    );
}

#[test]
fn trailing_unmatched_text_fails() {
    let (engine, _) = effect_engine(&["ring the bell"]);
    assert!(
        engine
            .parse(SyntaxKind::Effect, "ring the bell twice", &Context::new())
            .is_err()
    );
}

#[test]
fn regex_elements_capture_matched_text() {
    let (engine, _) = effect_engine(&["execute <[a-z_]+> now"]);
    let matched = engine
        .parse(SyntaxKind::Effect, "execute reload_chunks now", &Context::new())
        .unwrap();
    assert_eq!(matched.output.capture(0), Some("reload_chunks"));
}

#[test]
fn first_pattern_of_a_candidate_wins() {
    let mut builder = incant_engine::EngineBuilder::new();
    let types = incant_engine::stdlib::install(&mut builder);
    builder
        .register_syntax(
            SyntaxKind::Effect,
            &["ring [the] bell", "sound [the] bell"],
            incant_registry::Priority::SIMPLE,
            incant_engine::stdlib::capture_factory(types.number),
        )
        .unwrap();
    let engine = builder.build();

    let matched = engine
        .parse(SyntaxKind::Effect, "sound the bell", &Context::new())
        .unwrap();
    assert_eq!(matched.output.pattern_index, 1);
    let matched = engine
        .parse(SyntaxKind::Effect, "ring bell", &Context::new())
        .unwrap();
    assert_eq!(matched.output.pattern_index, 0);
}
