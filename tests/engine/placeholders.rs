//! Integration tests for placeholder resolution
//!
//! Split-point selection, type preference, arity, defaults, and nested
//! expression parsing.

use incant_engine::{EngineBuilder, stdlib};
use incant_foundation::Value;
use incant_registry::{Context, Priority, Slot, SyntaxKind};

use crate::effect_engine;

#[test]
fn list_pattern_beats_single_value_pattern() {
    let mut builder = EngineBuilder::new();
    let types = stdlib::install(&mut builder);
    builder
        .register_syntax(
            SyntaxKind::Expression,
            &["%number%"],
            Priority::CATCH_ALL,
            stdlib::capture_factory(types.number),
        )
        .unwrap();
    builder
        .register_syntax(
            SyntaxKind::Expression,
            &["%number% and %number%"],
            Priority::CATCH_ALL,
            stdlib::capture_list_factory(types.number),
        )
        .unwrap();
    let engine = builder.build();

    let matched = engine
        .parse(SyntaxKind::Expression, "1 and 2", &Context::new())
        .unwrap();
    assert_eq!(matched.output.slots.len(), 2);
    assert_eq!(matched.output.slots[0].literal_value(), Some(&Value::Int(1)));
    assert_eq!(matched.output.slots[1].literal_value(), Some(&Value::Int(2)));
}

#[test]
fn placeholder_takes_span_up_to_anchor() {
    let (engine, _) = effect_engine(&["log %text/number% then %number%"]);
    let matched = engine
        .parse(SyntaxKind::Effect, "log 3 then 4", &Context::new())
        .unwrap();
    assert_eq!(matched.output.slots[0].literal_value(), Some(&Value::Int(3)));
    assert_eq!(matched.output.slots[1].literal_value(), Some(&Value::Int(4)));
}

#[test]
fn declaration_order_decides_among_accepted_types() {
    let (engine, types) = effect_engine(&["store %number/text%", "keep %text/number%"]);
    let ctx = Context::new();

    // "5" parses as both a number and (unquoted) not as text; number is
    // declared first and wins outright.
    let matched = engine.parse(SyntaxKind::Effect, "store 5", &ctx).unwrap();
    assert_eq!(matched.output.slots[0].accepted_type(), Some(types.number));

    // Quoted text only parses as text, whichever order is declared.
    let matched = engine
        .parse(SyntaxKind::Effect, "store \"5\"", &ctx)
        .unwrap();
    assert_eq!(matched.output.slots[0].accepted_type(), Some(types.text));

    let matched = engine.parse(SyntaxKind::Effect, "keep \"5\"", &ctx).unwrap();
    assert_eq!(matched.output.slots[0].accepted_type(), Some(types.text));
}

#[test]
fn anchored_literal_prunes_impossible_splits() {
    let (engine, _) = effect_engine(&["teleport %number% blocks"]);
    // The " blocks" anchor never appears, so every split is pruned and
    // the candidate fails cleanly.
    assert!(
        engine
            .parse(SyntaxKind::Effect, "teleport 5 meters", &Context::new())
            .is_err()
    );
}

#[test]
fn skipped_group_fills_from_default_supplier() {
    let (engine, _) = effect_engine(&["spin [%number% times]"]);
    let matched = engine
        .parse(SyntaxKind::Effect, "spin", &Context::new())
        .unwrap();
    assert_eq!(matched.output.slots[0].literal_value(), Some(&Value::Int(0)));
}

#[test]
fn optional_flag_leaves_slot_absent_instead() {
    let (engine, _) = effect_engine(&["spin [%-number% times]"]);
    let matched = engine
        .parse(SyntaxKind::Effect, "spin", &Context::new())
        .unwrap();
    assert!(matched.output.slots[0].is_absent());
}

#[test]
fn excluded_placeholder_needs_a_registered_expression() {
    let mut builder = EngineBuilder::new();
    let types = stdlib::install(&mut builder);
    builder
        .register_syntax(
            SyntaxKind::Expression,
            &["the roll"],
            Priority::SIMPLE,
            stdlib::capture_factory(types.number),
        )
        .unwrap();
    builder
        .register_syntax(
            SyntaxKind::Effect,
            &["announce %~number%"],
            Priority::SIMPLE,
            stdlib::capture_factory(types.number),
        )
        .unwrap();
    let engine = builder.build();
    let ctx = Context::new();

    // A bare literal is refused...
    assert!(engine.parse(SyntaxKind::Effect, "announce 5", &ctx).is_err());
    // ...but the registered expression fills the slot.
    let matched = engine.parse(SyntaxKind::Effect, "announce the roll", &ctx).unwrap();
    assert!(matched.output.slots[0].element().is_some());
}

#[test]
fn nested_expression_is_converted_to_the_accepted_type() {
    let mut builder = EngineBuilder::new();
    let types = stdlib::install(&mut builder);
    builder
        .register_syntax(
            SyntaxKind::Expression,
            &["pvp allowed"],
            Priority::SIMPLE,
            stdlib::capture_factory(types.boolean),
        )
        .unwrap();
    builder
        .register_syntax(
            SyntaxKind::Effect,
            &["broadcast %text%"],
            Priority::SIMPLE,
            stdlib::capture_factory(types.text),
        )
        .unwrap();
    let engine = builder.build();

    let matched = engine
        .parse(SyntaxKind::Effect, "broadcast pvp allowed", &Context::new())
        .unwrap();
    let Slot::Expression {
        produced,
        accepted,
        conversion,
        ..
    } = &matched.output.slots[0]
    else {
        panic!("expected an expression slot");
    };
    assert_eq!(*produced, types.boolean);
    assert_eq!(*accepted, types.text);
    // The recorded conversion is the one the runtime applies per firing.
    assert_eq!(
        conversion.apply(&Value::Bool(true)),
        Some(Value::from("true"))
    );
}

#[test]
fn plural_placeholder_accepts_list_expression() {
    let mut builder = EngineBuilder::new();
    let types = stdlib::install(&mut builder);
    builder
        .register_syntax(
            SyntaxKind::Expression,
            &["all dice"],
            Priority::SIMPLE,
            stdlib::capture_list_factory(types.number),
        )
        .unwrap();
    builder
        .register_syntax(
            SyntaxKind::Effect,
            &["discard %numbers%", "cast %number%"],
            Priority::SIMPLE,
            stdlib::capture_factory(types.number),
        )
        .unwrap();
    let engine = builder.build();
    let ctx = Context::new();

    assert!(engine.parse(SyntaxKind::Effect, "discard all dice", &ctx).is_ok());
    // The singular slot refuses the same plural expression.
    assert!(engine.parse(SyntaxKind::Effect, "cast all dice", &ctx).is_err());
}

#[test]
fn multiple_placeholders_fill_in_source_order() {
    let (engine, _) = effect_engine(&["move %number% by %number% by %number%"]);
    let matched = engine
        .parse(SyntaxKind::Effect, "move 1 by 2 by 3", &Context::new())
        .unwrap();
    let values: Vec<_> = matched
        .output
        .slots
        .iter()
        .map(|slot| slot.literal_value().cloned().unwrap())
        .collect();
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}
