//! Baseline types and converters for embedders and tests.
//!
//! Game-specific types belong to the embedding server; these three cover
//! what nearly every script dialect needs and double as the reference for
//! how descriptors, converters, and factories are wired up.

use std::any::Any;
use std::sync::Arc;

use incant_foundation::{TypeId, Value};
use incant_registry::{Context, Element, ElementFactory, ParseOutput, Rejection, TypeInfo};

use crate::builder::EngineBuilder;

/// Handles of the baseline types installed by [`install`].
#[derive(Clone, Copy, Debug)]
pub struct BaselineTypes {
    /// Integer or floating-point numbers.
    pub number: TypeId,
    /// Double-quoted text.
    pub text: TypeId,
    /// true/false, yes/no, on/off.
    pub boolean: TypeId,
}

/// Registers the baseline types and their stock converters.
pub fn install(builder: &mut EngineBuilder) -> BaselineTypes {
    let number = builder.register_type(
        TypeInfo::new("number", "numbers")
            .with_parser(parse_number)
            .with_default(|| Value::Int(0)),
    );
    let text = builder.register_type(TypeInfo::new("text", "texts").with_parser(parse_text));
    let boolean = builder.register_type(
        TypeInfo::new("boolean", "booleans")
            .with_parser(parse_boolean)
            .with_default(|| Value::Bool(false)),
    );

    builder.register_converter(number, text, |value| {
        value.as_number().is_some().then(|| Value::from(value.to_string()))
    });
    builder.register_converter(boolean, text, |value| {
        value.as_bool().map(|b| Value::from(b.to_string()))
    });
    builder.register_converter(boolean, number, |value| {
        value.as_bool().map(|b| Value::Int(i64::from(b)))
    });

    BaselineTypes {
        number,
        text,
        boolean,
    }
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Int(n));
    }
    text.parse::<f64>().ok().map(Value::Float)
}

/// Text literals require quotes; an unquoted word is left for expression
/// candidates rather than swallowed as text.
fn parse_text(text: &str) -> Option<Value> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    if inner.contains('"') {
        return None;
    }
    Some(Value::from(inner))
}

fn parse_boolean(text: &str) -> Option<Value> {
    match text.to_lowercase().as_str() {
        "true" | "yes" | "on" => Some(Value::Bool(true)),
        "false" | "no" | "off" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// An element that keeps its parse output for later inspection.
///
/// The factories below build it; embedders with real syntax elements only
/// need it in tests.
#[derive(Debug)]
pub struct Captured {
    output: ParseOutput,
    result_type: TypeId,
    single: bool,
}

impl Captured {
    /// The parse output this element was constructed from.
    #[must_use]
    pub const fn output(&self) -> &ParseOutput {
        &self.output
    }
}

impl Element for Captured {
    fn result_type(&self) -> TypeId {
        self.result_type
    }

    fn is_single(&self) -> bool {
        self.single
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn captured(result_type: TypeId, single: bool) -> ElementFactory {
    Arc::new(move |output: &ParseOutput, _: &Context| {
        Ok(Box::new(Captured {
            output: output.clone(),
            result_type,
            single,
        }) as Box<dyn Element>)
    })
}

/// A factory building a [`Captured`] element producing one value of
/// `result_type`.
#[must_use]
pub fn capture_factory(result_type: TypeId) -> ElementFactory {
    captured(result_type, true)
}

/// A factory building a [`Captured`] element producing a list of
/// `result_type` values; single placeholders reject it.
#[must_use]
pub fn capture_list_factory(result_type: TypeId) -> ElementFactory {
    captured(result_type, false)
}

/// A factory that refuses every parse with `reason`, for testing the
/// rejection path.
#[must_use]
pub fn rejecting_factory(reason: &str) -> ElementFactory {
    let reason = reason.to_string();
    Arc::new(move |_: &ParseOutput, _: &Context| Err(Rejection::new(reason.clone())))
}
