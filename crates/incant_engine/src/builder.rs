//! Load-phase registration.
//!
//! Every registration happens on an [`EngineBuilder`]; `build` freezes
//! the registries into an [`Engine`]. There is no way to register against
//! a built engine, which is what makes unsynchronized concurrent matching
//! sound.

use incant_foundation::{TypeId, Value};
use incant_pattern::{PatternError, compile};
use incant_registry::{
    ConverterGraph, ElementFactory, Priority, RegistrationHandle, SyntaxKind, SyntaxRegistry,
    TypeInfo, TypeRegistry,
};

use crate::engine::Engine;

/// Collects registrations during the load phase.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    types: TypeRegistry,
    converters: ConverterGraph,
    syntaxes: SyntaxRegistry,
}

impl EngineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a semantic type, returning its handle.
    ///
    /// Patterns registered afterwards may name the type (singular or
    /// plural) in placeholders.
    pub fn register_type(&mut self, info: TypeInfo) -> TypeId {
        self.types.register(info)
    }

    /// Registers a conversion edge between two semantic types.
    pub fn register_converter(
        &mut self,
        from: TypeId,
        to: TypeId,
        convert: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) {
        self.converters.register(from, to, convert);
    }

    /// Compiles and registers the patterns of one syntax element.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] among the supplied patterns;
    /// the registration is rejected as a whole and the builder is left
    /// unchanged, so other registrations proceed.
    pub fn register_syntax(
        &mut self,
        kind: SyntaxKind,
        patterns: &[&str],
        priority: Priority,
        factory: ElementFactory,
    ) -> Result<RegistrationHandle, PatternError> {
        let compiled = patterns
            .iter()
            .map(|pattern| compile(pattern, &self.types))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.syntaxes.register(kind, compiled, priority, factory))
    }

    /// Read access to the types registered so far.
    #[must_use]
    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Freezes the registries into a match engine.
    #[must_use]
    pub fn build(self) -> Engine {
        Engine::from_parts(self.types, self.converters, self.syntaxes)
    }
}
