//! Incant - Pattern-matching scripting front-end for game servers
//!
//! This crate re-exports all layers of the Incant system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: incant_engine     — Match engine, diagnostics, load-phase builder
//! Layer 2: incant_registry   — Type, converter, and syntax registries
//! Layer 1: incant_pattern    — Pattern grammar compiler and expansion
//! Layer 0: incant_foundation — Core types (Value, TypeId)
//! ```

pub use incant_engine as engine;
pub use incant_foundation as foundation;
pub use incant_pattern as pattern;
pub use incant_registry as registry;
