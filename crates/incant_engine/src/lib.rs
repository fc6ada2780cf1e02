//! Backtracking match engine and load-phase builder for Incant.
//!
//! An [`EngineBuilder`] collects type, converter, and syntax registrations
//! during the load phase and freezes them into an [`Engine`]. The engine
//! answers one question: given a category and a line of script text, which
//! registered candidate matches best, and what are its sub-expressions?
//!
//! ```
//! use incant_engine::{EngineBuilder, stdlib};
//! use incant_registry::{Context, Priority, SyntaxKind};
//!
//! let mut builder = EngineBuilder::new();
//! let types = stdlib::install(&mut builder);
//! builder
//!     .register_syntax(
//!         SyntaxKind::Effect,
//!         &["wait %number% second[s]"],
//!         Priority::SIMPLE,
//!         stdlib::capture_factory(types.number),
//!     )
//!     .unwrap();
//! let engine = builder.build();
//!
//! let matched = engine
//!     .parse(SyntaxKind::Effect, "wait 10 seconds", &Context::new())
//!     .unwrap();
//! assert_eq!(matched.output.slots.len(), 1);
//! ```
//!
//! Matching is synchronous and single-threaded per call. The engine is
//! `Send + Sync`; independent lines may be parsed from separate threads,
//! each call owning its own parse state and log.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod engine;
pub mod log;
mod matcher;
pub mod stdlib;

pub use builder::EngineBuilder;
pub use engine::{Engine, MAX_NESTING_DEPTH, Match};
pub use log::{Failure, FailureRecord, ParseLog};
