//! Type, converter, and syntax registries for Incant.
//!
//! All three registries are built during a load phase and are read-only
//! while matching runs, so they can be shared across worker threads
//! without locks. The converter graph's composed-path cache is the one
//! structure written during matching; it uses atomic insert-if-absent so
//! concurrent population stays safe.
//!
//! - [`TypeRegistry`] - semantic type descriptors, looked up by singular
//!   or plural name
//! - [`ConverterGraph`] - directed value conversions with bounded
//!   multi-hop composition
//! - [`SyntaxRegistry`] - registered syntax candidates in priority order
//! - [`element`] - the seam between the matcher and the syntax elements
//!   it constructs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod converter;
pub mod element;
pub mod syntax;
pub mod types;

pub use converter::{ConversionPath, ConverterFn, ConverterGraph};
pub use element::{Context, Element, ElementFactory, ParseOutput, Rejection, Slot};
pub use syntax::{Conflict, Priority, RegistrationHandle, SyntaxEntry, SyntaxKind, SyntaxRegistry};
pub use types::{DefaultFn, ParseFn, TypeInfo, TypeRegistry};
