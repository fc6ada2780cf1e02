//! Interned semantic type identifiers.
//!
//! Semantic types ("number", "text", ...) are registered once at load time
//! and referred to by [`TypeId`] everywhere else, enabling fast equality
//! comparison during matching.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interned semantic type identifier.
///
/// A `TypeId` is handed out by the type registry when a semantic type is
/// registered, and is the only way the matcher and converter graph refer
/// to types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeId(u32);

impl TypeId {
    /// Creates a type identifier from a raw index.
    ///
    /// Intended for the registry that assigns identifiers; elsewhere,
    /// identifiers should come from registration or lookup.
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this type.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
