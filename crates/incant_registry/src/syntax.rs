//! Registered syntax candidates.
//!
//! Each registration bundles the compiled patterns of one syntax element
//! with the factory that constructs it. Registration is append-only
//! during the load phase; candidate order is fixed by priority and
//! registration sequence and never changes afterwards.

use std::collections::HashMap;
use std::fmt;

use incant_pattern::{Pattern, expand};

use crate::element::ElementFactory;

/// The category a syntax element belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// Produces a value.
    Expression,
    /// Evaluates to a truth value.
    Condition,
    /// Performs an action.
    Effect,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression => write!(f, "expression"),
            Self::Condition => write!(f, "condition"),
            Self::Effect => write!(f, "effect"),
        }
    }
}

/// Candidate ordering key: lower values are tried first.
///
/// The named constants are spaced out so embedders can slot their own
/// classes between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u32);

impl Priority {
    /// Plain syntaxes with fully literal anchors.
    pub const SIMPLE: Priority = Priority(100);
    /// Syntaxes combining other expressions.
    pub const COMBINED: Priority = Priority(200);
    /// Property-style syntaxes ("x of y").
    pub const PROPERTY: Priority = Priority(300);
    /// Syntaxes whose patterns match nearly everything; tried last.
    pub const CATCH_ALL: Priority = Priority(400);
}

/// Handle returned by a successful registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(usize);

impl RegistrationHandle {
    /// The registration's index in the registry.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One registered syntax candidate.
#[derive(Clone)]
pub struct SyntaxEntry {
    /// Compiled patterns, tried in order.
    pub patterns: Vec<Pattern>,
    /// The candidate's category.
    pub kind: SyntaxKind,
    /// Constructs the element from a successful parse.
    pub factory: ElementFactory,
    /// Ordering class.
    pub priority: Priority,
    /// Label used in diagnostics, normally the first pattern source.
    pub origin: String,
    seq: usize,
}

impl SyntaxEntry {
    /// Registration sequence number, the tie-break within a priority.
    #[must_use]
    pub const fn seq(&self) -> usize {
        self.seq
    }
}

impl fmt::Debug for SyntaxEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxEntry")
            .field("origin", &self.origin)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("patterns", &self.patterns.len())
            .field("seq", &self.seq)
            .finish()
    }
}

/// A likely registration conflict: two candidates share a literal
/// alternative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// Origin label of the earlier registration.
    pub first: String,
    /// Origin label of the later registration.
    pub second: String,
    /// An alternative both patterns expand to.
    pub alternative: String,
}

/// Append-only collection of syntax candidates, grouped by category.
#[derive(Debug, Default)]
pub struct SyntaxRegistry {
    entries: Vec<SyntaxEntry>,
    /// Entry indices per kind, kept sorted by (priority, seq).
    by_kind: HashMap<SyntaxKind, Vec<usize>>,
}

impl SyntaxRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a candidate. Patterns must already be compiled; the
    /// first pattern's source becomes the diagnostic origin.
    pub fn register(
        &mut self,
        kind: SyntaxKind,
        patterns: Vec<Pattern>,
        priority: Priority,
        factory: ElementFactory,
    ) -> RegistrationHandle {
        let seq = self.entries.len();
        let origin = patterns
            .first()
            .map_or_else(String::new, |p| p.source().to_string());
        self.entries.push(SyntaxEntry {
            patterns,
            kind,
            factory,
            priority,
            origin,
            seq,
        });

        let order = self.by_kind.entry(kind).or_default();
        // Later registrations with equal priority sort after earlier ones,
        // so the insertion point is the first entry with higher priority.
        let at = order.partition_point(|&i| self.entries[i].priority <= priority);
        order.insert(at, seq);

        RegistrationHandle(seq)
    }

    /// The entry behind a handle.
    #[must_use]
    pub fn entry(&self, handle: RegistrationHandle) -> Option<&SyntaxEntry> {
        self.entries.get(handle.0)
    }

    /// Candidates of a category in priority order (stable within equal
    /// priority).
    pub fn candidates(&self, kind: SyntaxKind) -> impl Iterator<Item = &SyntaxEntry> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }

    /// Number of registrations across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scans every category for pairs of registrations whose pattern
    /// expansions share an alternative. Static analysis for load-time
    /// reporting; never consulted while matching.
    #[must_use]
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut found = Vec::new();
        for order in self.by_kind.values() {
            let expanded: Vec<(usize, std::collections::BTreeSet<String>)> = order
                .iter()
                .map(|&i| {
                    let mut alternatives = std::collections::BTreeSet::new();
                    for pattern in &self.entries[i].patterns {
                        alternatives.extend(expand(pattern));
                    }
                    (i, alternatives)
                })
                .collect();

            for (a, (i, left)) in expanded.iter().enumerate() {
                for (j, right) in expanded.iter().skip(a + 1) {
                    if let Some(shared) = left.intersection(right).next() {
                        found.push(Conflict {
                            first: self.entries[*i].origin.clone(),
                            second: self.entries[*j].origin.clone(),
                            alternative: shared.clone(),
                        });
                    }
                }
            }
        }
        found
    }
}
