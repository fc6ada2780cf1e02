//! Per-attempt failure collection.
//!
//! Hundreds of candidates may be tried for a single line; reporting the
//! first or last failure produces misleading errors. Every rejected
//! attempt is recorded instead, and when the whole match fails the record
//! that consumed the most input is surfaced as the closest intended
//! match.

use thiserror::Error;

use incant_registry::{Priority, SyntaxKind};

/// A failed parse, surfaced to the caller.
///
/// Match-time failures are expected and recoverable; the caller decides
/// whether to report them to the script author or try something else.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Failure {
    /// The input was empty or whitespace-only.
    #[error("empty input")]
    EmptyInput,

    /// No candidate matched. The message names the attempted candidate
    /// that got furthest.
    #[error("{message}")]
    NoMatch {
        /// Human-readable reason.
        message: String,
        /// Origin label of the closest candidate, if any was attempted.
        origin: Option<String>,
        /// How much input the closest candidate consumed.
        consumed: usize,
    },

    /// Sub-expression nesting exceeded the engine's depth bound.
    #[error("nesting deeper than {limit} levels while parsing sub-expressions")]
    RecursionLimit {
        /// The configured depth bound.
        limit: usize,
    },
}

/// One recorded candidate rejection.
#[derive(Clone, Debug)]
pub struct FailureRecord {
    /// The candidate's origin label (its pattern source).
    pub origin: String,
    /// The candidate's priority, the tie-break between equally deep
    /// failures.
    pub priority: Priority,
    /// Furthest input offset the attempt reached.
    pub consumed: usize,
    /// Why the candidate was rejected.
    pub message: String,
}

/// Collects every candidate rejection during one top-level match.
///
/// One log per `parse` call; never shared between concurrent matches.
#[derive(Debug, Default)]
pub struct ParseLog {
    records: Vec<FailureRecord>,
    recursion_limited: bool,
}

impl ParseLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one rejected candidate attempt.
    pub fn record(
        &mut self,
        origin: impl Into<String>,
        priority: Priority,
        consumed: usize,
        message: impl Into<String>,
    ) {
        self.records.push(FailureRecord {
            origin: origin.into(),
            priority,
            consumed,
            message: message.into(),
        });
    }

    /// Notes that a sub-expression parse hit the nesting bound. The
    /// failing branch is abandoned; the note survives so a final
    /// no-match can say why.
    pub fn note_recursion_limit(&mut self) {
        self.recursion_limited = true;
    }

    /// True when some branch hit the nesting bound.
    #[must_use]
    pub const fn recursion_limited(&self) -> bool {
        self.recursion_limited
    }

    /// Number of recorded rejections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record that consumed the most input, ties broken by lower
    /// priority value (the more specific candidate).
    #[must_use]
    pub fn best_record(&self) -> Option<&FailureRecord> {
        self.records.iter().reduce(|best, candidate| {
            if candidate.consumed > best.consumed
                || (candidate.consumed == best.consumed && candidate.priority < best.priority)
            {
                candidate
            } else {
                best
            }
        })
    }

    /// Folds the log into the one failure surfaced to the caller.
    #[must_use]
    pub fn into_failure(self, kind: SyntaxKind, input: &str, limit: usize) -> Failure {
        let Some(best) = self.best_record() else {
            if self.recursion_limited {
                return Failure::RecursionLimit { limit };
            }
            return Failure::NoMatch {
                message: format!("'{input}' is not a valid {kind}"),
                origin: None,
                consumed: 0,
            };
        };

        let mut message = format!("'{input}' is not a valid {kind}: {}", best.message);
        if self.recursion_limited {
            message.push_str(" (nesting limit reached in a sub-expression)");
        }
        Failure::NoMatch {
            message,
            origin: Some(best.origin.clone()),
            consumed: best.consumed,
        }
    }
}
