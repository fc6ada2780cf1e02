//! Pattern expansion for static analysis.
//!
//! [`expand`] enumerates every literal alternative a pattern can match by
//! choosing one branch per choice and including or excluding each optional
//! group. Placeholders and regex elements become a wildcard marker. The
//! result is used to detect registrations whose patterns collide; it is
//! never consulted during live matching.

use std::collections::BTreeSet;

use crate::ast::{Pattern, PatternNode};

/// Marker substituted for placeholders and regex elements in expansions.
pub const WILDCARD: &str = "*";

/// Expands a compiled pattern into its full set of literal alternatives.
///
/// The walk is bottom-up, so each group's alternative set is computed
/// exactly once regardless of how often the parent combines it.
#[must_use]
pub fn expand(pattern: &Pattern) -> BTreeSet<String> {
    expand_node(pattern.root())
        .into_iter()
        .map(|alt| alt.trim().to_string())
        .collect()
}

fn expand_node(node: &PatternNode) -> BTreeSet<String> {
    match node {
        PatternNode::Literal(text) => BTreeSet::from([text.clone()]),
        PatternNode::Sequence(children) => {
            let mut alternatives = BTreeSet::from([String::new()]);
            for child in children {
                alternatives = cross(&alternatives, &expand_node(child));
            }
            alternatives
        }
        PatternNode::Optional(child) => {
            let mut alternatives = expand_node(child);
            alternatives.insert(String::new());
            alternatives
        }
        PatternNode::Choice(branches) => {
            let mut alternatives = BTreeSet::new();
            for branch in branches {
                alternatives.extend(expand_node(&branch.body));
            }
            alternatives
        }
        PatternNode::Placeholder(_) | PatternNode::Regex(_) => {
            BTreeSet::from([WILDCARD.to_string()])
        }
    }
}

/// Cartesian product of two alternative sets, joining with
/// doubled-space trimming so excluded optionals do not leave gaps.
fn cross(left: &BTreeSet<String>, right: &BTreeSet<String>) -> BTreeSet<String> {
    let mut combined = BTreeSet::new();
    for first in left {
        for second in right {
            combined.insert(join(first, second));
        }
    }
    combined
}

fn join(first: &str, second: &str) -> String {
    if first.is_empty() {
        return second.trim_start().to_string();
    }
    if second.is_empty() {
        return first.trim_end().to_string();
    }
    if first.ends_with(' ') && second.starts_with(' ') {
        return format!("{first}{}", second.trim_start());
    }
    format!("{first}{second}")
}
