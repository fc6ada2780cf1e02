//! Compiled pattern trees.
//!
//! A [`Pattern`] is the immutable result of compiling a pattern string.
//! It is owned by the syntax registry entry that compiled it and never
//! mutated afterwards.

use std::fmt;

use incant_foundation::TypeId;

/// A resolved semantic type reference, as seen by the pattern compiler.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedType {
    /// The interned type identifier.
    pub id: TypeId,
    /// True when the name used was the type's singular form.
    pub single: bool,
}

/// Resolves semantic type names (singular or plural) for placeholder
/// compilation.
///
/// Implemented by the type registry; the compiler only needs this one
/// lookup, so the dependency points this way.
pub trait TypeLookup {
    /// Resolves a type name to its identifier, reporting whether the
    /// singular form was used. Returns `None` for unknown names.
    fn resolve_type(&self, name: &str) -> Option<ResolvedType>;
}

/// One accepted type of a placeholder, in declaration order.
#[derive(Clone, Debug)]
pub struct PlaceholderType {
    /// The name exactly as written in the pattern.
    pub name: String,
    /// The resolved type identifier.
    pub id: TypeId,
    /// True when the singular name was used.
    pub single: bool,
}

/// A placeholder slot (`%type%`) in a compiled pattern.
#[derive(Clone, Debug)]
pub struct Placeholder {
    /// Slot index, assigned in left-to-right compile order. Parse results
    /// carry one sub-expression slot per placeholder, aligned by this
    /// index even when optional groups are skipped.
    pub slot: usize,
    /// Accepted types, in declaration order. The first type a nested
    /// parse converts to wins.
    pub types: Vec<PlaceholderType>,
    /// `%-type%`: when the slot is left unfilled, no default value is
    /// required and the result records an absent slot.
    pub optional: bool,
    /// `%~type%`: bare literal text is refused; only registered
    /// expression candidates can fill the slot.
    pub excluded: bool,
}

impl Placeholder {
    /// True when every accepted type was declared in singular form.
    #[must_use]
    pub fn requires_single(&self) -> bool {
        self.types.iter().all(|t| t.single)
    }
}

/// A regular-expression element (`<regex>`) in a compiled pattern.
pub struct RegexElement {
    /// Capture index, assigned in left-to-right compile order.
    pub capture: usize,
    /// The regex source as written in the pattern.
    pub source: String,
    /// The compiled regex, anchored at the element's position.
    pub regex: regex::Regex,
}

impl Clone for RegexElement {
    fn clone(&self) -> Self {
        Self {
            capture: self.capture,
            source: self.source.clone(),
            regex: self.regex.clone(),
        }
    }
}

impl fmt::Debug for RegexElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexElement")
            .field("capture", &self.capture)
            .field("source", &self.source)
            .finish()
    }
}

/// One branch of a choice group.
#[derive(Clone, Debug)]
pub struct ChoiceBranch {
    /// Numeric mark ORed into the parse mark when this branch is chosen.
    pub mark: Option<u32>,
    /// Tag added to the parse tag set when this branch is chosen.
    pub tag: Option<String>,
    /// The branch body.
    pub body: PatternNode,
}

/// A node in a compiled pattern tree.
#[derive(Clone, Debug)]
pub enum PatternNode {
    /// Consecutive parts matched in order.
    Sequence(Vec<PatternNode>),
    /// Literal text, matched case-insensitively with whitespace runs
    /// collapsed.
    Literal(String),
    /// An optional group: the inner match is tried first, exclusion is
    /// the backtrack.
    Optional(Box<PatternNode>),
    /// A mandatory choice between branches, tried in declaration order.
    Choice(Vec<ChoiceBranch>),
    /// A typed sub-expression slot.
    Placeholder(Placeholder),
    /// A regular-expression element.
    Regex(RegexElement),
}

impl PatternNode {
    /// An empty sequence, the body of an empty group or branch.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Sequence(Vec::new())
    }
}

/// An immutable compiled pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    root: PatternNode,
    slot_count: usize,
    capture_count: usize,
}

impl Pattern {
    pub(crate) fn new(
        source: String,
        root: PatternNode,
        slot_count: usize,
        capture_count: usize,
    ) -> Self {
        Self {
            source,
            root,
            slot_count,
            capture_count,
        }
    }

    /// The pattern string this tree was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> &PatternNode {
        &self.root
    }

    /// Number of placeholder slots in the pattern.
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Number of regex captures in the pattern.
    #[must_use]
    pub const fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// All placeholders in slot order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut found = Vec::with_capacity(self.slot_count);
        collect_placeholders(&self.root, &mut found);
        found.sort_by_key(|p| p.slot);
        found
    }
}

fn collect_placeholders<'p>(node: &'p PatternNode, found: &mut Vec<&'p Placeholder>) {
    match node {
        PatternNode::Sequence(children) => {
            for child in children {
                collect_placeholders(child, found);
            }
        }
        PatternNode::Optional(child) => collect_placeholders(child, found),
        PatternNode::Choice(branches) => {
            for branch in branches {
                collect_placeholders(&branch.body, found);
            }
        }
        PatternNode::Placeholder(p) => found.push(p),
        PatternNode::Literal(_) | PatternNode::Regex(_) => {}
    }
}
