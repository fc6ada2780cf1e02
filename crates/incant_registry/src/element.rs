//! The seam between the matcher and the syntax elements it constructs.
//!
//! The matcher produces a [`ParseOutput`] and hands it to the candidate's
//! [`ElementFactory`]. The factory either builds the element (which then
//! owns the output for the lifetime of the parsed line) or returns a
//! [`Rejection`], which the engine treats exactly like a structural
//! mismatch.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use incant_foundation::{TypeId, Value};

use crate::converter::ConversionPath;

/// A constructed syntax element.
///
/// Elements are built by factories from parse results and re-evaluated by
/// the embedding runtime once per trigger firing; this core only needs
/// their declared result type and arity for placeholder compatibility.
pub trait Element: fmt::Debug + Send + Sync {
    /// Semantic type of the value this element produces.
    fn result_type(&self) -> TypeId;

    /// Whether this element produces exactly one value.
    fn is_single(&self) -> bool {
        true
    }

    /// Downcast access for the embedding runtime.
    fn as_any(&self) -> &dyn Any;
}

/// Constructs an element from a successful parse, or rejects it.
pub type ElementFactory =
    Arc<dyn Fn(&ParseOutput, &Context) -> Result<Box<dyn Element>, Rejection> + Send + Sync>;

/// A factory's refusal of a structurally matched parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Human-readable reason, surfaced if no other candidate matches.
    pub reason: String,
}

impl Rejection {
    /// Creates a rejection with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Opaque token threaded through matching for the factories' use.
///
/// The core never interprets the payload.
#[derive(Clone, Default)]
pub struct Context {
    data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context carrying caller data.
    #[must_use]
    pub fn with_data(data: Arc<dyn Any + Send + Sync>) -> Self {
        Self { data: Some(data) }
    }

    /// The caller data, downcast to the expected type.
    #[must_use]
    pub fn data<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.data.as_ref()?.downcast_ref()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

/// One filled (or deliberately unfilled) placeholder slot.
#[derive(Clone, Debug)]
pub enum Slot {
    /// A literal parsed by the type's own text parser; any conversion has
    /// already been applied.
    Literal {
        /// The parsed (and possibly converted) value.
        value: Value,
        /// The semantic type the value was accepted as.
        type_id: TypeId,
    },
    /// A nested expression element; the recorded conversion is applied by
    /// the runtime at evaluation time.
    Expression {
        /// The constructed sub-element.
        element: Arc<dyn Element>,
        /// The type the element produces.
        produced: TypeId,
        /// The placeholder type the element was accepted as.
        accepted: TypeId,
        /// Conversion from `produced` to `accepted`; identity when the
        /// types already agree.
        conversion: ConversionPath,
    },
    /// An optional placeholder left unfilled.
    Absent,
}

impl Slot {
    /// True for an unfilled optional slot.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The semantic type this slot was accepted as.
    #[must_use]
    pub const fn accepted_type(&self) -> Option<TypeId> {
        match self {
            Self::Literal { type_id, .. } => Some(*type_id),
            Self::Expression { accepted, .. } => Some(*accepted),
            Self::Absent => None,
        }
    }

    /// The literal value, for slots filled by a text parser or default
    /// supplier.
    #[must_use]
    pub const fn literal_value(&self) -> Option<&Value> {
        match self {
            Self::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The nested element, for slots filled by an expression candidate.
    #[must_use]
    pub fn element(&self) -> Option<&Arc<dyn Element>> {
        match self {
            Self::Expression { element, .. } => Some(element),
            _ => None,
        }
    }
}

/// The result of one successful structural match.
///
/// Created fresh per attempt, discarded on failure, and owned by the
/// constructed element on success. Fully immutable after construction:
/// marks and tags are ordinary fields, not hidden parser state.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    /// Index of the matched pattern within the candidate's pattern list.
    pub pattern_index: usize,
    /// The input text the match consumed.
    pub matched: String,
    /// One slot per placeholder, in pattern slot order.
    pub slots: Vec<Slot>,
    /// Bitmask accumulated from numbered choice branches.
    pub mark: u32,
    /// Tags collected from tagged choice branches.
    pub tags: BTreeSet<String>,
    /// Text captured by regex elements, in capture order.
    pub captures: Vec<Option<String>>,
}

impl ParseOutput {
    /// The slot at `index`, if the pattern has that many placeholders.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// True when the given tagged branch was chosen.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// The text captured by the regex element at `index`.
    #[must_use]
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index)?.as_deref()
    }
}
