//! Directed value conversions between semantic types.
//!
//! Converters are registered as single edges at load time. When a
//! conversion between two types has no direct edge, a bounded
//! breadth-first search composes a multi-hop path; composed paths are
//! cached (including the negative result) so repeated conversions cost
//! one map lookup.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use incant_foundation::{TypeId, Value};

/// A conversion step from one value to another.
///
/// Returning `None` means the particular value cannot be converted, which
/// eliminates the match candidate being tried, nothing more.
pub type ConverterFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Conversion chains deeper than this are a design smell, not a search
/// space.
const MAX_HOPS: usize = 3;

/// A composed chain of converter steps.
///
/// An empty path is the identity conversion.
#[derive(Clone, Default)]
pub struct ConversionPath {
    steps: Vec<ConverterFn>,
}

impl ConversionPath {
    /// The identity path.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    fn from_steps(steps: Vec<ConverterFn>) -> Self {
        Self { steps }
    }

    /// Number of conversion steps.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.steps.len()
    }

    /// Applies every step in order.
    #[must_use]
    pub fn apply(&self, value: &Value) -> Option<Value> {
        let mut current = value.clone();
        for step in &self.steps {
            current = step(&current)?;
        }
        Some(current)
    }
}

impl fmt::Debug for ConversionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConversionPath({} hops)", self.steps.len())
    }
}

/// Registry of conversion edges with lazily composed multi-hop paths.
#[derive(Default)]
pub struct ConverterGraph {
    edges: HashMap<(TypeId, TypeId), ConverterFn>,
    outgoing: HashMap<TypeId, Vec<TypeId>>,
    /// Composed-path cache. Populated during matching via atomic
    /// insert-if-absent; duplicate computation is acceptable, corruption
    /// is not.
    cache: DashMap<(TypeId, TypeId), Option<ConversionPath>>,
}

impl ConverterGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a conversion edge. Later registrations for the same pair
    /// replace earlier ones.
    pub fn register(
        &mut self,
        from: TypeId,
        to: TypeId,
        convert: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) {
        if self.edges.insert((from, to), Arc::new(convert)).is_none() {
            self.outgoing.entry(from).or_default().push(to);
        }
        self.cache.clear();
    }

    /// True when a (possibly composed) conversion exists.
    #[must_use]
    pub fn converter_exists(&self, from: TypeId, to: TypeId) -> bool {
        self.path(from, to).is_some()
    }

    /// Finds the conversion path between two types, composing and caching
    /// a multi-hop chain when no direct edge exists.
    #[must_use]
    pub fn path(&self, from: TypeId, to: TypeId) -> Option<ConversionPath> {
        if from == to {
            return Some(ConversionPath::identity());
        }
        if let Some(cached) = self.cache.get(&(from, to)) {
            return cached.clone();
        }

        let found = self.search(from, to);
        // Insert-if-absent: a concurrent computation of the same pair may
        // land first, in which case its result wins.
        self.cache
            .entry((from, to))
            .or_insert(found)
            .value()
            .clone()
    }

    /// Converts a value, returning `None` when no path exists or the
    /// value itself resists conversion.
    #[must_use]
    pub fn convert(&self, value: &Value, from: TypeId, to: TypeId) -> Option<Value> {
        self.path(from, to)?.apply(value)
    }

    /// Breadth-first search over the edge set, capped at [`MAX_HOPS`].
    fn search(&self, from: TypeId, to: TypeId) -> Option<ConversionPath> {
        if let Some(direct) = self.edges.get(&(from, to)) {
            return Some(ConversionPath::from_steps(vec![Arc::clone(direct)]));
        }

        let mut predecessor: HashMap<TypeId, TypeId> = HashMap::new();
        let mut queue = VecDeque::from([(from, 0usize)]);

        while let Some((current, hops)) = queue.pop_front() {
            if hops >= MAX_HOPS {
                continue;
            }
            for &next in self.outgoing.get(&current).into_iter().flatten() {
                if next == from || predecessor.contains_key(&next) {
                    continue;
                }
                predecessor.insert(next, current);
                if next == to {
                    return Some(self.reconstruct(from, to, &predecessor));
                }
                queue.push_back((next, hops + 1));
            }
        }
        None
    }

    fn reconstruct(
        &self,
        from: TypeId,
        to: TypeId,
        predecessor: &HashMap<TypeId, TypeId>,
    ) -> ConversionPath {
        let mut route = vec![to];
        let mut current = to;
        while current != from {
            current = predecessor[&current];
            route.push(current);
        }
        route.reverse();

        let steps = route
            .windows(2)
            .map(|pair| Arc::clone(&self.edges[&(pair[0], pair[1])]))
            .collect();
        ConversionPath::from_steps(steps)
    }
}

impl fmt::Debug for ConverterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterGraph")
            .field("edges", &self.edges.len())
            .field("cached_paths", &self.cache.len())
            .finish()
    }
}
