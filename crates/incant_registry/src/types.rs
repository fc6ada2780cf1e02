//! Semantic type descriptors and their registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use incant_foundation::{TypeId, Value};
use incant_pattern::{ResolvedType, TypeLookup};

/// Parses literal text into a value of the described type.
pub type ParseFn = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Supplies the default value used when a mandatory placeholder matched
/// no text.
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Descriptor for one semantic type.
///
/// Registered once at load time and immutable afterwards.
#[derive(Clone)]
pub struct TypeInfo {
    name: String,
    plural: String,
    parser: Option<ParseFn>,
    default_supplier: Option<DefaultFn>,
}

impl TypeInfo {
    /// Creates a descriptor with the given singular and plural names.
    ///
    /// Names are matched case-insensitively when looked up.
    #[must_use]
    pub fn new(name: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plural: plural.into(),
            parser: None,
            default_supplier: None,
        }
    }

    /// Attaches a literal text parser.
    #[must_use]
    pub fn with_parser(
        mut self,
        parser: impl Fn(&str) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Attaches a default value supplier.
    #[must_use]
    pub fn with_default(mut self, supplier: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default_supplier = Some(Arc::new(supplier));
        self
    }

    /// The singular name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The plural name.
    #[must_use]
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Parses literal text, if this type has a parser.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<Value> {
        self.parser.as_ref().and_then(|parse| parse(text))
    }

    /// Produces the default value, if this type has a supplier.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        self.default_supplier.as_ref().map(|supply| supply())
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("plural", &self.plural)
            .field("has_parser", &self.parser.is_some())
            .field("has_default", &self.default_supplier.is_some())
            .finish()
    }
}

/// Registry of semantic types, interning names to [`TypeId`]s.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    infos: Vec<TypeInfo>,
    by_name: HashMap<String, TypeId>,
    by_plural: HashMap<String, TypeId>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type descriptor, returning its identifier.
    ///
    /// Re-registering an existing singular name replaces the descriptor
    /// and keeps the identifier.
    pub fn register(&mut self, info: TypeInfo) -> TypeId {
        let name_key = info.name.to_lowercase();
        let plural_key = info.plural.to_lowercase();

        if let Some(&id) = self.by_name.get(&name_key) {
            let old = &self.infos[id.index() as usize];
            self.by_plural.remove(&old.plural.to_lowercase());
            self.by_plural.insert(plural_key, id);
            self.infos[id.index() as usize] = info;
            return id;
        }

        let id = TypeId::from_index(
            u32::try_from(self.infos.len()).expect("too many registered types"),
        );
        self.infos.push(info);
        self.by_name.insert(name_key, id);
        self.by_plural.insert(plural_key, id);
        id
    }

    /// Looks up a type by singular or plural name, case-insensitively.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        let key = name.to_lowercase();
        self.by_name
            .get(&key)
            .or_else(|| self.by_plural.get(&key))
            .copied()
    }

    /// The descriptor for an identifier.
    #[must_use]
    pub fn info(&self, id: TypeId) -> Option<&TypeInfo> {
        self.infos.get(id.index() as usize)
    }

    /// Human-readable name for an identifier, for diagnostics.
    #[must_use]
    pub fn name_of(&self, id: TypeId) -> &str {
        self.info(id).map_or("<unregistered>", TypeInfo::name)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// True when no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

impl TypeLookup for TypeRegistry {
    fn resolve_type(&self, name: &str) -> Option<ResolvedType> {
        let key = name.to_lowercase();
        if let Some(&id) = self.by_name.get(&key) {
            return Some(ResolvedType { id, single: true });
        }
        if let Some(&id) = self.by_plural.get(&key) {
            return Some(ResolvedType { id, single: false });
        }
        None
    }
}
