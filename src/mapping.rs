//! Mapping entries and the per-injector mapping table.

use std::any::Any;
use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::error::DiResult;
use crate::identifier::Identifier;
use crate::lifetime::Lifetime;
use crate::Injector;

// Type-erased Arc for storage
pub type AnyArc = Arc<dyn Any + Send + Sync>;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// A function producing a value for an identifier.
///
/// Factories receive the *requesting* injector (the one `get` was called
/// on, which may be a descendant of the injector that owns the mapping) and
/// the identifier that matched. For a wildcard match that is the unqualified
/// identifier, not the one originally requested.
///
/// Any `Fn(&Injector, &Identifier) -> DiResult<AnyArc>` closure is a factory.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Factory, Identifier, Injector, Mappings, Lifetime, Resolver, DiResult, AnyArc};
/// use std::sync::Arc;
///
/// struct Greeting;
///
/// impl Factory for Greeting {
///     fn create(&self, injector: &Injector, _id: &Identifier) -> DiResult<AnyArc> {
///         let name = injector.get::<String>("String name")?;
///         Ok(Arc::new(format!("Hello, {}", name)))
///     }
/// }
///
/// let mut mappings = Mappings::new();
/// mappings.add_value("String name", "Jason".to_string());
/// mappings.add_mapping("String greeting", Greeting, Lifetime::Transient);
///
/// let root = Injector::new("root", None, mappings);
/// assert_eq!(*root.get::<String>("String greeting").unwrap(), "Hello, Jason");
/// ```
pub trait Factory: Send + Sync {
    fn create(&self, injector: &Injector, id: &Identifier) -> DiResult<AnyArc>;
}

impl<F> Factory for F
where
    F: Fn(&Injector, &Identifier) -> DiResult<AnyArc> + Send + Sync,
{
    #[inline]
    fn create(&self, injector: &Injector, id: &Identifier) -> DiResult<AnyArc> {
        self(injector, id)
    }
}

/// One slot of a mapping table.
#[derive(Clone)]
pub enum Entry {
    /// Evaluated on every lookup
    Transient(Arc<dyn Factory>),
    /// Evaluated once per requesting injector, then promoted to `Resolved`
    /// in that injector's table
    Singleton(Arc<dyn Factory>),
    /// A constant, or the cached result of a singleton promotion
    Resolved(AnyArc),
}

impl Entry {
    pub fn lifetime(&self) -> Lifetime {
        match self {
            Entry::Transient(_) => Lifetime::Transient,
            Entry::Singleton(_) | Entry::Resolved(_) => Lifetime::Singleton,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Entry::Resolved(_))
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::Transient(_) => f.write_str("Transient(..)"),
            Entry::Singleton(_) => f.write_str("Singleton(..)"),
            Entry::Resolved(_) => f.write_str("Resolved(..)"),
        }
    }
}

// Serializes first construction of a singleton per identifier. Reentrant so
// a factory that (directly or not) asks for itself recurses into the depth
// guard instead of deadlocking.
pub(crate) type PromotionSlot = ReentrantMutex<RefCell<Option<AnyArc>>>;

/// Mapping table owned by one injector.
///
/// Locks are held only for the lookup or the write itself, never while a
/// factory runs.
pub(crate) struct MappingTable {
    entries: RwLock<Map<Identifier, Entry>>,
    promotions: Mutex<Map<Identifier, Arc<PromotionSlot>>>,
}

impl MappingTable {
    pub(crate) fn new(entries: Map<Identifier, Entry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            promotions: Mutex::new(Map::default()),
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: &Identifier) -> Option<Entry> {
        self.entries.read().get(id).cloned()
    }

    #[inline]
    pub(crate) fn contains(&self, id: &Identifier) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Returns the promotion slot for `id`, creating it on first use.
    pub(crate) fn promotion_slot(&self, id: &Identifier) -> Arc<PromotionSlot> {
        self.promotions
            .lock()
            .entry(id.clone())
            .or_insert_with(|| Arc::new(ReentrantMutex::new(RefCell::new(None))))
            .clone()
    }

    /// Overwrites (or inserts) the entry for `id` with a cached value.
    pub(crate) fn promote(&self, id: Identifier, value: AnyArc) {
        self.entries.write().insert(id, Entry::Resolved(value));
    }

    /// Snapshot of all entries, sorted by identifier.
    pub(crate) fn snapshot(&self) -> Vec<(Identifier, Entry)> {
        let mut all: Vec<_> = self
            .entries
            .read()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
