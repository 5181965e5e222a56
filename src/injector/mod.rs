//! Injector module for identifier resolution.
//!
//! This module contains the [`Injector`] type: a named mapping table with an
//! optional parent, resolving identifiers by exact match, then wildcard
//! match, then parent delegation.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{InjectorConfig, TryGetPolicy};
use crate::error::{DiError, DiResult};
use crate::identifier::Identifier;
use crate::internal::DepthGuard;
use crate::mapping::{AnyArc, Entry, Factory, MappingTable};
use crate::observer::Observers;
use crate::traits::ResolverCore;
use crate::{MappingDescriptor, Mappings};

mod location;
pub use location::Location;

/// A named, hierarchical, string-keyed resolver.
///
/// Resolution of an identifier `id` requested from injector `R`:
///
/// 1. exact entry for `id` in the current injector,
/// 2. otherwise the entry for the unqualified `id` (its type token) in the
///    current injector,
/// 3. otherwise the same two steps in the parent, and so on to the root,
/// 4. otherwise [`DiError::Unresolved`] naming the root.
///
/// Factories always receive `R`, the injector the request started from, so
/// their own dependencies resolve from `R`'s point of view and singleton
/// values are cached in `R`'s table rather than in the defining ancestor.
///
/// `Injector` is a cheap handle (shared inner state); clones refer to the
/// same table.
///
/// # Examples
///
/// ```
/// use keyed_di::{Injector, Mappings, Resolver};
///
/// let mut mappings = Mappings::new();
/// mappings.add_value("String name", "Jason".to_string());
/// mappings.add_value("Array<Int>", vec![0, 1, 2]);
/// let root = Injector::new("root", None, mappings);
///
/// // Wildcard fallback: "Array<Int>" answers every qualified variant
/// let least = root.get::<Vec<i32>>("Array<Int> leastFavouriteNumbers").unwrap();
/// assert_eq!(*least, vec![0, 1, 2]);
///
/// // Parent delegation
/// let child = root.create_child("child", Mappings::new());
/// assert_eq!(*child.get::<String>("String name").unwrap(), "Jason");
/// ```
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

struct InjectorInner {
    name: String,
    parent: Option<Injector>,
    table: MappingTable,
    config: InjectorConfig,
    observers: Observers,
}

// Where a lookup landed, before evaluation
pub(crate) struct Found<'a> {
    pub(crate) owner: &'a Injector,
    pub(crate) matched: Identifier,
    pub(crate) entry: Entry,
    pub(crate) wildcard: bool,
}

impl Injector {
    /// Creates an injector.
    ///
    /// A child inherits its parent's configuration and observers; observers
    /// registered on `mappings` are added to the inherited ones.
    pub fn new(name: impl Into<String>, parent: Option<Injector>, mappings: Mappings) -> Self {
        let config = parent
            .as_ref()
            .map(|p| p.inner.config.clone())
            .unwrap_or_default();
        Self::with_config(name, parent, mappings, config)
    }

    /// Creates an injector with explicit configuration.
    pub fn with_config(
        name: impl Into<String>,
        parent: Option<Injector>,
        mappings: Mappings,
        config: InjectorConfig,
    ) -> Self {
        let (entries, own_observers) = mappings.into_parts();
        let mut observers = Observers::new();
        if let Some(p) = &parent {
            observers.extend(&p.inner.observers);
        }
        observers.extend(&own_observers);

        Self {
            inner: Arc::new(InjectorInner {
                name: name.into(),
                parent,
                table: MappingTable::new(entries),
                config,
                observers,
            }),
        }
    }

    /// Creates a child injector whose misses fall back to this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_di::{Injector, Mappings, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Session;
    ///
    /// let mut mappings = Mappings::new();
    /// mappings.add_singleton_factory("Session", |_| Session);
    /// let root = Injector::new("root", None, mappings);
    ///
    /// let a = root.create_child("a", Mappings::new());
    /// let b = root.create_child("b", Mappings::new());
    ///
    /// // Each requesting child caches its own instance
    /// let a1 = a.get::<Session>("Session").unwrap();
    /// let a2 = a.get::<Session>("Session").unwrap();
    /// let b1 = b.get::<Session>("Session").unwrap();
    /// assert!(Arc::ptr_eq(&a1, &a2));
    /// assert!(!Arc::ptr_eq(&a1, &b1));
    /// ```
    pub fn create_child(&self, name: impl Into<String>, mappings: Mappings) -> Injector {
        Injector::new(name, Some(self.clone()), mappings)
    }

    /// Name used in diagnostics and errors.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&Injector> {
        self.inner.parent.as_ref()
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.inner.config
    }

    /// Number of ancestors (0 for a root injector).
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Iterates over this injector and then each ancestor up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Injector> {
        std::iter::successors(Some(self), |&injector| injector.parent())
    }

    /// True when both handles refer to the same injector.
    pub fn same(&self, other: &Injector) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Resolves an identifier to its type-erased value.
    ///
    /// Prefer the typed methods of [`Resolver`](crate::Resolver).
    pub fn get_any(&self, id: impl Into<Identifier>) -> DiResult<AnyArc> {
        self.resolve(&id.into())
    }

    /// Evaluates `factory` once for `id` on behalf of this (requesting)
    /// injector and caches the value in this injector's own table.
    ///
    /// Later lookups of `id` on this injector return the cached `Arc`
    /// without evaluating any factory. Parents and siblings are not
    /// touched. Concurrent first calls evaluate the factory only once.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_di::{AnyArc, DiResult, Identifier, Injector, Mappings, Resolver};
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// let calls = AtomicUsize::new(0);
    /// let factory = |_: &Injector, _: &Identifier| -> DiResult<AnyArc> {
    ///     calls.fetch_add(1, Ordering::SeqCst);
    ///     Ok(Arc::new("built".to_string()))
    /// };
    ///
    /// let root = Injector::new("root", None, Mappings::new());
    /// let first = root.get_singleton(&factory, "Example.Person").unwrap();
    /// let second = root.get::<String>("Example.Person").unwrap();
    ///
    /// assert_eq!(*second, "built");
    /// assert_eq!(calls.load(Ordering::SeqCst), 1);
    /// assert!(Arc::ptr_eq(&first.downcast::<String>().unwrap(), &second));
    /// ```
    pub fn get_singleton<F>(&self, factory: &F, id: impl Into<Identifier>) -> DiResult<AnyArc>
    where
        F: Factory + ?Sized,
    {
        let id = id.into();
        let slot = self.inner.table.promotion_slot(&id);
        let cell = slot.lock();

        let cached = cell.borrow().clone();
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = {
            let _guard = DepthGuard::enter(self.inner.config.max_depth)?;
            factory.create(self, &id)?
        };

        // A reentrant evaluation on this thread may have finished first
        let cached = cell.borrow().clone();
        if let Some(existing) = cached {
            return Ok(existing);
        }
        *cell.borrow_mut() = Some(value.clone());
        self.inner.table.promote(id.clone(), value.clone());
        drop(cell);

        if self.inner.observers.has_observers() {
            self.inner.observers.promoted(&id, self.name());
        }
        Ok(value)
    }

    /// Reports where `id` would resolve, without evaluating anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_di::{Injector, Mappings};
    ///
    /// let mut mappings = Mappings::new();
    /// mappings.add_value("Array<Int>", vec![0, 1, 2]);
    /// let root = Injector::new("root", None, mappings);
    /// let child = root.create_child("child", Mappings::new());
    ///
    /// let location = child.locate("Array<Int> leastFavouriteNumbers").unwrap();
    /// assert_eq!(location.injector, "root");
    /// assert_eq!(location.matched.as_str(), "Array<Int>");
    /// assert!(location.wildcard);
    /// assert!(child.locate("Foo").is_none());
    /// ```
    pub fn locate(&self, id: impl Into<Identifier>) -> Option<Location> {
        let id = id.into();
        id.validate().ok()?;
        self.find(&id).ok().map(Location::from_found)
    }

    /// Whether `id` has a mapping somewhere in the chain.
    pub fn can_resolve(&self, id: impl Into<Identifier>) -> bool {
        self.locate(id).is_some()
    }

    /// Describes this injector's own table (not its ancestors').
    pub fn descriptors(&self) -> Vec<MappingDescriptor> {
        self.inner
            .table
            .snapshot()
            .into_iter()
            .map(|(id, entry)| MappingDescriptor::new(id, &entry))
            .collect()
    }

    /// Whether this injector's own table has an entry for `id`.
    pub fn contains_own(&self, id: impl Into<Identifier>) -> bool {
        self.inner.table.contains(&id.into())
    }

    pub fn len(&self) -> usize {
        self.inner.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Injector Debug ===\n");
        for injector in self.ancestors() {
            s.push_str(&format!("Injector \"{}\":\n", injector.name()));
            for d in injector.descriptors() {
                s.push_str(&format!(
                    "  {}: {}{}\n",
                    d.id,
                    d.lifetime.as_str(),
                    if d.resolved { " (resolved)" } else { "" }
                ));
            }
        }
        s
    }

    fn resolve(&self, id: &Identifier) -> DiResult<AnyArc> {
        id.validate()?;

        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return self.resolve_in_chain(id);
        }

        let start = Instant::now();
        observers.resolving(id, self.name());
        let result = self.resolve_in_chain(id);
        match &result {
            Ok(_) => observers.resolved(id, self.name(), start.elapsed()),
            // Misses of nested dependencies were reported by their own lookup
            Err(DiError::Unresolved { id: missing, injector }) if missing == id.as_str() => {
                observers.unresolved(id, injector)
            }
            Err(_) => {}
        }
        result
    }

    fn resolve_in_chain(&self, id: &Identifier) -> DiResult<AnyArc> {
        match self.find(id) {
            Ok(found) => self.evaluate(found.entry, &found.matched),
            Err(terminal) => Err(DiError::Unresolved {
                id: id.to_string(),
                injector: terminal.name().to_string(),
            }),
        }
    }

    /// Walks the chain for `id`; on a miss returns the root it ended at.
    pub(crate) fn find(&self, id: &Identifier) -> Result<Found<'_>, &Injector> {
        let wildcard = id.wildcard();
        let mut current = self;
        loop {
            let table = &current.inner.table;
            if let Some(entry) = table.get(id) {
                return Ok(Found { owner: current, matched: id.clone(), entry, wildcard: false });
            }
            if current.inner.config.wildcard_fallback {
                if let Some(wid) = &wildcard {
                    if let Some(entry) = table.get(wid) {
                        return Ok(Found { owner: current, matched: wid.clone(), entry, wildcard: true });
                    }
                }
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return Err(current),
            }
        }
    }

    // Evaluates on behalf of `self`, the requesting injector
    fn evaluate(&self, entry: Entry, id: &Identifier) -> DiResult<AnyArc> {
        match entry {
            Entry::Resolved(value) => Ok(value),
            Entry::Transient(factory) => {
                let _guard = DepthGuard::enter(self.inner.config.max_depth)?;
                factory.create(self, id)
            }
            Entry::Singleton(factory) => self.get_singleton(factory.as_ref(), id),
        }
    }
}

impl ResolverCore for Injector {
    fn resolve_any(&self, id: &Identifier) -> DiResult<AnyArc> {
        self.resolve(id)
    }

    fn try_get_policy(&self) -> TryGetPolicy {
        self.inner.config.try_get_policy
    }
}

impl crate::traits::Resolver for Injector {}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(Injector::name))
            .field("mappings", &self.inner.table.len())
            .finish()
    }
}
