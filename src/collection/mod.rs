//! Mapping table construction.
//!
//! This module contains the [`Mappings`] builder used to assemble the
//! identifier → entry table that an [`Injector`] is constructed with.

use std::sync::Arc;

use crate::error::DiResult;
use crate::identifier::Identifier;
use crate::lifetime::Lifetime;
use crate::mapping::{AnyArc, Entry, Factory, Map};
use crate::observer::{InjectorObserver, Observers};
use crate::{Injector, MappingDescriptor};

pub mod module_system;
pub use module_system::*;

/// Builder for an injector's initial mapping table.
///
/// Registering the same identifier twice replaces the earlier entry; the
/// `try_add_*` variants keep the existing one instead.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Injector, Mappings, Resolver};
///
/// let mut mappings = Mappings::new();
/// mappings
///     .add_value("StdTypes.Int age", 28i64)
///     .add_value("String name", "Jason".to_string())
///     .add_factory("Array<StdTypes.Int>", |_| vec![0i64, 1, 2]);
///
/// let root = Injector::new("root", None, mappings);
/// let numbers = root.get::<Vec<i64>>("Array<StdTypes.Int> favouriteNumbers").unwrap();
/// assert_eq!(*numbers, vec![0, 1, 2]);
/// ```
#[derive(Default)]
pub struct Mappings {
    entries: Map<Identifier, Entry>,
    observers: Observers,
}

impl Mappings {
    /// Creates an empty mapping table.
    pub fn new() -> Self {
        Self {
            entries: Map::default(),
            observers: Observers::new(),
        }
    }

    // ----- Values -----

    /// Registers a constant value.
    ///
    /// Every lookup returns the same `Arc`.
    pub fn add_value<T: 'static + Send + Sync>(&mut self, id: impl Into<Identifier>, value: T) -> &mut Self {
        let arc: AnyArc = Arc::new(value);
        self.add_raw(id, Entry::Resolved(arc))
    }

    /// Registers a trait object, resolvable with
    /// [`Resolver::get_trait`](crate::Resolver::get_trait).
    pub fn add_trait_value<T>(&mut self, id: impl Into<Identifier>, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        // Stored as Arc<Arc<dyn Trait>> so the inner Arc can be downcast back
        let arc: AnyArc = Arc::new(value);
        self.add_raw(id, Entry::Resolved(arc))
    }

    // ----- Factories -----

    /// Registers a transient factory, evaluated on every lookup.
    ///
    /// The factory receives the requesting injector to resolve its own
    /// dependencies from.
    pub fn add_factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&Injector) -> T + Send + Sync + 'static,
    {
        self.add_try_factory(id, move |injector| Ok(factory(injector)))
    }

    /// Registers a fallible transient factory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_di::{DiError, Injector, Mappings, Resolver};
    ///
    /// let mut mappings = Mappings::new();
    /// mappings.add_value("String port", "80a".to_string());
    /// mappings.add_try_factory("Int port", |inj| {
    ///     let raw = inj.get::<String>("String port")?;
    ///     raw.parse::<u16>().map_err(|e| DiError::factory("Int port", e))
    /// });
    ///
    /// let root = Injector::new("root", None, mappings);
    /// assert!(matches!(root.get::<u16>("Int port"), Err(DiError::Factory { .. })));
    /// ```
    pub fn add_try_factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&Injector) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_raw(id, Entry::Transient(erase(factory)))
    }

    /// Registers a singleton factory.
    ///
    /// The factory runs at most once per requesting injector; the result is
    /// cached in the table of the injector that asked.
    pub fn add_singleton_factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&Injector) -> T + Send + Sync + 'static,
    {
        self.add_try_singleton_factory(id, move |injector| Ok(factory(injector)))
    }

    /// Registers a fallible singleton factory. A failed evaluation caches
    /// nothing, so the next lookup tries again.
    pub fn add_try_singleton_factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&Injector) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_raw(id, Entry::Singleton(erase(factory)))
    }

    /// Registers a [`Factory`] implementation with an explicit lifetime.
    pub fn add_mapping<F>(&mut self, id: impl Into<Identifier>, factory: F, lifetime: Lifetime) -> &mut Self
    where
        F: Factory + 'static,
    {
        let factory: Arc<dyn Factory> = Arc::new(factory);
        let entry = match lifetime {
            Lifetime::Singleton => Entry::Singleton(factory),
            Lifetime::Transient => Entry::Transient(factory),
        };
        self.add_raw(id, entry)
    }

    /// Inserts an entry as-is, replacing any previous one.
    ///
    /// An identifier that could never be resolved (empty, or starting with
    /// whitespace) is dropped with a warning.
    pub fn add_raw(&mut self, id: impl Into<Identifier>, entry: Entry) -> &mut Self {
        let id = id.into();
        if accepts(&id) {
            self.entries.insert(id, entry);
        }
        self
    }

    // ----- Non-replacing registrations -----

    /// Registers a constant unless the identifier is already mapped.
    /// Returns whether the value was added.
    pub fn try_add_value<T: 'static + Send + Sync>(&mut self, id: impl Into<Identifier>, value: T) -> bool {
        let id = id.into();
        if !accepts(&id) || self.entries.contains_key(&id) {
            return false;
        }
        self.add_value(id, value);
        true
    }

    /// Registers a transient factory unless the identifier is already mapped.
    pub fn try_add_factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&Injector) -> T + Send + Sync + 'static,
    {
        let id = id.into();
        if !accepts(&id) || self.entries.contains_key(&id) {
            return false;
        }
        self.add_factory(id, factory);
        true
    }

    /// Registers a singleton factory unless the identifier is already mapped.
    pub fn try_add_singleton_factory<T, F>(&mut self, id: impl Into<Identifier>, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&Injector) -> T + Send + Sync + 'static,
    {
        let id = id.into();
        if !accepts(&id) || self.entries.contains_key(&id) {
            return false;
        }
        self.add_singleton_factory(id, factory);
        true
    }

    // ----- Observers and modules -----

    /// Registers an observer notified of resolution events on the injector
    /// built from these mappings (and on children created from it).
    pub fn add_observer(&mut self, observer: Arc<dyn InjectorObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Applies a [`MappingModule`]'s registrations.
    pub fn add_module<M: MappingModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register(self)?;
        Ok(self)
    }

    // ----- Introspection -----

    pub fn contains(&self, id: impl Into<Identifier>) -> bool {
        self.entries.contains_key(&id.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describes every registered entry, sorted by identifier.
    pub fn descriptors(&self) -> Vec<MappingDescriptor> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|(id, entry)| MappingDescriptor::new(id.clone(), entry))
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub(crate) fn into_parts(self) -> (Map<Identifier, Entry>, Observers) {
        (self.entries, self.observers)
    }
}

fn accepts(id: &Identifier) -> bool {
    match id.validate() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(target: "keyed_di", %id, error = %err, "ignoring mapping with invalid identifier");
            false
        }
    }
}

impl std::fmt::Debug for Mappings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mappings")
            .field("entries", &self.entries)
            .field("observers", &self.observers.has_observers())
            .finish()
    }
}

// Erases a typed `Fn(&Injector) -> DiResult<T>` into a `Factory`.
fn erase<T, F>(factory: F) -> Arc<dyn Factory>
where
    T: 'static + Send + Sync,
    F: Fn(&Injector) -> DiResult<T> + Send + Sync + 'static,
{
    Arc::new(move |injector: &Injector, _: &Identifier| -> DiResult<AnyArc> {
        let value = factory(injector)?;
        Ok(Arc::new(value) as AnyArc)
    })
}
