//! Observers for injector resolution events.
//!
//! Observers see every `get` on an injector, including the nested lookups a
//! factory makes: when it starts, when it succeeds, when it ends without a
//! mapping, and when a singleton is promoted into a requesting injector's
//! table.

use std::sync::Arc;
use std::time::Duration;

use crate::identifier::Identifier;

/// Observer trait for resolution events.
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use keyed_di::{Identifier, Injector, InjectorObserver, Mappings, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Misses(Mutex<Vec<String>>);
///
/// impl InjectorObserver for Misses {
///     fn resolving(&self, _id: &Identifier, _injector: &str) {}
///     fn resolved(&self, _id: &Identifier, _injector: &str, _duration: Duration) {}
///     fn unresolved(&self, id: &Identifier, injector: &str) {
///         self.0.lock().unwrap().push(format!("{}@{}", id, injector));
///     }
/// }
///
/// let misses = Arc::new(Misses::default());
/// let mut mappings = Mappings::new();
/// mappings.add_observer(misses.clone());
///
/// let root = Injector::new("root", None, mappings);
/// let _ = root.get::<u32>("Int port");
/// assert_eq!(misses.0.lock().unwrap().as_slice(), ["Int port@root"]);
/// ```
pub trait InjectorObserver: Send + Sync {
    /// Called before the lookup starts.
    ///
    /// * `id` - The identifier being resolved
    /// * `injector` - Name of the requesting injector
    fn resolving(&self, id: &Identifier, injector: &str);

    /// Called after a value was produced.
    fn resolved(&self, id: &Identifier, injector: &str, duration: Duration);

    /// Called when no mapping was found anywhere in the chain.
    ///
    /// `injector` is the name of the injector where resolution bottomed out.
    fn unresolved(&self, id: &Identifier, injector: &str);

    /// Called when a singleton value is cached into `injector`'s table.
    fn promoted(&self, _id: &Identifier, _injector: &str) {}
}

/// Container for registered observers.
///
/// Designed to have minimal overhead when no observers are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn InjectorObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn InjectorObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn extend(&mut self, other: &Observers) {
        self.observers.extend(other.observers.iter().cloned());
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, id: &Identifier, injector: &str) {
        for observer in &self.observers {
            observer.resolving(id, injector);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, id: &Identifier, injector: &str, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(id, injector, duration);
        }
    }

    #[inline]
    pub(crate) fn unresolved(&self, id: &Identifier, injector: &str) {
        for observer in &self.observers {
            observer.unresolved(id, injector);
        }
    }

    #[inline]
    pub(crate) fn promoted(&self, id: &Identifier, injector: &str) {
        for observer in &self.observers {
            observer.promoted(id, injector);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Resolution events are logged at `debug`, promotions at `trace` and
/// missing mappings at `warn`, all under the `keyed_di` target with the
/// identifier and injector name as structured fields.
///
/// # Examples
///
/// ```
/// use keyed_di::{Mappings, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut mappings = Mappings::new();
/// mappings.add_observer(Arc::new(LoggingObserver::new()));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "keyed-di".to_string(),
        }
    }

    /// Creates a logging observer with a custom `source` field.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectorObserver for LoggingObserver {
    fn resolving(&self, id: &Identifier, injector: &str) {
        tracing::debug!(target: "keyed_di", source = %self.prefix, %id, injector, "resolving");
    }

    fn resolved(&self, id: &Identifier, injector: &str, duration: Duration) {
        tracing::debug!(
            target: "keyed_di",
            source = %self.prefix,
            %id,
            injector,
            elapsed_us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            "resolved"
        );
    }

    fn unresolved(&self, id: &Identifier, injector: &str) {
        tracing::warn!(target: "keyed_di", source = %self.prefix, %id, injector, "no mapping");
    }

    fn promoted(&self, id: &Identifier, injector: &str) {
        tracing::trace!(target: "keyed_di", source = %self.prefix, %id, injector, "singleton promoted");
    }
}
