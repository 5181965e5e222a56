//! Resolver traits for identifier resolution.

use std::any::Any;
use std::sync::Arc;

use crate::config::TryGetPolicy;
use crate::error::{DiError, DiResult};
use crate::identifier::Identifier;

/// Core resolver trait for object-safe resolution.
///
/// Most users should use the [`Resolver`] trait instead, which provides
/// typed generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves an identifier to its type-erased value.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The value wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Resolution error (unresolved, invalid id, factory failure, ...)
    fn resolve_any(&self, id: &Identifier) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Which failures the optional resolution methods recover from.
    fn try_get_policy(&self) -> TryGetPolicy {
        TryGetPolicy::UnresolvedOnly
    }
}

/// High-level resolver interface with typed resolution methods.
///
/// # Examples
///
/// ```
/// use keyed_di::{Injector, Mappings, Resolver};
///
/// let mut mappings = Mappings::new();
/// mappings.add_value("StdTypes.Int age", 28i64);
/// mappings.add_value("String name", "Jason".to_string());
///
/// let root = Injector::new("root", None, mappings);
///
/// assert_eq!(*root.get::<i64>("StdTypes.Int age").unwrap(), 28);
/// assert_eq!(*root.get::<String>("String name").unwrap(), "Jason");
/// assert!(root.get_optional::<String>("String nickname").unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves an identifier to a value of type `T`.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<T>)` - The resolved value
    /// * `Err(DiError::Unresolved)` - No mapping in the whole chain
    /// * `Err(DiError::TypeMismatch)` - The mapping produced another type
    fn get<T: 'static + Send + Sync>(&self, id: impl Into<Identifier>) -> DiResult<Arc<T>> {
        let id = id.into();
        let any = self.resolve_any(&id)?;
        any.downcast::<T>().map_err(|_| DiError::TypeMismatch {
            id: id.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Resolves a trait object registered with
    /// [`Mappings::add_trait_value`](crate::Mappings::add_trait_value).
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_di::{Injector, Mappings, Resolver};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { "hello".into() }
    /// }
    ///
    /// let mut mappings = Mappings::new();
    /// mappings.add_trait_value::<dyn Greeter>("Greeter", Arc::new(English));
    ///
    /// let root = Injector::new("root", None, mappings);
    /// assert_eq!(root.get_trait::<dyn Greeter>("Greeter").unwrap().greet(), "hello");
    /// ```
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self, id: impl Into<Identifier>) -> DiResult<Arc<T>> {
        let id = id.into();
        let any = self.resolve_any(&id)?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch {
                id: id.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolves an identifier, panicking on failure.
    ///
    /// Use this when a missing mapping is a configuration bug that should
    /// stop the requesting operation with a descriptive message.
    fn get_required<T: 'static + Send + Sync>(&self, id: impl Into<Identifier>) -> Arc<T> {
        self.get::<T>(id)
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves an identifier, returning `fallback` when resolution ends
    /// without a mapping (for the identifier or for something its factory
    /// needs).
    ///
    /// Which failures yield the fallback depends on the resolver's
    /// [`TryGetPolicy`].
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_di::{Injector, Mappings, Resolver};
    ///
    /// let root = Injector::new("root", None, Mappings::new());
    /// let port = root.try_get::<u16>("Int port", 8080u16).unwrap();
    /// assert_eq!(*port, 8080);
    /// ```
    fn try_get<T: 'static + Send + Sync>(
        &self,
        id: impl Into<Identifier>,
        fallback: impl Into<Arc<T>>,
    ) -> DiResult<Arc<T>> {
        let id = id.into();
        match self.get::<T>(id.clone()) {
            Ok(value) => Ok(value),
            Err(err) if self.try_get_policy().recovers(&err, &id) => Ok(fallback.into()),
            Err(err) => Err(err),
        }
    }

    /// Resolves an identifier, returning `None` when it has no mapping.
    fn get_optional<T: 'static + Send + Sync>(&self, id: impl Into<Identifier>) -> DiResult<Option<Arc<T>>> {
        let id = id.into();
        match self.get::<T>(id.clone()) {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.try_get_policy().recovers(&err, &id) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
