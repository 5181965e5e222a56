//! # keyed-di
//!
//! String-keyed, hierarchical dependency injection.
//!
//! Values are registered under textual identifiers of the form
//! `"<TypeToken>"` or `"<TypeToken> <qualifier>"` and resolved by a tree of
//! named injectors.
//!
//! ## Features
//!
//! - **Wildcard matching**: a mapping registered as `"Array<Int>"` answers
//!   `"Array<Int> favouriteNumbers"` when no exact mapping exists
//! - **Parent delegation**: misses fall back to the parent injector, up to the root
//! - **Per-requester singletons**: a singleton is evaluated once per
//!   *requesting* injector and cached in that injector's own table
//! - **Thread-safe**: injectors are cheap `Send + Sync` handles; concurrent
//!   first requests for a singleton run its factory once
//! - **Observable**: resolution events can be routed to `tracing`
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_di::{DiError, Injector, Mappings, Resolver};
//!
//! let mut mappings = Mappings::new();
//! mappings
//!     .add_value("StdTypes.Int age", 28i64)
//!     .add_value("String name", "Jason".to_string())
//!     .add_value("Array<StdTypes.Int>", vec![0i64, 1, 2]);
//!
//! let root = Injector::new("root", None, mappings);
//!
//! assert_eq!(*root.get::<i64>("StdTypes.Int age").unwrap(), 28);
//! assert_eq!(*root.get::<String>("String name").unwrap(), "Jason");
//!
//! // No exact mapping: the unqualified "Array<StdTypes.Int>" answers
//! let least = root.get::<Vec<i64>>("Array<StdTypes.Int> leastFavouriteNumbers").unwrap();
//! assert_eq!(*least, vec![0, 1, 2]);
//!
//! // Misses name the injector the lookup ended in
//! match root.get::<String>("Foo") {
//!     Err(DiError::Unresolved { id, injector }) => {
//!         assert_eq!(id, "Foo");
//!         assert_eq!(injector, "root");
//!     }
//!     other => panic!("unexpected: {:?}", other.map(|_| ())),
//! }
//! ```
//!
//! ## Hierarchies and Singletons
//!
//! ```rust
//! use keyed_di::{Injector, Mappings, Resolver};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! static CALLS: AtomicUsize = AtomicUsize::new(0);
//!
//! struct Person;
//!
//! let mut mappings = Mappings::new();
//! mappings.add_singleton_factory("Example.Person", |_| {
//!     CALLS.fetch_add(1, Ordering::SeqCst);
//!     Person
//! });
//! let root = Injector::new("root", None, mappings);
//! let child = root.create_child("child", Mappings::new());
//!
//! let a = child.get::<Person>("Example.Person").unwrap();
//! let b = child.get::<Person>("Example.Person").unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! assert_eq!(CALLS.load(Ordering::SeqCst), 1);
//!
//! // The cached value lives in the child; the root still maps the factory
//! assert!(child.contains_own("Example.Person"));
//! assert!(!root.descriptors()[0].resolved);
//! ```
//!
//! ## Factories with Dependencies
//!
//! Factories receive the requesting injector, so dependencies resolve from
//! the point of view of whoever asked:
//!
//! ```rust
//! use keyed_di::{Injector, Mappings, Resolver};
//!
//! let mut mappings = Mappings::new();
//! mappings.add_factory("String greeting", |inj| {
//!     format!("Hello, {}", inj.get_required::<String>("String name"))
//! });
//! let root = Injector::new("root", None, mappings);
//!
//! let mut child_mappings = Mappings::new();
//! child_mappings.add_value("String name", "Jason".to_string());
//! let child = root.create_child("child", child_mappings);
//!
//! assert_eq!(*child.get::<String>("String greeting").unwrap(), "Hello, Jason");
//! ```

// Module declarations
pub mod collection;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod graph_export;
pub mod identifier;
pub mod injector;
pub mod lifetime;
pub mod mapping;
pub mod observer;
pub mod traits;
pub mod validation;

// Internal modules
mod internal;

// Re-exports
pub use collection::{MappingModule, Mappings, MappingsExt};
pub use config::{InjectorConfig, TryGetPolicy};
pub use descriptors::MappingDescriptor;
pub use error::{DiError, DiResult};
pub use graph_export::{
    DefaultGraphExporter, ExportFormat, GraphExporter, GraphMetadata, HierarchyGraph, InjectorNode, MappingNode,
    ParentEdge,
};
pub use identifier::{id_of, Identifier};
pub use injector::{Injector, Location};
pub use lifetime::Lifetime;
pub use mapping::{AnyArc, Entry, Factory};
pub use observer::{InjectorObserver, LoggingObserver};
pub use traits::{Resolver, ResolverCore};
pub use validation::{ValidationError, ValidationResult, ValidationWarning};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn injector_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Injector>();
        assert_send_sync::<Mappings>();
        assert_send_sync::<DiError>();
    }

    #[test]
    fn resolver_is_usable_as_generic_bound() {
        fn lookup<R: Resolver>(resolver: &R) -> DiResult<Arc<i64>> {
            resolver.get::<i64>("StdTypes.Int age")
        }

        let mut mappings = Mappings::new();
        mappings.add_value("StdTypes.Int age", 28i64);
        let root = Injector::new("root", None, mappings);
        assert_eq!(*lookup(&root).unwrap(), 28);
    }

    #[test]
    fn resolver_core_is_object_safe() {
        let root = Injector::new("root", None, Mappings::new());
        let core: &dyn ResolverCore = &root;
        assert!(core.resolve_any(&"Foo".into()).unwrap_err().is_unresolved());
        assert_eq!(core.try_get_policy(), TryGetPolicy::UnresolvedOnly);
    }
}
