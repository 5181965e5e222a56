//! Mapping lifetime definitions.

/// Mapping lifetimes controlling whether evaluated values are cached
///
/// # Lifetime Characteristics
///
/// - **Singleton**: evaluated once per requesting injector, then cached in
///   that injector's own table
/// - **Transient**: evaluated on every lookup, never cached
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Injector, Mappings, Resolver};
/// use std::sync::Arc;
///
/// struct Connection;
/// struct Request;
///
/// let mut mappings = Mappings::new();
/// mappings.add_singleton_factory("Connection", |_| Connection);
/// mappings.add_factory("Request", |_| Request);
///
/// let root = Injector::new("root", None, mappings);
///
/// let c1 = root.get::<Connection>("Connection").unwrap();
/// let c2 = root.get::<Connection>("Connection").unwrap();
/// assert!(Arc::ptr_eq(&c1, &c2));
///
/// let r1 = root.get::<Request>("Request").unwrap();
/// let r2 = root.get::<Request>("Request").unwrap();
/// assert!(!Arc::ptr_eq(&r1, &r2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// One instance per requesting injector
    ///
    /// The first lookup from an injector evaluates the factory and writes
    /// the value into that injector's table. A parent defining the mapping
    /// does not share the cached value with its children: each child that
    /// asks gets (and keeps) its own instance.
    Singleton,
    /// New value per lookup, never cached
    Transient,
}

impl Lifetime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Transient => "transient",
        }
    }
}
