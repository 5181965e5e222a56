//! Mapping descriptors for introspection and diagnostics.

use crate::identifier::Identifier;
use crate::lifetime::Lifetime;
use crate::mapping::Entry;

/// Describes one entry of a mapping table
///
/// # Use Cases
///
/// - **Debugging**: inspect what an injector maps and which singletons
///   have already been promoted
/// - **Validation**: check that expected identifiers are registered
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Injector, Mappings, Lifetime, Resolver};
///
/// let mut mappings = Mappings::new();
/// mappings.add_singleton_factory("Example.Person", |_| "person".to_string());
///
/// let root = Injector::new("root", None, mappings);
/// assert!(!root.descriptors()[0].resolved);
///
/// root.get::<String>("Example.Person").unwrap();
/// let descriptor = &root.descriptors()[0];
/// assert_eq!(descriptor.lifetime, Lifetime::Singleton);
/// assert!(descriptor.resolved);
/// assert_eq!(descriptor.type_tag(), "Example.Person");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDescriptor {
    /// The mapped identifier
    pub id: Identifier,
    /// Lifetime of the entry
    pub lifetime: Lifetime,
    /// Whether the entry already holds a value (constant or promoted singleton)
    pub resolved: bool,
}

impl MappingDescriptor {
    pub(crate) fn new(id: Identifier, entry: &Entry) -> Self {
        Self {
            id,
            lifetime: entry.lifetime(),
            resolved: entry.is_resolved(),
        }
    }

    pub fn type_tag(&self) -> &str {
        self.id.type_tag()
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.id.qualifier()
    }

    /// True when the entry answers every qualified variant of its type.
    pub fn is_wildcard(&self) -> bool {
        !self.id.is_qualified()
    }
}
