//! Mapping modules for grouped registration.

use crate::{DiResult, Mappings};

/// A reusable group of registrations.
///
/// # Example
///
/// ```rust
/// use keyed_di::{DiResult, Injector, MappingModule, Mappings, MappingsExt, Resolver};
///
/// struct PersonDefaults;
///
/// impl MappingModule for PersonDefaults {
///     fn register(self, mappings: &mut Mappings) -> DiResult<()> {
///         mappings.add_value("String name", "Jason".to_string());
///         mappings.add_value("StdTypes.Int age", 28i64);
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mappings = Mappings::new().with_module(PersonDefaults)?;
/// let root = Injector::new("root", None, mappings);
/// assert_eq!(*root.get::<i64>("StdTypes.Int age")?, 28);
/// # Ok(())
/// # }
/// ```
pub trait MappingModule {
    /// Register this module's mappings.
    fn register(self, mappings: &mut Mappings) -> DiResult<()>;
}

/// Extension trait for owned, chained module registration.
pub trait MappingsExt {
    /// Applies a module and returns the builder.
    fn with_module<M: MappingModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl MappingsExt for Mappings {
    fn with_module<M: MappingModule>(mut self, module: M) -> DiResult<Self> {
        module.register(&mut self)?;
        Ok(self)
    }
}

impl<F> MappingModule for F
where
    F: FnOnce(&mut Mappings) -> DiResult<()>,
{
    fn register(self, mappings: &mut Mappings) -> DiResult<()> {
        self(mappings)
    }
}
