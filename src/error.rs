//! Error types for the injector.

use thiserror::Error;

/// Dependency resolution errors
///
/// Represents the conditions that can occur while building mapping tables or
/// resolving identifiers through an [`Injector`](crate::Injector) chain.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiError, Injector, Mappings, Resolver};
///
/// let root = Injector::new("root", None, Mappings::new());
/// match root.get::<String>("Foo") {
///     Err(DiError::Unresolved { id, injector }) => {
///         assert_eq!(id, "Foo");
///         assert_eq!(injector, "root");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// No exact or wildcard mapping anywhere in the parent chain
    #[error("No mapping for \"{id}\" (resolution ended in injector \"{injector}\")")]
    Unresolved {
        /// The identifier as requested
        id: String,
        /// Name of the injector where resolution bottomed out
        injector: String,
    },
    /// A mapping produced a value of a different type than requested
    #[error("Type mismatch for \"{id}\": expected {expected}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
    },
    /// Identifier is empty or does not start with a type token
    #[error("Invalid identifier: \"{0}\"")]
    InvalidIdentifier(String),
    /// Maximum factory recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A fallible factory reported a failure
    #[error("Factory for \"{id}\" failed: {message}")]
    Factory {
        id: String,
        message: String,
    },
    /// Configuration input could not be interpreted
    #[error("Configuration error: {0}")]
    Config(String),
    /// A hierarchy graph could not be rendered
    #[error("Export error: {0}")]
    Export(String),
}

impl DiError {
    /// Wraps any displayable error raised inside a factory.
    ///
    /// ```rust
    /// use keyed_di::DiError;
    ///
    /// let err = DiError::factory("Database", "connection refused");
    /// assert_eq!(err.to_string(), "Factory for \"Database\" failed: connection refused");
    /// ```
    pub fn factory(id: impl Into<String>, err: impl std::fmt::Display) -> Self {
        DiError::Factory {
            id: id.into(),
            message: err.to_string(),
        }
    }

    /// True when the error means "no mapping exists", as opposed to a
    /// failure while a mapping was being evaluated.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, DiError::Unresolved { .. })
    }
}

/// Result type for injector operations
///
/// A convenience alias for `Result<T, DiError>` used throughout keyed-di.
pub type DiResult<T> = Result<T, DiError>;
