//! Up-front validation of the identifiers an application expects to resolve.
//!
//! Resolution is lazy, so a missing mapping normally surfaces only when the
//! first `get` runs. [`Injector::validate`] checks a list of identifiers
//! against an injector chain without evaluating any factory, which lets a
//! misconfigured hierarchy fail at startup instead.

use std::fmt::Write;

use crate::error::{DiError, DiResult};
use crate::identifier::Identifier;
use crate::injector::{Injector, Location};

/// Result of [`Injector::validate`].
///
/// # Examples
///
/// ```
/// use keyed_di::{Injector, Mappings};
///
/// let mut mappings = Mappings::new();
/// mappings.add_value("String name", "Jason".to_string());
/// mappings.add_value("Array<Int>", vec![0, 1, 2]);
/// let root = Injector::new("root", None, mappings);
///
/// let result = root.validate(["String name", "Array<Int> leastFavouriteNumbers", "Foo"]);
/// assert!(!result.is_valid());
/// assert_eq!(result.resolvable.len(), 2);
/// assert_eq!(result.missing().map(|id| id.as_str()).collect::<Vec<_>>(), vec!["Foo"]);
/// assert!(result.has_warnings()); // the wildcard match is reported
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Identifiers that would resolve, with where they resolve
    pub resolvable: Vec<(Identifier, Location)>,
    /// Identifiers that would fail to resolve
    pub errors: Vec<ValidationError>,
    /// Resolvable identifiers whose resolution may be surprising
    pub warnings: Vec<ValidationWarning>,
}

/// An identifier that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No mapping anywhere in the chain
    Missing {
        id: Identifier,
        /// The root injector the lookup ended at
        injector: String,
    },
    /// The identifier is malformed
    Invalid { id: Identifier, reason: String },
}

/// A resolvable identifier worth a second look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Answered by the unqualified mapping rather than an exact one
    WildcardMatch {
        id: Identifier,
        matched: Identifier,
        injector: String,
    },
    /// The owning injector hides a mapping of the same key in an ancestor
    Shadowed {
        id: Identifier,
        injector: String,
        shadowed_in: String,
    },
}

impl ValidationError {
    pub fn id(&self) -> &Identifier {
        match self {
            ValidationError::Missing { id, .. } | ValidationError::Invalid { id, .. } => id,
        }
    }
}

impl From<ValidationError> for DiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Missing { id, injector } => DiError::Unresolved {
                id: id.to_string(),
                injector,
            },
            ValidationError::Invalid { id, .. } => DiError::InvalidIdentifier(id.to_string()),
        }
    }
}

impl ValidationResult {
    /// True when every identifier resolves.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Identifiers with no mapping in the chain.
    pub fn missing(&self) -> impl Iterator<Item = &Identifier> {
        self.errors.iter().filter_map(|e| match e {
            ValidationError::Missing { id, .. } => Some(id),
            ValidationError::Invalid { .. } => None,
        })
    }

    /// Converts into `Ok(())` or the first error as a [`DiError`].
    pub fn into_result(self) -> DiResult<()> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Human-readable report of errors and warnings.
    pub fn format_issues(&self) -> String {
        let mut out = String::new();
        if !self.errors.is_empty() {
            out.push_str("Errors:\n");
            for error in &self.errors {
                let _ = match error {
                    ValidationError::Missing { id, injector } => {
                        writeln!(out, "  - \"{}\" has no mapping (ended in \"{}\")", id, injector)
                    }
                    ValidationError::Invalid { id, reason } => {
                        writeln!(out, "  - \"{}\" is invalid: {}", id, reason)
                    }
                };
            }
        }
        if !self.warnings.is_empty() {
            out.push_str("Warnings:\n");
            for warning in &self.warnings {
                let _ = match warning {
                    ValidationWarning::WildcardMatch { id, matched, injector } => writeln!(
                        out,
                        "  - \"{}\" resolves through wildcard \"{}\" in \"{}\"",
                        id, matched, injector
                    ),
                    ValidationWarning::Shadowed { id, injector, shadowed_in } => writeln!(
                        out,
                        "  - \"{}\" in \"{}\" shadows the mapping in \"{}\"",
                        id, injector, shadowed_in
                    ),
                };
            }
        }
        out
    }
}

impl Injector {
    /// Checks that each identifier resolves from this injector, without
    /// evaluating any factory.
    ///
    /// Identifiers are reported in input order.
    pub fn validate<I, S>(&self, ids: I) -> ValidationResult
    where
        I: IntoIterator<Item = S>,
        S: Into<Identifier>,
    {
        let mut result = ValidationResult::default();

        for id in ids {
            let id = id.into();
            if let Err(err) = id.validate() {
                result.errors.push(ValidationError::Invalid { id, reason: err.to_string() });
                continue;
            }

            let found = match self.find(&id) {
                Ok(found) => found,
                Err(terminal) => {
                    result.errors.push(ValidationError::Missing {
                        id,
                        injector: terminal.name().to_string(),
                    });
                    continue;
                }
            };

            if found.wildcard {
                result.warnings.push(ValidationWarning::WildcardMatch {
                    id: id.clone(),
                    matched: found.matched.clone(),
                    injector: found.owner.name().to_string(),
                });
            }
            let shadowed = found
                .owner
                .ancestors()
                .skip(1)
                .find(|ancestor| ancestor.contains_own(found.matched.clone()));
            if let Some(ancestor) = shadowed {
                result.warnings.push(ValidationWarning::Shadowed {
                    id: found.matched.clone(),
                    injector: found.owner.name().to_string(),
                    shadowed_in: ancestor.name().to_string(),
                });
            }

            result.resolvable.push((id, Location::from_found(found)));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mappings;

    fn chain() -> Injector {
        let mut root_mappings = Mappings::new();
        root_mappings
            .add_value("String name", "Jason".to_string())
            .add_value("Int", 1i64);
        let root = Injector::new("root", None, root_mappings);

        let mut child_mappings = Mappings::new();
        child_mappings.add_value("String name", "Jane".to_string());
        root.create_child("child", child_mappings)
    }

    #[test]
    fn reports_shadowing_and_wildcards() {
        let result = chain().validate(["String name", "Int age"]);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.contains(&ValidationWarning::Shadowed {
            id: "String name".into(),
            injector: "child".into(),
            shadowed_in: "root".into(),
        }));
        assert!(result.warnings.contains(&ValidationWarning::WildcardMatch {
            id: "Int age".into(),
            matched: "Int".into(),
            injector: "root".into(),
        }));
    }

    #[test]
    fn first_error_becomes_di_error() {
        let result = chain().validate(["", "Foo"]);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.clone().into_result(), Err(DiError::InvalidIdentifier(_))));

        let missing = chain().validate(["Foo"]).into_result().unwrap_err();
        assert_eq!(
            missing,
            DiError::Unresolved { id: "Foo".into(), injector: "root".into() }
        );
    }

    #[test]
    fn format_lists_every_issue() {
        let report = chain().validate(["Foo", "Int age"]).format_issues();
        assert!(report.contains("\"Foo\" has no mapping (ended in \"root\")"));
        assert!(report.contains("wildcard \"Int\""));
    }
}
