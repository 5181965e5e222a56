//! Identifier value object used as the resolution key.

use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Resolution key of the form `"<Type> [<qualifier>]"`.
///
/// The type token is everything up to the first whitespace character; the
/// qualifier (usually a parameter or field name) is whatever follows it.
/// Equality and hashing use the full text, so `"Array<Int>"` and
/// `"Array<Int> leastFavouriteNumbers"` are distinct keys. The unqualified
/// form is what wildcard fallback looks up.
///
/// # Examples
///
/// ```rust
/// use keyed_di::Identifier;
///
/// let id = Identifier::from("Array<StdTypes.Int> leastFavouriteNumbers");
/// assert_eq!(id.type_tag(), "Array<StdTypes.Int>");
/// assert_eq!(id.qualifier(), Some("leastFavouriteNumbers"));
/// assert_eq!(id.wildcard().unwrap().as_str(), "Array<StdTypes.Int>");
///
/// let plain = Identifier::from("String");
/// assert!(plain.wildcard().is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    raw: Arc<str>,
    // Byte offset of the first whitespace character, if any
    split: Option<usize>,
}

impl Identifier {
    /// Builds an identifier from a type token and an optional qualifier.
    pub fn new(type_tag: &str, qualifier: Option<&str>) -> Self {
        match qualifier {
            Some(q) => Self::from_raw(format!("{} {}", type_tag, q)),
            None => Self::from_raw(type_tag.to_string()),
        }
    }

    /// Parses and validates an identifier.
    ///
    /// Fails with [`DiError::InvalidIdentifier`] for empty text or text that
    /// starts with whitespace (no type token).
    pub fn parse(text: &str) -> DiResult<Self> {
        let id = Self::from_raw(text.to_string());
        id.validate()?;
        Ok(id)
    }

    fn from_raw(raw: String) -> Self {
        let split = raw.find(char::is_whitespace);
        Self {
            raw: Arc::from(raw),
            split,
        }
    }

    pub(crate) fn validate(&self) -> DiResult<()> {
        if self.raw.is_empty() || self.split == Some(0) {
            return Err(DiError::InvalidIdentifier(self.raw.to_string()));
        }
        Ok(())
    }

    /// The full identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The type token (text before the first whitespace).
    pub fn type_tag(&self) -> &str {
        match self.split {
            Some(at) => &self.raw[..at],
            None => &self.raw,
        }
    }

    /// The qualifier, if the identifier has one.
    pub fn qualifier(&self) -> Option<&str> {
        let at = self.split?;
        let ws = self.raw[at..].chars().next().map_or(1, char::len_utf8);
        Some(&self.raw[at + ws..])
    }

    pub fn is_qualified(&self) -> bool {
        self.split.is_some()
    }

    /// The unqualified identifier used for wildcard fallback, or `None`
    /// when this identifier has no qualifier.
    pub fn wildcard(&self) -> Option<Identifier> {
        self.split.map(|at| Self::from_raw(self.raw[..at].to_string()))
    }

    /// Returns a copy of this identifier's type token with a new qualifier.
    pub fn qualified(&self, qualifier: &str) -> Identifier {
        Self::new(self.type_tag(), Some(qualifier))
    }
}

impl From<&str> for Identifier {
    fn from(text: &str) -> Self {
        Self::from_raw(text.to_string())
    }
}

impl From<String> for Identifier {
    fn from(text: String) -> Self {
        Self::from_raw(text)
    }
}

impl From<&Identifier> for Identifier {
    fn from(id: &Identifier) -> Self {
        id.clone()
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({:?})", &*self.raw)
    }
}

// Helper for identifiers derived from Rust type names
#[inline]
pub fn id_of<T: ?Sized + 'static>() -> Identifier {
    Identifier::from(std::any::type_name::<T>())
}
