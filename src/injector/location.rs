use crate::identifier::Identifier;
use crate::lifetime::Lifetime;

use super::Found;

/// Where an identifier would resolve, as reported by
/// [`Injector::locate`](crate::Injector::locate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Name of the injector owning the matching entry
    pub injector: String,
    /// The identifier actually matched (the unqualified one for a wildcard hit)
    pub matched: Identifier,
    /// True when the match came from wildcard fallback
    pub wildcard: bool,
    pub lifetime: Lifetime,
    /// True when the entry already holds a value
    pub resolved: bool,
}

impl Location {
    pub(crate) fn from_found(found: Found<'_>) -> Self {
        Self {
            injector: found.owner.name().to_string(),
            lifetime: found.entry.lifetime(),
            resolved: found.entry.is_resolved(),
            matched: found.matched,
            wildcard: found.wildcard,
        }
    }
}
