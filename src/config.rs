//! Injector configuration.
//!
//! Settings can be built in code, read from environment variables, or (with
//! the `config` feature) deserialized from JSON.

use std::env;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::identifier::Identifier;

/// Default factory nesting limit. Each nested evaluation costs several
/// frames; 64 levels fit a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Which failures `try_get` / `get_optional` turn into the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum TryGetPolicy {
    /// Any missing mapping yields the fallback, including one needed by a
    /// factory further down; other failures propagate
    #[default]
    UnresolvedOnly,
    /// Only a miss of the requested identifier itself yields the fallback
    RequestedOnly,
    /// Any resolution failure yields the fallback
    AnyError,
}

impl TryGetPolicy {
    /// Whether `err`, raised while resolving `requested`, should be replaced
    /// by the fallback under this policy.
    #[inline]
    pub fn recovers(&self, err: &DiError, requested: &Identifier) -> bool {
        match self {
            TryGetPolicy::UnresolvedOnly => err.is_unresolved(),
            TryGetPolicy::RequestedOnly => {
                matches!(err, DiError::Unresolved { id, .. } if id.as_str() == requested.as_str())
            }
            TryGetPolicy::AnyError => true,
        }
    }
}

impl FromStr for TryGetPolicy {
    type Err = DiError;

    fn from_str(s: &str) -> DiResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unresolved-only" | "unresolved_only" => Ok(TryGetPolicy::UnresolvedOnly),
            "requested-only" | "requested_only" => Ok(TryGetPolicy::RequestedOnly),
            "any-error" | "any_error" => Ok(TryGetPolicy::AnyError),
            other => Err(DiError::Config(format!("unknown try-get policy: {}", other))),
        }
    }
}

/// Per-injector settings
///
/// # Examples
///
/// ```rust
/// use keyed_di::{InjectorConfig, TryGetPolicy};
///
/// let config = InjectorConfig::default()
///     .with_max_depth(64)
///     .with_try_get_policy(TryGetPolicy::AnyError);
///
/// assert_eq!(config.max_depth, 64);
/// assert!(config.wildcard_fallback);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InjectorConfig {
    /// Maximum nesting of factory evaluations on one thread
    pub max_depth: usize,
    /// Whether `"T q"` may be answered by a mapping registered as `"T"`
    pub wildcard_fallback: bool,
    /// Failure classes recovered by `try_get`
    pub try_get_policy: TryGetPolicy,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            wildcard_fallback: true,
            try_get_policy: TryGetPolicy::default(),
        }
    }
}

impl InjectorConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_wildcard_fallback(mut self, enabled: bool) -> Self {
        self.wildcard_fallback = enabled;
        self
    }

    pub fn with_try_get_policy(mut self, policy: TryGetPolicy) -> Self {
        self.try_get_policy = policy;
        self
    }

    /// Reads settings from `<PREFIX>_MAX_DEPTH`, `<PREFIX>_WILDCARD_FALLBACK`
    /// and `<PREFIX>_TRY_GET_POLICY`. Unset variables keep their defaults;
    /// malformed ones are an error.
    pub fn from_env(prefix: &str) -> DiResult<Self> {
        let mut config = Self::default();
        let prefix = prefix.to_uppercase();

        if let Some(raw) = read_var(&prefix, "MAX_DEPTH") {
            config.max_depth = raw
                .trim()
                .parse()
                .map_err(|e| DiError::Config(format!("{}_MAX_DEPTH: {}", prefix, e)))?;
        }
        if let Some(raw) = read_var(&prefix, "WILDCARD_FALLBACK") {
            config.wildcard_fallback = parse_bool(&raw)
                .ok_or_else(|| DiError::Config(format!("{}_WILDCARD_FALLBACK: not a boolean: {}", prefix, raw)))?;
        }
        if let Some(raw) = read_var(&prefix, "TRY_GET_POLICY") {
            config.try_get_policy = raw.parse()?;
        }

        Ok(config)
    }

    /// Deserializes settings from JSON; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::Config(e.to_string()))
    }
}

fn read_var(prefix: &str, name: &str) -> Option<String> {
    let key = if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", prefix, name)
    };
    env::var(key).ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
