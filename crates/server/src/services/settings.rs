//! Configuration provider for transport credentials and tunables.
//!
//! Resolution order for every key: persisted `system_settings` row, then the
//! process environment, then the caller's default. Channel adapters never read
//! this chain directly; the dispatcher resolves a credential snapshot once per
//! run and hands it to the adapters at construction.

use sqlx::PgPool;

use crate::db;

/// Substrings that mark a credential value as a placeholder rather than a
/// real secret. Checked case-insensitively.
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "replace", "placeholder", "example"];

/// Resolves settings with the precedence chain: database row, process
/// environment, literal default.
#[derive(Clone)]
pub struct SettingsProvider {
    pool: PgPool,
}

impl SettingsProvider {
    /// Create a new provider backed by the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a setting, falling back to `default` when neither a database
    /// row nor an environment variable is present.
    ///
    /// Database errors degrade to the environment/default fallbacks so a
    /// settings-table hiccup cannot take the send path down.
    pub async fn get(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .await
            .unwrap_or_else(|| default.to_string())
    }

    /// Resolve a setting that has no meaningful default.
    ///
    /// Returns `None` when the key is absent (or empty) in both the settings
    /// table and the environment.
    pub async fn get_optional(&self, key: &str) -> Option<String> {
        match db::settings::get_setting(&self.pool, key).await {
            Ok(Some(value)) if !value.trim().is_empty() => return Some(value),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(key, error = %e, "settings lookup failed, falling back to env");
            }
        }

        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Whether a credential value looks like an unconfigured placeholder.
///
/// Used to warn operators that a transport is "configured" with junk; the
/// value is still passed through so behavior stays predictable.
#[must_use]
pub fn looks_like_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_detection() {
        assert!(looks_like_placeholder("your-api-key-here"));
        assert!(looks_like_placeholder("CHANGEME"));
        assert!(looks_like_placeholder("replace_with_token"));
        assert!(!looks_like_placeholder("AC4f2b9c81d7e6a3f0"));
    }
}
