//! Error types for the evictkit library.
//!
//! The hot path is deliberately error-free: a miss is an `Option::None`, a
//! full cache triggers eviction, and a zero-capacity engine degrades to a
//! permanent no-op. Errors only appear at two edges:
//!
//! - [`ConfigError`]: returned by fallible `try_*` constructors when a
//!   user-tunable parameter is invalid (zero shard count, zero aging
//!   threshold).
//! - [`InvariantError`]: returned by `check_invariants` methods on the
//!   engine cores when an internal structural invariant does not hold.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::ConfigError;
//! use evictkit::policy::sharded_lru::ShardedLruCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<ShardedLruCache<u64, String>, ConfigError> =
//!     ShardedLruCache::try_with_shards(100, 4);
//! assert!(cache.is_ok());
//!
//! // Invalid shard count is caught without panicking
//! let bad = ShardedLruCache::<u64, String>::try_with_shards(100, 0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` methods on the engine cores (e.g.
/// [`LruCore::check_invariants`](crate::policy::lru::LruCore::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`ShardedLruCache::try_with_shards`](crate::policy::sharded_lru::ShardedLruCache::try_with_shards)
/// and
/// [`AgingLfuCache::try_with_max_average`](crate::policy::aging_lfu::AgingLfuCache::try_with_max_average).
/// Carries a human-readable description of which parameter failed validation.
///
/// Note that capacity zero is *not* a configuration error: every engine
/// accepts it and degrades to a permanently-missing cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("list length mismatch");
        assert_eq!(err.to_string(), "list length mismatch");
    }

    #[test]
    fn invariant_debug_includes_message() {
        let err = InvariantError::new("dangling slot");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("dangling slot"));
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("shard count must be > 0");
        assert_eq!(err.to_string(), "shard count must be > 0");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }
}
