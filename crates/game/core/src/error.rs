//! Common error infrastructure for duel-core.
//!
//! Domain-specific errors ([`crate::CatalogError`], [`crate::BattleError`])
//! live next to the code that raises them; this module only provides the
//! shared classification used by callers to pick a recovery strategy.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Validation**: rejected input; state unchanged, do not retry as-is
/// - **Transient**: infrastructure hiccup; the same request may be retried
/// - **Fatal**: the process must not keep serving battles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Validation,
    Transient,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Transient => "transient",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if the same request may succeed when retried.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Common trait for all duel errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait DuelError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics and for transports mapping errors to replies.
    fn error_code(&self) -> &'static str;
}
