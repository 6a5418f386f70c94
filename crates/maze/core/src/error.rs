//! Common error infrastructure for maze-core.
//!
//! Domain-specific errors (`GenerateError`, `NavigationError`, `StepError`)
//! live next to the code that produces them. This module only provides the
//! shared classification used by callers to decide how to react.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed on retry or with other input
/// - **Validation**: invalid input, must be corrected before retrying
/// - **Internal**: unexpected state inconsistency, indicates a bug
/// - **Fatal**: simulation state can no longer make progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all maze-core errors.
///
/// Implementors derive `thiserror::Error` for Display/Error and classify
/// themselves here by recoverability, not by impact.
pub trait SimError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
