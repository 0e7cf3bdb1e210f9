//! UDY-prefixed error types with structured error codes.

#![allow(missing_docs)]

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, UnderstudyError>;

/// Top-level error type for the double lifecycle engine.
///
/// Every failure is surfaced immediately to the caller — activation state is
/// test-correctness-critical, so nothing is retried or silently recovered.
#[derive(Debug, Error)]
pub enum UnderstudyError {
    #[error("[UDY-1001] double '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("[UDY-1002] no double named '{name}' is registered")]
    UnknownDouble { name: String },

    #[error("[UDY-1003] a selection cannot both include and exclude")]
    ConflictingSelection,

    #[error("[UDY-2001] context stack has only its base frame left")]
    EmptyStack,

    #[error("[UDY-2002] no outstanding apply or unapply call to revert")]
    NothingToRevert,

    #[error("[UDY-3001] double '{name}' unapplied without a matching apply")]
    UnexpectedUnapply { name: String },

    #[error("[UDY-3002] swap double '{name}' needs at least one target cell")]
    MissingSwapTarget { name: String },
}

impl UnderstudyError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => "UDY-1001",
            Self::UnknownDouble { .. } => "UDY-1002",
            Self::ConflictingSelection => "UDY-1003",
            Self::EmptyStack => "UDY-2001",
            Self::NothingToRevert => "UDY-2002",
            Self::UnexpectedUnapply { .. } => "UDY-3001",
            Self::MissingSwapTarget { .. } => "UDY-3002",
        }
    }

    /// Convenience constructor for [`UnderstudyError::UnknownDouble`].
    #[must_use]
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownDouble { name: name.into() }
    }
}
