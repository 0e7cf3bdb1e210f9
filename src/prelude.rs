//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use understudy::prelude::*;
//! ```

// Core
pub use crate::core::errors::{Result, UnderstudyError};

// Context
pub use crate::context::ShadowContext;

// Doubles
pub use crate::double::swap::{SwapDouble, ValueCell};
pub use crate::double::{Double, NoopDouble};

// Manager
pub use crate::manager::{DoubleManager, Selection};

// Scoped activation
pub use crate::scope::{with_applied, with_unapplied};
