#![forbid(unsafe_code)]

//! Understudy — test-double lifecycle engine.
//!
//! Register named doubles (substitutes for real behavior), apply and unapply
//! them with once-only semantics, and revert to the exact state before the
//! most recent call:
//!
//! 1. **Shadow context** — a stack of flag frames giving every apply/unapply
//!    call a free, composable undo log
//! 2. **Double manager** — named registry, include/exclude selection,
//!    idempotent batch apply/unapply, frame-based revert
//! 3. **Scoped activation** — apply a selection for the duration of a block
//!    with the revert guaranteed, panics included
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use understudy::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use understudy::manager::{DoubleManager, Selection};
//! use understudy::double::swap::{SwapDouble, ValueCell};
//! ```
//!
//! The design assumes a single logical thread of test execution; nesting, not
//! concurrency, is the supported composition mechanism.

pub mod prelude;

pub mod context;
pub mod core;
pub mod double;
pub mod manager;
pub mod scope;
