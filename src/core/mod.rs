//! Core types: errors and the shared result alias.

pub mod errors;
