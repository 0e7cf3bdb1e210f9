//! The double capability trait and the bundled double variants.

pub mod swap;

use crate::core::errors::Result;

/// A substitute behavior registered under a unique name, with reversible
/// apply/unapply actions.
///
/// `apply` performs the substitution, `unapply` reverses the most recent
/// `apply`. Implementations do not need to self-guard against repeated calls:
/// the [`DoubleManager`](crate::manager::DoubleManager) only calls `apply` on
/// a double it believes is inactive and `unapply` on one it believes is
/// active, so calls made through the manager always pair up.
pub trait Double {
    /// Unique registry name.
    fn name(&self) -> &str;

    /// Perform the substitution.
    fn apply(&mut self) -> Result<()>;

    /// Reverse the most recent [`apply`](Self::apply).
    fn unapply(&mut self) -> Result<()>;
}

/// A double whose apply and unapply succeed and do nothing.
///
/// Useful for exercising manager bookkeeping without touching any state.
#[derive(Debug, Clone)]
pub struct NoopDouble {
    name: String,
}

impl NoopDouble {
    /// Create a no-op double with the given registry name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Double for NoopDouble {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self) -> Result<()> {
        Ok(())
    }

    fn unapply(&mut self) -> Result<()> {
        Ok(())
    }
}
