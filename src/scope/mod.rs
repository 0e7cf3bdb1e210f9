//! Scoped activation: apply or unapply a selection for the duration of a
//! block, with the revert guaranteed on exit.
//!
//! Each scope owns exactly one manager frame, so scopes nest LIFO. The revert
//! runs exactly once per scope: on the normal path its error propagates to
//! the caller; if the block panics, a drop guard still performs the revert
//! during unwind (where its own error is necessarily discarded) and the panic
//! continues.

use crate::core::errors::Result;
use crate::manager::{DoubleManager, Selection};

/// Apply `selection` around `block`, reverting on exit.
///
/// ```rust
/// use understudy::double::NoopDouble;
/// use understudy::manager::DoubleManager;
/// use understudy::scope::with_applied;
///
/// let mut manager = DoubleManager::new();
/// manager.register(NoopDouble::new("example"))?;
///
/// with_applied(&mut manager, "example", |manager| {
///     assert!(manager.is_applied("example"));
/// })?;
/// assert!(!manager.is_applied("example"));
/// # Ok::<(), understudy::core::errors::UnderstudyError>(())
/// ```
pub fn with_applied<S, R, F>(manager: &mut DoubleManager, selection: S, block: F) -> Result<R>
where
    S: Into<Selection>,
    F: FnOnce(&mut DoubleManager) -> R,
{
    manager.apply_selected(selection)?;
    run_reverting(manager, block)
}

/// Unapply `selection` around `block`, reverting on exit.
///
/// The mirror of [`with_applied`]: doubles active outside the scope are
/// deactivated inside it and restored afterwards.
pub fn with_unapplied<S, R, F>(manager: &mut DoubleManager, selection: S, block: F) -> Result<R>
where
    S: Into<Selection>,
    F: FnOnce(&mut DoubleManager) -> R,
{
    manager.unapply_selected(selection)?;
    run_reverting(manager, block)
}

/// Guard that reverts the manager's newest frame unless disarmed.
struct RevertGuard<'a> {
    manager: &'a mut DoubleManager,
    armed: bool,
}

impl Drop for RevertGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            // Unwind path: the revert must still happen, its error cannot
            // propagate out of a destructor.
            let _ = self.manager.revert();
        }
    }
}

fn run_reverting<R, F>(manager: &mut DoubleManager, block: F) -> Result<R>
where
    F: FnOnce(&mut DoubleManager) -> R,
{
    let mut guard = RevertGuard {
        manager,
        armed: true,
    };
    let value = block(&mut *guard.manager);
    guard.armed = false;
    guard.manager.revert()?;
    Ok(value)
}
