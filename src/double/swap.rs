//! Swap doubles: reversible value substitution through injected cells.
//!
//! The host code reads a value through a [`ValueCell`] handle it was wired
//! with at construction time; a [`SwapDouble`] holding a clone of that handle
//! can then substitute a variant value for the duration of a test and restore
//! the original afterwards. This replaces late-bound global patching with an
//! explicit indirection the test harness controls.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::errors::{Result, UnderstudyError};
use crate::double::Double;

/// A shared, swappable slot for a single value.
///
/// Clones share the same slot, so a cell handed to production code and a
/// clone kept by a [`SwapDouble`] observe the same substitutions.
#[derive(Debug, Default)]
pub struct ValueCell<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for ValueCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ValueCell<T> {
    /// Create a cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    /// Overwrite the stored value.
    pub fn set(&self, value: T) {
        *self.inner.lock() = value;
    }

    /// Swap in `value` and return what was stored before.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.inner.lock(), value)
    }
}

impl<T: Clone> ValueCell<T> {
    /// A copy of the stored value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.lock().clone()
    }
}

/// A double that substitutes a variant value into one or more target cells.
///
/// On apply, every target receives a clone of the variant and the displaced
/// originals are saved in target order. On unapply, the originals are
/// restored in reverse target order. Unapplying with nothing saved fails with
/// [`UnderstudyError::UnexpectedUnapply`] — though the manager's bookkeeping
/// never triggers that for doubles used only through it.
pub struct SwapDouble<T> {
    name: String,
    variant: T,
    targets: Vec<ValueCell<T>>,
    saved: Vec<T>,
}

impl<T> fmt::Debug for SwapDouble<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapDouble")
            .field("name", &self.name)
            .field("targets", &self.targets.len())
            .field("saved", &self.saved.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone> SwapDouble<T> {
    /// Create a swap double over the given target cells.
    ///
    /// Fails with [`UnderstudyError::MissingSwapTarget`] when `targets` is
    /// empty.
    pub fn new(
        name: impl Into<String>,
        variant: T,
        targets: impl IntoIterator<Item = ValueCell<T>>,
    ) -> Result<Self> {
        let name = name.into();
        let targets: Vec<ValueCell<T>> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(UnderstudyError::MissingSwapTarget { name });
        }
        Ok(Self {
            name,
            variant,
            targets,
            saved: Vec::new(),
        })
    }

    /// Create a swap double over a single target cell.
    pub fn single(name: impl Into<String>, variant: T, target: ValueCell<T>) -> Result<Self> {
        Self::new(name, variant, [target])
    }

    /// Number of originals currently saved (one per target per open apply).
    #[must_use]
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }
}

impl<T: Clone> Double for SwapDouble<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self) -> Result<()> {
        for target in &self.targets {
            self.saved.push(target.replace(self.variant.clone()));
        }
        Ok(())
    }

    fn unapply(&mut self) -> Result<()> {
        if self.saved.len() < self.targets.len() {
            return Err(UnderstudyError::UnexpectedUnapply {
                name: self.name.clone(),
            });
        }
        for target in self.targets.iter().rev() {
            let Some(original) = self.saved.pop() else {
                return Err(UnderstudyError::UnexpectedUnapply {
                    name: self.name.clone(),
                });
            };
            target.set(original);
        }
        Ok(())
    }
}
