//! Shadow context: a stack of key→value frames with dynamic-scoped shadowing.
//!
//! Reading a key searches frames newest-first; writing always lands in the
//! top frame; popping a frame discards its writes and exposes whatever value
//! was visible below. This gives apply/unapply a free, composable undo log —
//! each nested activation scope owns one frame.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::errors::{Result, UnderstudyError};

#[cfg(test)]
mod test_properties;

/// A stack of shadowing frames.
///
/// The stack always holds at least one frame: the base frame is created at
/// construction and can never be popped. Keys absent from every frame read as
/// the caller-supplied default, without mutating any frame.
///
/// Frames are `BTreeMap`s so every iteration order ([`keys`](Self::keys),
/// [`items`](Self::items), popped frames) is deterministic.
#[derive(Debug)]
pub struct ShadowContext<K, V> {
    default: fn() -> V,
    stack: Vec<BTreeMap<K, V>>,
}

impl<K: Ord + Clone, V: Clone> ShadowContext<K, V> {
    /// Create a context with a single base frame and the given zero-value
    /// factory for absent keys.
    #[must_use]
    pub fn new(default: fn() -> V) -> Self {
        Self {
            default,
            stack: vec![BTreeMap::new()],
        }
    }

    /// The visible value for `key`: the newest frame that contains it wins;
    /// absent everywhere yields the default.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        for frame in self.stack.iter().rev() {
            if let Some(value) = frame.get(key) {
                return value.clone();
            }
        }
        (self.default)()
    }

    /// Write `value` into the top frame only.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(top) = self.stack.last_mut() {
            top.insert(key, value);
        }
    }

    /// Bulk [`set`](Self::set) into the top frame; does not push.
    pub fn update(&mut self, values: impl IntoIterator<Item = (K, V)>) {
        if let Some(top) = self.stack.last_mut() {
            top.extend(values);
        }
    }

    /// Append a new empty frame. No upper bound.
    pub fn push(&mut self) {
        self.stack.push(BTreeMap::new());
    }

    /// Remove and return the top frame.
    ///
    /// Fails with [`UnderstudyError::EmptyStack`] when only the protected
    /// base frame remains.
    pub fn pop(&mut self) -> Result<BTreeMap<K, V>> {
        if self.stack.len() == 1 {
            return Err(UnderstudyError::EmptyStack);
        }
        self.stack.pop().ok_or(UnderstudyError::EmptyStack)
    }

    /// Union of keys across all frames, sorted.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<K> {
        self.stack
            .iter()
            .flat_map(|frame| frame.keys().cloned())
            .collect()
    }

    /// Every key paired with its visible value, sorted by key.
    #[must_use]
    pub fn items(&self) -> Vec<(K, V)> {
        self.keys()
            .into_iter()
            .map(|key| {
                let value = self.get(&key);
                (key, value)
            })
            .collect()
    }

    /// Number of frames currently on the stack (≥ 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
