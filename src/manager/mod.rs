//! Double manager: named registry, include/exclude selection, once-only
//! batch apply/unapply, and frame-based revert.
//!
//! The manager owns every registered double plus a [`ShadowContext`] of
//! boolean "is applied" flags. Each apply/unapply call pushes exactly one
//! context frame — even when nothing changes — so every call is
//! independently revertible, and nested activation scopes unwind LIFO.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::context::ShadowContext;
use crate::core::errors::{Result, UnderstudyError};
use crate::double::Double;

/// The include/exclude specification resolving to a concrete set of double
/// names for one call.
///
/// A bare name converts to a one-element include:
///
/// ```rust
/// use understudy::manager::Selection;
///
/// assert_eq!(Selection::from("example"), Selection::include(["example"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every registered double.
    #[default]
    All,
    /// Exactly the named doubles, in the given order.
    Include(Vec<String>),
    /// Every registered double except the named ones.
    Exclude(Vec<String>),
}

impl Selection {
    /// An include selection over the given names.
    pub fn include<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::Include(names.into_iter().map(Into::into).collect())
    }

    /// An exclude selection over the given names.
    pub fn exclude<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::Exclude(names.into_iter().map(Into::into).collect())
    }

    /// Build a selection from the optional include/exclude pair form.
    ///
    /// Both absent means "all"; supplying both fails with
    /// [`UnderstudyError::ConflictingSelection`].
    pub fn from_parts<I, E>(include: Option<I>, exclude: Option<E>) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        match (include, exclude) {
            (Some(_), Some(_)) => Err(UnderstudyError::ConflictingSelection),
            (Some(names), None) => Ok(Self::include(names)),
            (None, Some(names)) => Ok(Self::exclude(names)),
            (None, None) => Ok(Self::All),
        }
    }
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        Self::Include(vec![name.to_owned()])
    }
}

impl From<String> for Selection {
    fn from(name: String) -> Self {
        Self::Include(vec![name])
    }
}

impl From<Vec<String>> for Selection {
    fn from(names: Vec<String>) -> Self {
        Self::Include(names)
    }
}

impl From<Vec<&str>> for Selection {
    fn from(names: Vec<&str>) -> Self {
        Self::include(names)
    }
}

impl From<&[&str]> for Selection {
    fn from(names: &[&str]) -> Self {
        Self::include(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Selection {
    fn from(names: [&str; N]) -> Self {
        Self::include(names)
    }
}

/// The two batch actions; each flips flags toward its desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Apply,
    Unapply,
}

impl Action {
    const fn wants_applied(self) -> bool {
        matches!(self, Self::Apply)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Unapply => "unapply",
        }
    }
}

/// Applies each double once (and only once).
///
/// Register doubles, then apply or unapply them as needed. Applying a
/// previously-applied double does nothing, and likewise for unapplying one
/// that is not applied. [`revert`](Self::revert) returns the doubles to the
/// state they were in before the previous apply/unapply call.
pub struct DoubleManager {
    registry: BTreeMap<String, Box<dyn Double>>,
    applieds: ShadowContext<String, bool>,
}

impl fmt::Debug for DoubleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleManager")
            .field("registered", &self.registry.keys().collect::<Vec<_>>())
            .field("applied", &self.applied())
            .field("pending_reverts", &self.pending_reverts())
            .finish()
    }
}

impl Default for DoubleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubleManager {
    /// An empty manager with no registered doubles and a clean flag context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: BTreeMap::new(),
            applieds: ShadowContext::new(bool::default),
        }
    }

    /// Register a double under its own name.
    ///
    /// The registry is append-only for the manager's lifetime; registering a
    /// name twice fails with [`UnderstudyError::DuplicateName`].
    pub fn register(&mut self, double: impl Double + 'static) -> Result<()> {
        let name = double.name().to_owned();
        if self.registry.contains_key(&name) {
            return Err(UnderstudyError::DuplicateName { name });
        }
        debug!(double = %name, "registered double");
        self.registry.insert(name, Box::new(double));
        Ok(())
    }

    /// Registered double names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.registry.keys().map(String::as_str).collect()
    }

    /// Whether a double with this name is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Expand a selection into the concrete list of double names to work on.
    ///
    /// `All` and `Exclude` walk the registry in sorted name order; `Include`
    /// keeps the caller's order with first-occurrence dedup. Every
    /// include/exclude name must be registered, otherwise
    /// [`UnderstudyError::UnknownDouble`].
    pub fn resolve_selection(&self, selection: &Selection) -> Result<Vec<String>> {
        match selection {
            Selection::All => Ok(self.registry.keys().cloned().collect()),
            Selection::Include(names) => {
                let mut seen = BTreeSet::new();
                let mut resolved = Vec::with_capacity(names.len());
                for name in names {
                    if !self.registry.contains_key(name) {
                        return Err(UnderstudyError::unknown(name));
                    }
                    if seen.insert(name.as_str()) {
                        resolved.push(name.clone());
                    }
                }
                Ok(resolved)
            }
            Selection::Exclude(names) => {
                let mut excluded = BTreeSet::new();
                for name in names {
                    if !self.registry.contains_key(name) {
                        return Err(UnderstudyError::unknown(name));
                    }
                    excluded.insert(name.as_str());
                }
                Ok(self
                    .registry
                    .keys()
                    .filter(|name| !excluded.contains(name.as_str()))
                    .cloned()
                    .collect())
            }
        }
    }

    /// Names of all currently-applied doubles, sorted, derived fresh from the
    /// flag context.
    #[must_use]
    pub fn applied(&self) -> Vec<String> {
        self.applieds
            .items()
            .into_iter()
            .filter_map(|(name, applied)| applied.then_some(name))
            .collect()
    }

    /// Whether the named double is currently applied.
    #[must_use]
    pub fn is_applied(&self, name: &str) -> bool {
        self.applieds.get(name)
    }

    /// Outstanding apply/unapply frames that [`revert`](Self::revert) can
    /// still undo.
    #[must_use]
    pub fn pending_reverts(&self) -> usize {
        self.applieds.depth() - 1
    }

    /// Apply every selected double that is not already applied.
    ///
    /// Pushes one flag frame, calls `apply` on each double whose visible flag
    /// is false, and returns the names actually changed, in selection order.
    pub fn apply_selected(&mut self, selection: impl Into<Selection>) -> Result<Vec<String>> {
        self.manage(&selection.into(), Action::Apply)
    }

    /// Unapply every selected double that is currently applied.
    ///
    /// Symmetric to [`apply_selected`](Self::apply_selected).
    pub fn unapply_selected(&mut self, selection: impl Into<Selection>) -> Result<Vec<String>> {
        self.manage(&selection.into(), Action::Unapply)
    }

    fn manage(&mut self, selection: &Selection, action: Action) -> Result<Vec<String>> {
        let targets = self.resolve_selection(selection)?;

        // One frame per call, even when the changed set ends up empty.
        self.applieds.push();

        let wants = action.wants_applied();
        let mut changed = Vec::new();
        for name in targets {
            if self.applieds.get(&name) == wants {
                continue;
            }
            let double = self
                .registry
                .get_mut(&name)
                .ok_or_else(|| UnderstudyError::unknown(&name))?;
            match action {
                Action::Apply => double.apply()?,
                Action::Unapply => double.unapply()?,
            }
            self.applieds.set(name.clone(), wants);
            changed.push(name);
        }

        debug!(
            action = action.as_str(),
            changed = changed.len(),
            depth = self.applieds.depth(),
            "processed double batch"
        );
        Ok(changed)
    }

    /// Return the doubles to the state they were in before the most recent
    /// apply/unapply call.
    ///
    /// Pops the newest flag frame and replays it backwards: every double the
    /// frame had applied is unapplied, and vice versa. Fails with
    /// [`UnderstudyError::NothingToRevert`] when no unreverted call remains.
    pub fn revert(&mut self) -> Result<()> {
        let frame = self
            .applieds
            .pop()
            .map_err(|_| UnderstudyError::NothingToRevert)?;

        for (name, was_applied) in frame.into_iter().rev() {
            let double = self
                .registry
                .get_mut(&name)
                .ok_or_else(|| UnderstudyError::unknown(&name))?;
            if was_applied {
                double.unapply()?;
            } else {
                double.apply()?;
            }
        }

        debug!(depth = self.applieds.depth(), "reverted activation frame");
        Ok(())
    }
}
