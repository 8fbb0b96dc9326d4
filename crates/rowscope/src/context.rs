//! Automation context and switch paths.
//!
//! One [`AutomationContext`] corresponds to one driver session. It is cloned
//! into every scope resolved from it; clones share the driver handle and
//! are never mutated by resolvers or components.

use crate::component::Scope;
use crate::runner::CommandDelegateRunner;
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Ordered selectors that must be entered (frames, shadow hosts) before a
/// bound selector is meaningful
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchPath(Vec<Selector>);

impl SwitchPath {
    /// Empty path (top-level document)
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a scope to enter
    #[must_use]
    pub fn then(mut self, selector: Selector) -> Self {
        self.0.push(selector);
        self
    }

    /// Selectors in traversal order
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.0
    }

    /// Iterate in traversal order
    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.0.iter()
    }

    /// Number of scopes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path targets the top-level document
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Selector>> for SwitchPath {
    fn from(selectors: Vec<Selector>) -> Self {
        Self(selectors)
    }
}

impl FromIterator<Selector> for SwitchPath {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SwitchPath {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SwitchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<top>");
        }
        for (i, selector) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// Driver handle plus session identity for one test execution
#[derive(Debug)]
pub struct AutomationContext<D> {
    runner: CommandDelegateRunner<D>,
    session: String,
}

impl<D> Clone for AutomationContext<D> {
    fn clone(&self) -> Self {
        Self {
            runner: self.runner.clone(),
            session: self.session.clone(),
        }
    }
}

impl<D> AutomationContext<D> {
    /// Create a context owning `driver`, labelled with a random session id
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::from_shared(Arc::new(driver))
    }

    /// Create a context over an already shared driver
    #[must_use]
    pub fn from_shared(driver: Arc<D>) -> Self {
        Self {
            runner: CommandDelegateRunner::from_shared(driver),
            session: Uuid::new_v4().to_string(),
        }
    }

    /// Set the session label
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    /// Session label
    #[must_use]
    pub fn session(&self) -> &str {
        &self.session
    }

    /// Command delegation boundary for this session
    #[must_use]
    pub const fn runner(&self) -> &CommandDelegateRunner<D> {
        &self.runner
    }

    /// Driver handle
    #[must_use]
    pub fn driver(&self) -> &D {
        self.runner.driver()
    }

    /// Scope over `selector` in the top-level document
    #[must_use]
    pub fn scope(&self, selector: Selector) -> Scope<D> {
        Scope::new(self.clone(), selector, SwitchPath::new())
    }

    /// Scope over `selector` reached through `switch_path`
    #[must_use]
    pub fn scope_in(&self, selector: Selector, switch_path: SwitchPath) -> Scope<D> {
        Scope::new(self.clone(), selector, switch_path)
    }
}
