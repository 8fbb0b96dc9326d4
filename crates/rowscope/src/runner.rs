//! Command delegation boundary.
//!
//! Every UI action reaches the driver as a delegate passed through
//! [`CommandDelegateRunner`]. Call sites hand over an `Option` and never
//! check for the absent case themselves:
//!
//! ```ignore
//! runner.execute(Some(|d: &MockDriver| { let _ = d.click(&sel); }));
//! runner.execute(None::<fn(&MockDriver)>); // no-op
//!
//! let text = runner.execute_query(Some(|d: &MockDriver| d.text(&sel)));
//! ```
//!
//! Delegate results and panics pass through untouched.

use std::sync::Arc;
use tracing::trace;

/// Executes caller-supplied actions and queries against a shared driver
#[derive(Debug)]
pub struct CommandDelegateRunner<D> {
    driver: Arc<D>,
}

impl<D> Clone for CommandDelegateRunner<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
        }
    }
}

impl<D> CommandDelegateRunner<D> {
    /// Create a runner owning `driver`
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::from_shared(Arc::new(driver))
    }

    /// Create a runner over an already shared driver
    #[must_use]
    pub const fn from_shared(driver: Arc<D>) -> Self {
        Self { driver }
    }

    /// Driver handle
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run `action` against the driver. `None` does nothing.
    pub fn execute<F>(&self, action: Option<F>)
    where
        F: FnOnce(&D),
    {
        match action {
            Some(action) => self.run(action),
            None => trace!("no action delegate supplied"),
        }
    }

    /// Run `query` against the driver and return its result. `None` returns
    /// `None` without touching the driver.
    pub fn execute_query<R, F>(&self, query: Option<F>) -> Option<R>
    where
        F: FnOnce(&D) -> R,
    {
        match query {
            Some(query) => Some(self.run(query)),
            None => {
                trace!("no query delegate supplied");
                None
            }
        }
    }

    /// Run `delegate` against the driver exactly once
    pub fn run<R, F>(&self, delegate: F) -> R
    where
        F: FnOnce(&D) -> R,
    {
        trace!(delegate = std::any::type_name::<F>(), "executing command delegate");
        delegate(&self.driver)
    }
}
