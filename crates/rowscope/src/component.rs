//! Components: typed handles bound to one scope.
//!
//! A [`Scope`] is the `{context, selector, switch_path}` triple every
//! component is built from. Types opt into resolution by implementing
//! [`Component`]; resolvers build them through a [`ComponentFactory`],
//! either the type's own [`Component::from_scope`] (via [`FromScope`]) or
//! any closure `Fn(Scope<D>) -> Result<K, E>`.
//!
//! # Example
//!
//! ```ignore
//! struct OrderRow<D> {
//!     scope: Scope<D>,
//!     total: Element<D>,
//! }
//!
//! impl<D> Component<D> for OrderRow<D> {
//!     fn from_scope(scope: Scope<D>) -> Result<Self, BoxError> {
//!         let total = Element::new(scope.child_css("td.total"));
//!         Ok(Self { scope, total })
//!     }
//!
//!     fn scope(&self) -> &Scope<D> {
//!         &self.scope
//!     }
//! }
//! ```

use crate::context::{AutomationContext, SwitchPath};
use crate::driver::{AutomationDriver, DriverResult};
use crate::result::{BoxError, RowscopeResult};
use crate::selector::{ChildFilter, Selector};
use std::fmt;
use std::marker::PhantomData;

/// Context, selector and switch path a component is bound to
#[derive(Debug)]
pub struct Scope<D> {
    context: AutomationContext<D>,
    selector: Selector,
    switch_path: SwitchPath,
}

impl<D> Clone for Scope<D> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            selector: self.selector.clone(),
            switch_path: self.switch_path.clone(),
        }
    }
}

impl<D> Scope<D> {
    /// Create a scope
    #[must_use]
    pub const fn new(
        context: AutomationContext<D>,
        selector: Selector,
        switch_path: SwitchPath,
    ) -> Self {
        Self {
            context,
            selector,
            switch_path,
        }
    }

    /// Automation context
    #[must_use]
    pub const fn context(&self) -> &AutomationContext<D> {
        &self.context
    }

    /// Bound selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Switch path entered before the selector applies
    #[must_use]
    pub const fn switch_path(&self) -> &SwitchPath {
        &self.switch_path
    }

    /// Same context and switch path over a different selector
    #[must_use]
    pub fn with_selector(&self, selector: Selector) -> Self {
        Self::new(self.context.clone(), selector, self.switch_path.clone())
    }

    /// Scope over descendants matching `filter`
    #[must_use]
    pub fn child(&self, filter: &ChildFilter) -> Self {
        self.with_selector(self.selector.derive_child(filter))
    }

    /// Scope over descendants matching a CSS fragment
    #[must_use]
    pub fn child_css(&self, css: &str) -> Self {
        self.child(&ChildFilter::css(css))
    }
}

impl<D: AutomationDriver> Scope<D> {
    /// Enter the switch path, then run `op` on the bound selector, through
    /// the context's command delegation boundary
    fn perform<R>(&self, op: impl FnOnce(&D, &Selector) -> DriverResult<R>) -> RowscopeResult<R> {
        self.context
            .runner()
            .run(|driver| {
                driver.switch_to(&self.switch_path)?;
                op(driver, &self.selector)
            })
            .map_err(Into::into)
    }

    /// Click the element
    pub fn click(&self) -> RowscopeResult<()> {
        self.perform(|d, s| d.click(s))
    }

    /// Replace the element's value
    pub fn fill(&self, value: &str) -> RowscopeResult<()> {
        self.perform(|d, s| d.fill(s, value))
    }

    /// Visible text of the element
    pub fn text(&self) -> RowscopeResult<String> {
        self.perform(|d, s| d.text(s))
    }

    /// Whether the element is displayed
    pub fn is_visible(&self) -> RowscopeResult<bool> {
        self.perform(|d, s| d.is_visible(s))
    }

    /// Attribute value, `None` when absent
    pub fn attribute(&self, name: &str) -> RowscopeResult<Option<String>> {
        self.perform(|d, s| d.attribute(s, name))
    }

    /// Number of elements matching the selector
    pub fn count(&self) -> RowscopeResult<usize> {
        self.perform(|d, s| d.count(s))
    }
}

/// A typed handle bound to one scope
pub trait Component<D>: Sized {
    /// Build the component from its scope
    fn from_scope(scope: Scope<D>) -> Result<Self, BoxError>;

    /// Scope the component is bound to
    fn scope(&self) -> &Scope<D>;

    /// Bound selector
    fn selector<'a>(&'a self) -> &'a Selector
    where
        D: 'a,
    {
        self.scope().selector()
    }
}

/// Builds components of type `K` from a scope
pub trait ComponentFactory<D, K> {
    /// Build a component bound to `scope`
    fn build(&self, scope: Scope<D>) -> Result<K, BoxError>;
}

impl<D, K, E, F> ComponentFactory<D, K> for F
where
    F: Fn(Scope<D>) -> Result<K, E>,
    E: Into<BoxError>,
{
    fn build(&self, scope: Scope<D>) -> Result<K, BoxError> {
        self(scope).map_err(Into::into)
    }
}

/// Factory deferring to [`Component::from_scope`]
pub struct FromScope<K>(PhantomData<fn() -> K>);

impl<K> FromScope<K> {
    /// Create the factory
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K> Default for FromScope<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for FromScope<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for FromScope<K> {}

impl<K> fmt::Debug for FromScope<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FromScope<{}>", std::any::type_name::<K>())
    }
}

impl<D, K: Component<D>> ComponentFactory<D, K> for FromScope<K> {
    fn build(&self, scope: Scope<D>) -> Result<K, BoxError> {
        K::from_scope(scope)
    }
}

/// Leaf component for a single element
#[derive(Debug)]
pub struct Element<D> {
    scope: Scope<D>,
}

impl<D> Clone for Element<D> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
        }
    }
}

impl<D> Element<D> {
    /// Bind an element to `scope`
    #[must_use]
    pub const fn new(scope: Scope<D>) -> Self {
        Self { scope }
    }
}

impl<D: AutomationDriver> Element<D> {
    /// Click the element
    pub fn click(&self) -> RowscopeResult<()> {
        self.scope.click()
    }

    /// Replace the element's value
    pub fn fill(&self, value: &str) -> RowscopeResult<()> {
        self.scope.fill(value)
    }

    /// Visible text of the element
    pub fn text(&self) -> RowscopeResult<String> {
        self.scope.text()
    }

    /// Whether the element is displayed
    pub fn is_visible(&self) -> RowscopeResult<bool> {
        self.scope.is_visible()
    }

    /// Attribute value, `None` when absent
    pub fn attribute(&self, name: &str) -> RowscopeResult<Option<String>> {
        self.scope.attribute(name)
    }
}

impl<D> Component<D> for Element<D> {
    fn from_scope(scope: Scope<D>) -> Result<Self, BoxError> {
        Ok(Self::new(scope))
    }

    fn scope(&self) -> &Scope<D> {
        &self.scope
    }
}
