//! Row resolution for grids of repeating elements.
//!
//! A [`RowTemplate`] is the bare, reusable half of a resolver: the component
//! factory plus row configuration. Binding it to a [`Scope`] produces a
//! [`RowActions`], which resolves typed rows:
//!
//! ```text
//! RowTemplate<D, K> ──bind(scope)──► RowActions<D, K>
//!                                      │ index(i)   → K over selector + row:nth-of-type(i+1)
//!                                      │ get_row()  → K over selector
//!                                      │ derive_resolver(sel) → RowActions<D, K> over sel
//!                                      ▼
//!                                    ComponentFactory<D, K>::build(scope)
//! ```
//!
//! Grid page objects wrap a `RowActions` and implement [`Resolver`], which
//! gives them `index`, `get_row` and `narrow` returning their own type.

use crate::component::{Component, ComponentFactory, FromScope, Scope};
use crate::config::{IndexBase, RowConfig};
use crate::context::{AutomationContext, SwitchPath};
use crate::driver::AutomationDriver;
use crate::result::{BoxError, RowscopeError, RowscopeResult};
use crate::selector::{ChildFilter, Selector};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Unbound resolver: component factory and row configuration, no scope
pub struct RowTemplate<D, K> {
    factory: Arc<dyn ComponentFactory<D, K>>,
    component: &'static str,
    config: RowConfig,
}

impl<D, K> Clone for RowTemplate<D, K> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            component: self.component,
            config: self.config.clone(),
        }
    }
}

impl<D, K> fmt::Debug for RowTemplate<D, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowTemplate")
            .field("component", &self.component)
            .field("config", &self.config)
            .finish()
    }
}

impl<D, K: Component<D> + 'static> RowTemplate<D, K> {
    /// Template building rows through [`Component::from_scope`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(FromScope::<K>::new())
    }
}

impl<D, K: Component<D> + 'static> Default for RowTemplate<D, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, K> RowTemplate<D, K> {
    /// Template building rows through `factory`
    #[must_use]
    pub fn with_factory(factory: impl ComponentFactory<D, K> + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
            component: std::any::type_name::<K>(),
            config: RowConfig::default(),
        }
    }

    /// Replace the row configuration
    #[must_use]
    pub fn with_config(mut self, config: RowConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the row tag. Checked by [`RowConfig::validate`] whenever a row
    /// filter is built.
    #[must_use]
    pub fn with_row_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.row_tag = tag.into();
        self
    }

    /// Set the index base
    #[must_use]
    pub const fn with_index_base(mut self, base: IndexBase) -> Self {
        self.config.index_base = base;
        self
    }

    /// Row configuration
    #[must_use]
    pub const fn config(&self) -> &RowConfig {
        &self.config
    }

    /// Type name of the components this template builds
    #[must_use]
    pub const fn component_name(&self) -> &'static str {
        self.component
    }

    /// Bind to `scope`, producing a resolver ready for reads
    #[must_use]
    pub fn bind(&self, scope: Scope<D>) -> RowActions<D, K> {
        debug!(
            component = self.component,
            selector = %scope.selector(),
            switch_path = %scope.switch_path(),
            "binding row resolver"
        );
        RowActions {
            template: self.clone(),
            scope,
        }
    }

    /// Bind to a context, selector and switch path
    #[must_use]
    pub fn bind_to(
        &self,
        context: AutomationContext<D>,
        selector: Selector,
        switch_path: SwitchPath,
    ) -> RowActions<D, K> {
        self.bind(Scope::new(context, selector, switch_path))
    }
}

/// Bound resolver over a collection of rows
pub struct RowActions<D, K> {
    template: RowTemplate<D, K>,
    scope: Scope<D>,
}

impl<D, K> Clone for RowActions<D, K> {
    fn clone(&self) -> Self {
        Self {
            template: self.template.clone(),
            scope: self.scope.clone(),
        }
    }
}

impl<D: fmt::Debug, K> fmt::Debug for RowActions<D, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowActions")
            .field("template", &self.template)
            .field("scope", &self.scope)
            .finish()
    }
}

impl<D, K> RowActions<D, K> {
    /// Bound scope
    #[must_use]
    pub const fn scope(&self) -> &Scope<D> {
        &self.scope
    }

    /// Bound selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        self.scope.selector()
    }

    /// Template this resolver was bound from
    #[must_use]
    pub const fn template(&self) -> &RowTemplate<D, K> {
        &self.template
    }

    /// Element kind enumerated by [`index`](Self::index)
    #[must_use]
    pub fn row_tag(&self) -> &str {
        &self.template.config.row_tag
    }

    /// Filter selecting the row at `index`. Fails on an invalid row tag or
    /// an index the index base cannot map.
    pub fn row_filter(&self, index: usize) -> RowscopeResult<ChildFilter> {
        self.template.config.row_filter(index)
    }

    /// Row at `index`, bound to `selector` + `row_tag:nth-of-type(position)`
    pub fn index(&self, index: usize) -> RowscopeResult<K> {
        let filter = self.row_filter(index)?;
        self.row_at(&filter)
    }

    /// Row over the unfiltered selector, for resolvers that already denote
    /// exactly one row
    pub fn get_row(&self) -> RowscopeResult<K> {
        self.build(self.scope.clone())
    }

    /// Replace the bound scope
    pub fn rebind(&mut self, scope: Scope<D>) {
        debug!(
            component = self.template.component,
            from = %self.scope.selector(),
            to = %scope.selector(),
            "rebinding row resolver"
        );
        self.scope = scope;
    }

    /// Replace the bound context, selector and switch path
    pub fn set_context(
        &mut self,
        context: AutomationContext<D>,
        selector: Selector,
        switch_path: SwitchPath,
    ) {
        self.rebind(Scope::new(context, selector, switch_path));
    }

    /// Same-kind resolver bound to `selector`, keeping context, switch path,
    /// factory and row configuration
    #[must_use]
    pub fn derive_resolver(&self, selector: Selector) -> Self {
        self.template.bind(self.scope.with_selector(selector))
    }

    /// Grid page object of type `R` bound to `selector`, built through the
    /// resolver factory of `R`
    pub fn derive<R>(&self, selector: Selector) -> RowscopeResult<R>
    where
        R: Resolver<D, Row = K>,
    {
        construct(R::template().bind(self.scope.with_selector(selector)))
    }

    fn row_at(&self, filter: &ChildFilter) -> RowscopeResult<K> {
        let scope = self.scope.child(filter);
        debug!(
            component = self.template.component,
            filter = %filter,
            selector = %scope.selector(),
            "resolving row"
        );
        self.build(scope)
    }

    fn build(&self, scope: Scope<D>) -> RowscopeResult<K> {
        self.template
            .factory
            .build(scope)
            .map_err(|source| construction_failed(self.template.component, source))
    }
}

/// `row_count` counts every `row_tag` descendant of the bound selector, while
/// row positions are `nth-of-type` within one sibling group. The two agree
/// when the rows share a single parent; bind to a selector matching that one
/// parent (for example `table.orders > tbody:first-of-type`) when a grid
/// splits rows across several groups.
impl<D: AutomationDriver, K> RowActions<D, K> {
    /// Number of rows under the bound selector
    pub fn row_count(&self) -> RowscopeResult<usize> {
        let filter = self.template.config.rows_filter()?;
        self.scope.child(&filter).count()
    }

    /// Every row under the bound selector, in document order
    pub fn all_rows(&self) -> RowscopeResult<Vec<K>> {
        let count = self.row_count()?;
        (1..=count)
            .filter_map(NonZeroUsize::new)
            .map(|position| self.row_at(&ChildFilter::nth_of_kind(self.row_tag(), position)))
            .collect()
    }
}

/// Grid page object built on a [`RowActions`]
///
/// `template` is the zero-argument bare constructor, `from_rows` the bind
/// step. Provided methods return `Self`, so narrowing keeps the concrete
/// grid type.
pub trait Resolver<D>: Sized {
    /// Row component type
    type Row;

    /// Bare template for this grid type
    fn template() -> RowTemplate<D, Self::Row>;

    /// Build the grid from a bound resolver
    fn from_rows(rows: RowActions<D, Self::Row>) -> Result<Self, BoxError>;

    /// Bound resolver backing the grid
    fn rows(&self) -> &RowActions<D, Self::Row>;

    /// Bind a new grid to `scope`
    fn bind(scope: Scope<D>) -> RowscopeResult<Self> {
        construct(Self::template().bind(scope))
    }

    /// Row at `index`
    fn index(&self, index: usize) -> RowscopeResult<Self::Row> {
        self.rows().index(index)
    }

    /// Row over the grid's own selector
    fn get_row(&self) -> RowscopeResult<Self::Row> {
        self.rows().get_row()
    }

    /// Same grid type bound to a narrower selector
    fn narrow(&self, selector: Selector) -> RowscopeResult<Self> {
        self.rows().derive(selector)
    }

    /// Number of rows in the grid
    fn row_count(&self) -> RowscopeResult<usize>
    where
        D: AutomationDriver,
    {
        self.rows().row_count()
    }

    /// Every row in the grid
    fn all_rows(&self) -> RowscopeResult<Vec<Self::Row>>
    where
        D: AutomationDriver,
    {
        self.rows().all_rows()
    }
}

fn construct<D, R: Resolver<D>>(rows: RowActions<D, R::Row>) -> RowscopeResult<R> {
    R::from_rows(rows).map_err(|source| construction_failed(std::any::type_name::<R>(), source))
}

fn construction_failed(component: &'static str, source: BoxError) -> RowscopeError {
    warn!(component, error = %source, "component construction failed");
    RowscopeError::construction(component, source)
}
