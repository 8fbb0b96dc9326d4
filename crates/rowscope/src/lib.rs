//! Rowscope: Typed Page Objects for Grids of Rows
//!
//! Rowscope resolves strongly typed row components out of a grid selector
//! and routes every UI action through a single command delegation boundary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌──────────────┐  bind   ┌──────────────┐  index(i)           │
//! │   │ RowTemplate  │────────►│ RowActions   │──────────► K        │
//! │   │ factory+conf │         │ + Scope      │  get_row()          │
//! │   └──────────────┘         └──────┬───────┘                     │
//! │                                   │ component actions           │
//! │                                   ▼                             │
//! │                      ┌─────────────────────────┐                │
//! │                      │ CommandDelegateRunner   │──► driver      │
//! │                      └─────────────────────────┘                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rowscope::prelude::*;
//!
//! let ctx = AutomationContext::new(driver);
//! let rows = RowTemplate::<_, Element<_>>::new()
//!     .with_row_tag("tr")
//!     .bind(ctx.scope(Selector::css("table.orders tbody")));
//!
//! let first = rows.index(0)?;   // table.orders tbody tr:nth-of-type(1)
//! first.click()?;
//! ```

#![warn(missing_docs)]

mod component;
mod config;
mod context;
mod driver;
mod logging;
mod result;
mod rows;
mod runner;
mod selector;

pub use component::{Component, ComponentFactory, Element, FromScope, Scope};
pub use config::{IndexBase, RowConfig, DEFAULT_ROW_TAG};
pub use context::{AutomationContext, SwitchPath};
pub use driver::{AutomationDriver, DriverError, DriverResult, MockDriver, MockElement};
pub use logging::init_tracing;
pub use result::{BoxError, RowscopeError, RowscopeResult};
pub use rows::{Resolver, RowActions, RowTemplate};
pub use runner::CommandDelegateRunner;
pub use selector::{ChildFilter, Selector};

/// Derive [`Component`] for page-object structs
#[cfg(feature = "derive")]
pub use rowscope_derive::Component;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::component::*;
    pub use super::config::*;
    pub use super::context::*;
    pub use super::driver::*;
    pub use super::result::*;
    pub use super::rows::*;
    pub use super::runner::*;
    pub use super::selector::*;
}
