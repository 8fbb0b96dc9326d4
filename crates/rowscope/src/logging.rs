//! Tracing subscriber setup.
//!
//! rowscope emits `tracing` events at its seams: `trace` for every delegated
//! command, `debug` for row binding and resolution, `warn` for construction
//! failures. Test binaries that want to see them install a subscriber once:
//!
//! ```ignore
//! rowscope::init_tracing("rowscope=debug")?;
//! ```

use crate::result::{RowscopeError, RowscopeResult};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber. `RUST_LOG` takes precedence over
/// `default_filter`. Fails if a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> RowscopeResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| RowscopeError::Logging {
            message: format!("invalid filter {default_filter:?}: {e}"),
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .map_err(|e| RowscopeError::Logging {
            message: e.to_string(),
        })
}
