//! Backends behind [`CompilerAdapter`] and the one-time choice between them.

pub mod compiler;
pub mod constants;
pub mod mock;
pub mod tree;

pub use compiler::CompilerBackedAdapter;
pub use mock::MockAdapter;
pub use tree::TreeAdapter;

use crate::config::AdapterKind;
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};
use xtc_api::CompilerAdapter;

/// Builds exactly the requested backend, failing if it cannot start.
pub fn build_adapter(kind: AdapterKind) -> Result<Arc<dyn CompilerAdapter>> {
    let adapter: Arc<dyn CompilerAdapter> = match kind {
        AdapterKind::Compiler => Arc::new(CompilerBackedAdapter::new()?),
        AdapterKind::Tree => Arc::new(TreeAdapter::new()?),
        AdapterKind::Mock => Arc::new(MockAdapter::new()),
    };
    Ok(adapter)
}

/// Builds the requested backend, stepping down the fallback chain until one starts.
/// The mock backend always starts, so this never fails.
pub fn select_adapter(kind: AdapterKind) -> Arc<dyn CompilerAdapter> {
    let mut current = kind;
    loop {
        match build_adapter(current) {
            Ok(adapter) => {
                info!("Using '{}' backend ({})", current, adapter.display_name());
                return adapter;
            }
            Err(e) => match current.fallback() {
                Some(next) => {
                    warn!("Backend '{}' failed to start: {}. Falling back to '{}'", current, e, next);
                    current = next;
                }
                None => {
                    warn!("Backend '{}' failed to start: {}. Using mock backend", current, e);
                    return Arc::new(MockAdapter::new());
                }
            },
        }
    }
}
