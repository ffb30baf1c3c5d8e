//! Shared application state passed to every handler via Axum's `State` extractor.

use std::sync::Arc;

use crate::build_info::BuildInfo;
use crate::config::Config;

/// Read-only state shared by all requests. Nothing in here is mutated after
/// startup, so handlers can run concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<Config>,
    /// Version/commit/date reported by `GET /version`.
    pub build: BuildInfo,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, build: BuildInfo) -> Self {
        Self {
            config: Arc::new(config),
            build,
        }
    }
}
