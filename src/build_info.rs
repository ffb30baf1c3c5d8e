//! Build metadata reported by `GET /version`.
//!
//! Values are injected at compile time through environment variables, e.g.
//!
//! ```sh
//! RUNSTUB_VERSION=v1.2.0 RUNSTUB_COMMIT=$(git rev-parse --short HEAD) \
//!     RUNSTUB_DATE=$(date -u +%Y-%m-%dT%H:%M:%SZ) cargo build --release
//! ```

use serde::Serialize;

/// Version/commit/date strings fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub date: &'static str,
}

impl BuildInfo {
    /// Metadata baked into this binary, with placeholders for unset values.
    pub const fn current() -> Self {
        Self {
            version: match option_env!("RUNSTUB_VERSION") {
                Some(v) => v,
                None => "v0.1.0",
            },
            commit: match option_env!("RUNSTUB_COMMIT") {
                Some(c) => c,
                None => "dev",
            },
            date: match option_env!("RUNSTUB_DATE") {
                Some(d) => d,
                None => "",
            },
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}
