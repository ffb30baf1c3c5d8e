//! Placeholder action endpoint.
//!
//! `GET /run` sits behind [`crate::auth::require_run_key`]; by the time the
//! handler runs the caller is authorized.

use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Literal returned in every successful `/run` response.
pub const STUB_RESULT: &str = "stub";

/// Response body for `GET /run`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    /// Wall-clock UTC time of the request, RFC 3339 (`2026-10-16T08:00:00Z`).
    pub timestamp: String,
    /// Always [`STUB_RESULT`].
    pub result: String,
}

impl RunResponse {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            result: STUB_RESULT.to_string(),
        }
    }
}

/// `GET /run`: returns the current timestamp and a fixed `"stub"` result.
pub async fn run() -> Json<RunResponse> {
    Json(RunResponse::at(Utc::now()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 5).unwrap();
        let resp = RunResponse::at(now);
        assert_eq!(resp.timestamp, "2026-10-16T08:30:05Z");
        assert_eq!(resp.result, "stub");
    }
}
