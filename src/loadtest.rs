//! Closed-loop load generator for `GET /run`.
//!
//! Each virtual user repeatedly issues `GET /run`, records the outcome, then
//! sleeps for the configured pause until the deadline passes. A request
//! "passes" when the service answers `200` or `401`: both mean the router and
//! auth gate are responding as designed.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::client::{ClientError, RunstubClient};

/// Shape of a load run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Concurrent virtual users.
    pub vus: usize,
    /// Wall-clock length of the run.
    pub duration: Duration,
    /// Sleep between consecutive requests of one user.
    pub pause: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            vus: 10,
            duration: Duration::from_secs(30),
            pause: Duration::from_millis(500),
        }
    }
}

/// Tally of request outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total: u64,
    pub ok: u64,
    pub unauthorized: u64,
    pub other_status: u64,
    pub transport_errors: u64,
}

impl LoadReport {
    /// Record the outcome of a single request.
    pub fn record(&mut self, outcome: &Result<StatusCode, ClientError>) {
        self.total += 1;
        match outcome {
            Ok(StatusCode::OK) => self.ok += 1,
            Ok(StatusCode::UNAUTHORIZED) => self.unauthorized += 1,
            Ok(status) => {
                debug!("Unexpected status {status}");
                self.other_status += 1;
            }
            Err(e) => {
                debug!("Request failed: {e}");
                self.transport_errors += 1;
            }
        }
    }

    /// Fold another user's tally into this one.
    pub fn merge(&mut self, other: &LoadReport) {
        self.total += other.total;
        self.ok += other.ok;
        self.unauthorized += other.unauthorized;
        self.other_status += other.other_status;
        self.transport_errors += other.transport_errors;
    }

    /// Requests answered with `200` or `401`.
    pub fn passed(&self) -> u64 {
        self.ok + self.unauthorized
    }

    /// Fraction of passing requests (1.0 for an empty run).
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.passed() as f64 / self.total as f64
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total
    }

    /// JSON summary printed by `runstub-load`.
    pub fn summary(&self) -> Value {
        json!({
            "total": self.total,
            "ok": self.ok,
            "unauthorized": self.unauthorized,
            "other_status": self.other_status,
            "transport_errors": self.transport_errors,
            "pass_rate": self.pass_rate(),
        })
    }
}

/// Instant at which a run of `duration` starting now ends. `None` when the
/// duration is too large to represent, meaning the run never times out.
pub fn deadline_after(duration: Duration) -> Option<Instant> {
    Instant::now().checked_add(duration)
}

/// Drive `opts.vus` concurrent users against `client` for `opts.duration`.
pub async fn run_load(client: &RunstubClient, opts: &LoadOptions) -> LoadReport {
    let deadline = deadline_after(opts.duration);
    let mut users = JoinSet::new();

    for _ in 0..opts.vus {
        let client = client.clone();
        let pause = opts.pause;
        users.spawn(async move {
            let mut report = LoadReport::default();
            while deadline.is_none_or(|d| Instant::now() < d) {
                let outcome = client.run_status().await;
                report.record(&outcome);
                tokio::time::sleep(pause).await;
            }
            report
        });
    }

    let mut total = LoadReport::default();
    while let Some(joined) = users.join_next().await {
        match joined {
            Ok(report) => total.merge(&report),
            Err(e) => warn!("Virtual user task failed: {e}"),
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_classifies_statuses() {
        let mut report = LoadReport::default();
        report.record(&Ok(StatusCode::OK));
        report.record(&Ok(StatusCode::OK));
        report.record(&Ok(StatusCode::UNAUTHORIZED));
        report.record(&Ok(StatusCode::INTERNAL_SERVER_ERROR));
        report.record(&Err(ClientError::Protocol("boom".into())));

        assert_eq!(report.total, 5);
        assert_eq!(report.ok, 2);
        assert_eq!(report.unauthorized, 1);
        assert_eq!(report.other_status, 1);
        assert_eq!(report.transport_errors, 1);
        assert_eq!(report.passed(), 3);
        assert!(!report.all_passed());
        assert!((report.pass_rate() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_run_passes() {
        let report = LoadReport::default();
        assert!(report.all_passed());
        assert!((report.pass_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deadline_after_huge_duration() {
        assert!(deadline_after(Duration::from_secs(u64::MAX)).is_none());
        let soon = deadline_after(Duration::from_secs(1)).unwrap();
        assert!(soon > Instant::now());
    }

    #[test]
    fn test_merge() {
        let mut a = LoadReport {
            total: 3,
            ok: 3,
            ..LoadReport::default()
        };
        let b = LoadReport {
            total: 2,
            unauthorized: 1,
            transport_errors: 1,
            ..LoadReport::default()
        };
        a.merge(&b);
        assert_eq!(a.total, 5);
        assert_eq!(a.ok, 3);
        assert_eq!(a.unauthorized, 1);
        assert_eq!(a.transport_errors, 1);
        assert_eq!(a.summary()["total"], 5);
    }
}
