//! Unauthenticated health-check endpoint.

/// `GET /healthz`: liveness probe.
///
/// Always `200 ok` as plain text, suitable for load-balancer health checks.
pub async fn healthz() -> &'static str {
    "ok"
}
