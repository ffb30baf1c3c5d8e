//! HTTP route handlers and router assembly.
//!
//! | Method | Path       | Auth        | Description              |
//! |--------|------------|-------------|--------------------------|
//! | GET    | `/healthz` | No          | Liveness probe (`ok`)    |
//! | GET    | `/version` | No          | Build metadata           |
//! | GET    | `/run`     | `X-API-Key`* | Placeholder action       |
//!
//! *Only when a credential is configured; see [`crate::auth`].
//!
//! Paths are matched exactly and anything else falls through to axum's default
//! `404`. `/healthz` and `/version` answer every method; `/run` is GET only.

pub mod health;
pub mod run;
pub mod version;

use axum::{
    middleware,
    routing::{any, get},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::{self, RunKey};
use crate::AppState;

/// Build the application router.
///
/// The `/run` credential is taken from `state.config` here, once, and handed to
/// the auth middleware as an extension.
pub fn router(state: AppState) -> Router {
    let run_key = RunKey::new(state.config.auth.credential());

    let public_routes = Router::new()
        .route("/healthz", any(health::healthz))
        .route("/version", any(version::version));

    let gated_routes = Router::new()
        .route("/run", get(run::run))
        .route_layer(middleware::from_fn(auth::require_run_key));

    Router::new()
        .merge(public_routes)
        .merge(gated_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(run_key)),
        )
        .with_state(state)
}
