use axum::{extract::State, Json};

use crate::build_info::BuildInfo;
use crate::AppState;

/// `GET /version`: build metadata as `{"version","commit","date"}`.
pub async fn version(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(state.build)
}
