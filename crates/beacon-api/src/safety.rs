use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use beacon_types::api::SafetyCheckRequest;
use beacon_types::models::SafetyCheck;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;
use crate::middleware::AuthContext;

/// Append a status entry; the newest entry is the caller's current status.
pub async fn check_in(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<SafetyCheckRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = convert::non_empty(req.note);

    let check_id = Uuid::new_v4();
    state.db.insert_safety_check(
        &check_id.to_string(),
        &ctx.user_id().to_string(),
        req.status,
        note.as_deref(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(SafetyCheck {
            id: check_id,
            user_id: ctx.user_id(),
            status: req.status,
            note,
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn my_history(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<SafetyCheck>>, ApiError> {
    let rows = state.db.list_safety_by_owner(&ctx.user_id().to_string())?;
    Ok(Json(rows.into_iter().map(convert::check_from_row).collect()))
}
