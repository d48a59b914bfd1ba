use axum::{Extension, Json, extract::State};

use beacon_types::api::UpdateProfileRequest;
use beacon_types::models::User;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;
use crate::middleware::AuthContext;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<User>, ApiError> {
    let row = state
        .db
        .get_user_by_id(&ctx.user_id().to_string())?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(convert::user_from_row(row)))
}

/// Contact-detail updates; blank or missing fields keep their stored values.
/// Email and role are not editable here.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let full_name = convert::non_empty(req.full_name);
    let phone = convert::non_empty(req.phone);
    let address = convert::non_empty(req.address);

    let row = state.db.update_profile(
        &ctx.user_id().to_string(),
        full_name.as_deref(),
        phone.as_deref(),
        address.as_deref(),
    )?;
    Ok(Json(convert::user_from_row(row)))
}
