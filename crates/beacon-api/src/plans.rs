use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use beacon_types::api::CreatePlanRequest;
use beacon_types::models::EmergencyPlan;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;
use crate::middleware::AuthContext;

pub async fn create_plan(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let household_members = req.household_members.unwrap_or(1);
    if household_members < 1 {
        return Err(ApiError::Validation(
            "household members must be at least 1".into(),
        ));
    }

    let meeting_point = convert::non_empty(req.meeting_point);
    let evacuation_routes = convert::non_empty(req.evacuation_routes);
    let supply_checklist = convert::non_empty(req.supply_checklist);
    let notes = convert::non_empty(req.notes);

    let plan_id = Uuid::new_v4();
    state.db.insert_plan(
        &plan_id.to_string(),
        &ctx.user_id().to_string(),
        household_members,
        meeting_point.as_deref(),
        evacuation_routes.as_deref(),
        supply_checklist.as_deref(),
        notes.as_deref(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(EmergencyPlan {
            id: plan_id,
            user_id: ctx.user_id(),
            household_members,
            meeting_point,
            evacuation_routes,
            supply_checklist,
            notes,
            created_at: chrono::Utc::now(),
        }),
    ))
}

/// Plan history for the caller, newest first.
pub async fn my_plans(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<EmergencyPlan>>, ApiError> {
    let rows = state.db.list_plans_by_owner(&ctx.user_id().to_string())?;
    Ok(Json(rows.into_iter().map(convert::plan_from_row).collect()))
}
