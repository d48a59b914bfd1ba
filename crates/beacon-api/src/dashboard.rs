use axum::{Extension, Json, extract::State};
use tracing::error;

use beacon_db::StoreError;
use beacon_types::api::{AdminDashboard, HomeSummary};

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;
use crate::middleware::AuthContext;

/// User dashboard: profile, five most recent reports, current safety
/// status, and the latest plan. The blocking store work runs off the async
/// runtime.
pub async fn home(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<HomeSummary>, ApiError> {
    let db = state.clone();
    let uid = ctx.user_id().to_string();

    let (user, reports, safety, plan) = tokio::task::spawn_blocking(move || {
        let user = db.db.get_user_by_id(&uid)?.ok_or(StoreError::NotFound)?;
        let reports = db.db.list_reports_by_owner(&uid, Some(5))?;
        let safety = db.db.latest_safety_check(&uid)?;
        let plan = db.db.latest_plan(&uid)?;
        Ok::<_, StoreError>((user, reports, safety, plan))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })??;

    Ok(Json(HomeSummary {
        user: convert::user_from_row(user),
        recent_reports: reports.into_iter().map(convert::report_from_row).collect(),
        latest_safety: safety.map(convert::check_from_row),
        latest_plan: plan.map(convert::plan_from_row),
    }))
}

/// Admin dashboard: the ten most recent reports, users, and safety checks,
/// plus the most recently touched resources.
pub async fn admin_dashboard(State(state): State<AppState>) -> Result<Json<AdminDashboard>, ApiError> {
    let db = state.clone();

    let (reports, users, checks, resources) = tokio::task::spawn_blocking(move || {
        let reports = db.db.list_reports(Some(10))?;
        let users = db.db.list_users(Some(10))?;
        let checks = db.db.list_safety_checks(Some(10))?;
        let resources = db.db.list_resources(Some(10))?;
        Ok::<_, StoreError>((reports, users, checks, resources))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })??;

    Ok(Json(AdminDashboard {
        recent_reports: reports.into_iter().map(convert::report_from_row).collect(),
        recent_users: users.into_iter().map(convert::user_from_row).collect(),
        recent_safety_checks: checks.into_iter().map(convert::check_from_row).collect(),
        resources: resources.into_iter().map(convert::resource_from_row).collect(),
    }))
}
