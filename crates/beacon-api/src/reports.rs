use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use beacon_types::api::{CreateReportRequest, ListQuery};
use beacon_types::models::{CommunityReport, ReportStatus};

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;
use crate::middleware::AuthContext;

pub async fn create_report(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = req.location.trim();
    if location.is_empty() {
        return Err(ApiError::Validation("location is required".into()));
    }
    let description = req.description.trim();
    if description.is_empty() {
        return Err(ApiError::Validation("description is required".into()));
    }

    let report_id = Uuid::new_v4();
    state.db.insert_report(
        &report_id.to_string(),
        &ctx.user_id().to_string(),
        req.disaster_type,
        location,
        description,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CommunityReport {
            id: report_id,
            user_id: ctx.user_id(),
            disaster_type: req.disaster_type,
            location: location.to_string(),
            description: description.to_string(),
            status: ReportStatus::Pending,
            verified_by_admin_id: None,
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn my_reports(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<CommunityReport>>, ApiError> {
    let rows = state
        .db
        .list_reports_by_owner(&ctx.user_id().to_string(), None)?;
    Ok(Json(rows.into_iter().map(convert::report_from_row).collect()))
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CommunityReport>>, ApiError> {
    let rows = state.db.list_reports(query.limit)?;
    Ok(Json(rows.into_iter().map(convert::report_from_row).collect()))
}

/// pending -> verified, stamped with the acting admin.
pub async fn verify_report(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<CommunityReport>, ApiError> {
    let row = state
        .db
        .verify_report(&report_id.to_string(), &ctx.user_id().to_string())?;
    Ok(Json(convert::report_from_row(row)))
}

/// verified -> resolved.
pub async fn resolve_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<CommunityReport>, ApiError> {
    let row = state.db.resolve_report(&report_id.to_string())?;
    Ok(Json(convert::report_from_row(row)))
}
