use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use beacon_types::api::{ListQuery, UpsertResourceRequest};
use beacon_types::models::Resource;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;

/// Public directory: grouped by category, then name.
pub async fn directory(State(state): State<AppState>) -> Result<Json<Vec<Resource>>, ApiError> {
    let rows = state.db.list_resources_by_category()?;
    Ok(Json(rows.into_iter().map(convert::resource_from_row).collect()))
}

/// Admin view: most recently touched first.
pub async fn recent_resources(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let rows = state.db.list_resources(query.limit)?;
    Ok(Json(rows.into_iter().map(convert::resource_from_row).collect()))
}

pub async fn upsert_resource(
    State(state): State<AppState>,
    Json(req): Json<UpsertResourceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("resource name is required".into()));
    }

    let existing = req.id.map(|id| id.to_string());
    let address = convert::non_empty(req.address);
    let contact = convert::non_empty(req.contact);

    let row = state.db.upsert_resource(
        existing.as_deref(),
        &Uuid::new_v4().to_string(),
        name,
        req.category,
        address.as_deref(),
        contact.as_deref(),
        req.latitude.map(round_coordinate),
        req.longitude.map(round_coordinate),
    )?;

    let status = if existing.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(convert::resource_from_row(row))))
}

/// Coordinates are stored at six decimal places, the precision the
/// directory was designed around.
fn round_coordinate(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_round_to_six_places() {
        assert_eq!(round_coordinate(14.599512345), 14.599512);
        assert_eq!(round_coordinate(-120.98425551), -120.984256);
        assert_eq!(round_coordinate(0.0), 0.0);
    }
}
