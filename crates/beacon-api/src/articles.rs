use axum::{
    Json,
    extract::{Query, State},
};

use beacon_types::api::ListQuery;
use beacon_types::models::Article;

use crate::auth::AppState;
use crate::convert;
use crate::error::ApiError;

/// Educational hub: published guides and tips, newest first.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let rows = state.db.list_articles(query.limit)?;
    Ok(Json(rows.into_iter().map(convert::article_from_row).collect()))
}
