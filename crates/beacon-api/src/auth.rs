use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use tracing::warn;
use uuid::Uuid;

use beacon_db::Database;
use beacon_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use beacon_types::models::Role;

use crate::credentials;
use crate::error::ApiError;
use crate::middleware;
use crate::session::SessionGate;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionGate,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = register_user(&state.db, &req)?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (user_id, role) = authenticate_user(&state.db, &req.email, &req.password)?;

    let token = state
        .sessions
        .establish(user_id, role)
        .map_err(|_| ApiError::Internal)?;

    Ok(Json(LoginResponse {
        user_id,
        role,
        token,
    }))
}

/// Admin sign-in over the same accounts table, gated on the stored role.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (user_id, role) = authenticate_admin(&state.db, &req.email, &req.password)?;

    let token = state
        .sessions
        .establish(user_id, role)
        .map_err(|_| ApiError::Internal)?;

    Ok(Json(LoginResponse {
        user_id,
        role,
        token,
    }))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = middleware::bearer_token(&headers) {
        state.sessions.terminate(token);
    }
    StatusCode::NO_CONTENT
}

/// Validate and create an account. Registration always produces the `user`
/// role; there is no self-service path to `admin`.
pub fn register_user(db: &Database, req: &RegisterRequest) -> Result<Uuid, ApiError> {
    let full_name = req.full_name.trim();
    if full_name.is_empty() {
        return Err(ApiError::Validation("full name is required".into()));
    }

    let email = normalize_email(&req.email);
    if !valid_email(&email) {
        return Err(ApiError::Validation("invalid email address".into()));
    }

    if req.password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }

    let password_hash = credentials::hash_password(&req.password).map_err(|_| ApiError::Internal)?;
    let user_id = Uuid::new_v4();

    db.create_user(
        &user_id.to_string(),
        &email,
        full_name,
        trimmed(req.phone.as_deref()),
        trimmed(req.address.as_deref()),
        Role::User,
        &password_hash,
    )?;

    Ok(user_id)
}

/// Email + password to `(id, role)`. A missing account and a wrong password
/// are indistinguishable to the caller.
pub fn authenticate_user(
    db: &Database,
    email: &str,
    password: &str,
) -> Result<(Uuid, Role), ApiError> {
    let email = normalize_email(email);

    let user = db
        .get_user_by_email(&email)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !credentials::verify_password(password, &user.password_hash) {
        warn!("rejected login for {}", email);
        return Err(ApiError::InvalidCredentials);
    }

    let user_id = user.id.parse().map_err(|_| ApiError::Internal)?;
    let role = Role::from_str(&user.role).unwrap_or(Role::User);
    Ok((user_id, role))
}

/// As `authenticate_user`, but a non-admin account fails with the same
/// generic credential error rather than leaking its existence.
pub fn authenticate_admin(
    db: &Database,
    email: &str,
    password: &str,
) -> Result<(Uuid, Role), ApiError> {
    let (user_id, role) = authenticate_user(db, email, password)?;
    if role != Role::Admin {
        return Err(ApiError::InvalidCredentials);
    }
    Ok((user_id, role))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
