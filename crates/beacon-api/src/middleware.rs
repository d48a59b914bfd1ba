use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use beacon_types::models::Role;
use tracing::warn;
use uuid::Uuid;

use crate::auth::AppState;
use crate::error::ApiError;

/// Resolved caller identity, tagged by privilege and inserted into request
/// extensions by the gate layers. Handlers never consult the session
/// registry themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    User { id: Uuid },
    Admin { id: Uuid },
}

impl AuthContext {
    pub fn user_id(&self) -> Uuid {
        match self {
            AuthContext::User { id } | AuthContext::Admin { id } => *id,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin { .. })
    }

    fn from_session(id: Uuid, role: Role) -> Self {
        match role {
            Role::Admin => AuthContext::Admin { id },
            Role::User => AuthContext::User { id },
        }
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Gate: any logged-in identity. Unresolved tokens short-circuit toward the
/// login entry point.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthenticated)?;
    let (user_id, role) = state
        .sessions
        .resolve(token)
        .ok_or(ApiError::Unauthenticated)?;

    req.extensions_mut()
        .insert(AuthContext::from_session(user_id, role));
    Ok(next.run(req).await)
}

/// Gate: admin only. The session role is a login-time copy, so the store's
/// current role is consulted as well; a demoted admin is locked out of admin
/// routes immediately, token notwithstanding.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;
    let (user_id, role) = state
        .sessions
        .resolve(token)
        .ok_or(ApiError::Unauthorized)?;

    if role != Role::Admin {
        return Err(ApiError::Unauthorized);
    }

    let row = state
        .db
        .get_user_by_id(&user_id.to_string())
        .map_err(ApiError::from)?
        .ok_or(ApiError::Unauthorized)?;
    if Role::from_str(&row.role) != Some(Role::Admin) {
        warn!("session for {} carries a stale admin role", user_id);
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AuthContext::Admin { id: user_id });
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn auth_context_tags_by_role() {
        let id = Uuid::new_v4();

        let user = AuthContext::from_session(id, Role::User);
        assert_eq!(user.user_id(), id);
        assert!(!user.is_admin());

        let admin = AuthContext::from_session(id, Role::Admin);
        assert!(admin.is_admin());
    }
}
