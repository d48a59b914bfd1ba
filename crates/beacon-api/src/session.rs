use std::collections::HashSet;
use std::sync::Mutex;

use beacon_types::models::Role;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims bound to a session token. The role is a copy of `User.role` taken
/// at login time; admin-gated routes re-check the store (see
/// `middleware::require_admin`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub jti: Uuid,
    pub exp: usize,
}

/// Issues and inspects signed session tokens. Termination is tracked in a
/// revocation registry keyed by `jti`, so a logged-out token stops resolving
/// before its expiry.
pub struct SessionGate {
    secret: String,
    ttl_hours: i64,
    revoked: Mutex<HashSet<Uuid>>,
}

impl SessionGate {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            ttl_hours: 24,
            revoked: Mutex::new(HashSet::new()),
        }
    }

    pub fn establish(&self, user_id: Uuid, role: Role) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            role,
            jti: Uuid::new_v4(),
            exp: (Utc::now() + chrono::Duration::hours(self.ttl_hours)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Fails open to `None` on a missing, malformed, tampered, expired, or
    /// terminated token.
    pub fn resolve(&self, token: &str) -> Option<(Uuid, Role)> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .ok()?;

        let revoked = self.revoked.lock().unwrap_or_else(|e| e.into_inner());
        if revoked.contains(&data.claims.jti) {
            return None;
        }

        Some((data.claims.sub, data.claims.role))
    }

    /// Idempotent: terminating twice, or terminating a token that no longer
    /// decodes, is a no-op.
    pub fn terminate(&self, token: &str) {
        if let Ok(data) = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        ) {
            self.revoked
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(data.claims.jti);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> SessionGate {
        SessionGate::new("test-secret-key-12345".to_string())
    }

    #[test]
    fn establish_resolve_roundtrip() {
        let gate = gate();
        let user_id = Uuid::new_v4();

        let token = gate.establish(user_id, Role::Admin).unwrap();
        assert_eq!(gate.resolve(&token), Some((user_id, Role::Admin)));
    }

    #[test]
    fn garbage_token_resolves_to_none() {
        let gate = gate();
        assert_eq!(gate.resolve("not.a.token"), None);
        assert_eq!(gate.resolve(""), None);
    }

    #[test]
    fn different_secrets_reject() {
        let issuing = gate();
        let other = SessionGate::new("another-secret".to_string());

        let token = issuing.establish(Uuid::new_v4(), Role::User).unwrap();
        assert_eq!(other.resolve(&token), None);
    }

    #[test]
    fn terminate_is_idempotent() {
        let gate = gate();
        let user_id = Uuid::new_v4();
        let token = gate.establish(user_id, Role::User).unwrap();

        gate.terminate(&token);
        assert_eq!(gate.resolve(&token), None);

        // second terminate is not an error
        gate.terminate(&token);
        assert_eq!(gate.resolve(&token), None);
    }

    #[test]
    fn terminate_only_affects_that_session() {
        let gate = gate();
        let user_id = Uuid::new_v4();
        let first = gate.establish(user_id, Role::User).unwrap();
        let second = gate.establish(user_id, Role::User).unwrap();

        gate.terminate(&first);
        assert_eq!(gate.resolve(&first), None);
        assert_eq!(gate.resolve(&second), Some((user_id, Role::User)));
    }
}
