//! Credential claim decoding.
//! Splits the compact token, base64url-decodes the claims segment, and
//! derives the session identity. No signature verification and no expiry
//! check: the service enforces both, this client only needs the identity
//! carried inside.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// The decoded identity: exists only while a decodable credential is held,
/// never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

/// Derive a [`Session`] from a compact JWT. The role claim may sit under
/// `role` or `roles` (first present value wins, default `USER`); only the
/// exact string `ADMIN` elevates. A missing or empty subject rejects the
/// credential.
pub fn decode_session(token: &str) -> ApiResult<Session> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::decode("credential is not a compact JWT"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ApiError::decode(format!("claims segment is not base64url: {}", e)))?;
    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::decode(format!("claims segment is not JSON: {}", e)))?;

    let username = claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::decode("credential carries no subject"))?
        .to_string();

    let role_claim = claims
        .get("role")
        .filter(|v| claim_present(v))
        .or_else(|| claims.get("roles").filter(|v| claim_present(v)));
    let role = match role_claim.and_then(Value::as_str) {
        Some("ADMIN") => Role::Admin,
        _ => Role::User,
    };

    Ok(Session { username, role })
}

fn claim_present(v: &Value) -> bool {
    !(v.is_null() || v.as_str().is_some_and(str::is_empty))
}
