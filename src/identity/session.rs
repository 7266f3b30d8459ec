//! Session lifecycle: at most one credential, at most one decoded identity,
//! resolved exactly once at startup. The context is an explicit object
//! injected into consumers; the shared vault is the only cross-component
//! state.

use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::claims::{self, Role, Session};
use super::vault::CredentialVault;
use crate::envelope;
use crate::error::{ApiError, ApiResult};
use crate::transport::ApiTransport;

const LOGIN_OK: &str = "Welcome back!";
const LOGIN_FAILED: &str = "Invalid credentials";
const REGISTER_OK: &str = "Registration successful! Please login.";
const REGISTER_FAILED: &str = "Registration failed. Username might be taken.";
const LOGOUT_OK: &str = "Logged out successfully";

/// Lifecycle of the held identity. Consumers treat `Uninitialized` and
/// `Resolving` as indeterminate and withhold content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Resolving,
    Authenticated(Session),
    Anonymous,
}

pub struct SessionContext {
    transport: ApiTransport,
    vault: CredentialVault,
    state: RwLock<SessionState>,
}

impl SessionContext {
    pub fn new(transport: ApiTransport, vault: CredentialVault) -> Self {
        Self {
            transport,
            vault,
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    /// Resolve the held credential into a session. Runs once per context;
    /// later calls are no-ops. An undecodable stored credential is cleared
    /// so it cannot outlive the attempt.
    pub fn initialize(&self) {
        {
            let mut state = self.state.write();
            if *state != SessionState::Uninitialized {
                warn!(target: "session", "initialize called more than once; ignoring");
                return;
            }
            *state = SessionState::Resolving;
        }
        let resolved = match self.vault.current() {
            Some(token) => match claims::decode_session(&token) {
                Ok(session) => {
                    info!(
                        target: "session",
                        "restored session for {} ({})",
                        session.username,
                        session.role.as_str()
                    );
                    SessionState::Authenticated(session)
                }
                Err(e) => {
                    warn!(target: "session", "stored credential rejected, clearing it: {}", e);
                    self.vault.clear();
                    SessionState::Anonymous
                }
            },
            None => SessionState::Anonymous,
        };
        *self.state.write() = resolved;
    }

    /// Authenticate against the service. The issued credential is decoded
    /// before it is stored, so an undecodable one never enters the vault;
    /// on any failure the session state is untouched. Returns the message
    /// to show the user.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let body = json!({"username": username, "password": password});
        let resp = match self.transport.post_json("auth/login", &body).await {
            Ok(v) => v,
            Err(e) => {
                warn!(target: "session", "login failed for {}: {}", username, e);
                return Err(fail_with(e, LOGIN_FAILED));
            }
        };
        let Some(token) = envelope::extract_token(&resp) else {
            warn!(target: "session", "login response carried no token: {}", resp);
            return Err(ApiError::shape(LOGIN_FAILED));
        };
        let session = match claims::decode_session(&token) {
            Ok(s) => s,
            Err(e) => {
                warn!(target: "session", "issued credential failed to decode: {}", e);
                return Err(fail_with(e, LOGIN_FAILED));
            }
        };
        self.vault.store(token);
        info!(
            target: "session",
            "authenticated {} as {}",
            session.username,
            session.role.as_str()
        );
        let message = envelope::server_message(&resp).unwrap_or_else(|| LOGIN_OK.to_string());
        *self.state.write() = SessionState::Authenticated(session);
        Ok(message)
    }

    /// Create an account; establishes no session (the server expects a
    /// separate login). `admin_key` is forwarded only when given.
    pub async fn register(&self, username: &str, password: &str, admin_key: Option<&str>) -> ApiResult<String> {
        let mut body = json!({"username": username, "password": password});
        if let Some(key) = admin_key {
            body["adminKey"] = Value::String(key.to_string());
        }
        match self.transport.post_json("auth/register", &body).await {
            Ok(resp) => Ok(envelope::server_message(&resp).unwrap_or_else(|| REGISTER_OK.to_string())),
            Err(e) => {
                warn!(target: "session", "registration failed for {}: {}", username, e);
                Err(fail_with(e, REGISTER_FAILED))
            }
        }
    }

    /// Clear the credential and drop to `Anonymous`. Idempotent.
    pub fn logout(&self) -> &'static str {
        self.vault.clear();
        *self.state.write() = SessionState::Anonymous;
        info!(target: "session", "logged out");
        LOGOUT_OK
    }

    pub fn is_admin(&self) -> bool {
        matches!(&*self.state.read(), SessionState::Authenticated(s) if s.role == Role::Admin)
    }

    pub fn current(&self) -> Option<Session> {
        match &*self.state.read() {
            SessionState::Authenticated(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }
}

/// User-facing failure text: the server's message when the error carried
/// one, otherwise the operation's fallback.
fn fail_with(err: ApiError, fallback: &str) -> ApiError {
    let msg = err
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string());
    err.with_message(msg)
}
