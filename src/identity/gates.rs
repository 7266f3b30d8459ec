//! Access gates: pure decisions over session state, no side effects and no
//! state of their own.

use super::claims::Role;
use super::session::{SessionContext, SessionState};

pub const LOGIN_ROUTE: &str = "/login";
pub const MENU_ROUTE: &str = "/menu";

/// What the caller should render or do for a guarded destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the protected content.
    Allow,
    /// Still resolving: show a neutral pending indicator.
    Pending,
    /// Still resolving: show nothing at all.
    Hold,
    /// Send the caller to the login entry point, remembering where they
    /// wanted to go.
    RedirectToLogin { from: String },
    /// Send the caller to the default authenticated landing destination.
    RedirectToMenu,
}

/// Admit any authenticated session. While the session is unresolved the
/// caller shows a pending indicator rather than flashing login content.
pub fn require_authenticated(ctx: &SessionContext, requested: &str) -> GateDecision {
    match ctx.state() {
        SessionState::Authenticated(_) => GateDecision::Allow,
        SessionState::Uninitialized | SessionState::Resolving => GateDecision::Pending,
        SessionState::Anonymous => GateDecision::RedirectToLogin {
            from: requested.to_string(),
        },
    }
}

/// Admit only administrators. Stricter while unresolved: nothing renders at
/// all. Everyone else lands on the menu, authenticated or not.
pub fn require_admin(ctx: &SessionContext) -> GateDecision {
    match ctx.state() {
        SessionState::Uninitialized | SessionState::Resolving => GateDecision::Hold,
        SessionState::Authenticated(s) if s.role == Role::Admin => GateDecision::Allow,
        _ => GateDecision::RedirectToMenu,
    }
}
