//! Identity and session lifecycle for the sweets client.
//! Keep the public surface thin and split implementation across sub-modules.

mod claims;
mod gates;
mod session;
mod vault;

pub use claims::{decode_session, Role, Session};
pub use gates::{require_admin, require_authenticated, GateDecision, LOGIN_ROUTE, MENU_ROUTE};
pub use session::{SessionContext, SessionState};
pub use vault::CredentialVault;
