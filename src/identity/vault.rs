//! Process-lifetime credential storage.

use parking_lot::RwLock;
use std::sync::Arc;

/// The single slot holding the encoded credential. Cloning shares the slot:
/// the session context writes it, the transport reads it on every request.
#[derive(Debug, Clone, Default)]
pub struct CredentialVault {
    slot: Arc<RwLock<Option<String>>>,
}

impl CredentialVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vault seeded with a credential that predates this process, e.g.
    /// one handed over via the environment.
    pub fn with_token<S: Into<String>>(token: S) -> Self {
        let vault = Self::new();
        vault.store(token);
        vault
    }

    pub fn store<S: Into<String>>(&self, token: S) {
        *self.slot.write() = Some(token.into());
    }

    pub fn current(&self) -> Option<String> {
        self.slot.read().clone()
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }
}
