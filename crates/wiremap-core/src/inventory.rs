//! Facade over the inventory service.
//!
//! Owns the HTTP client and the shared session flag, translates API
//! errors into [`CoreError`], and provides the mutation-seam
//! implementations the form controllers submit through. List and
//! delete operations watch for session expiry and drop the flag so the
//! next navigation bounces to login instead of failing again.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use wiremap_api::InventoryClient;
use wiremap_api::types::{Build, Floor, FloorPayload, Switch, SwitchPayload, SwitchScope};

use crate::error::CoreError;
use crate::mutation::{FloorMutations, SwitchMutations};
use crate::session::SessionState;

/// The console's one handle to the inventory service.
pub struct Inventory {
    client: InventoryClient,
    session: Arc<SessionState>,
}

impl Inventory {
    pub fn new(client: InventoryClient) -> Self {
        Self {
            client,
            session: Arc::new(SessionState::new()),
        }
    }

    /// Shared session flag, handed to the route guard and status line.
    pub fn session(&self) -> Arc<SessionState> {
        Arc::clone(&self.session)
    }

    /// The service base URL, for display.
    pub fn base_url(&self) -> &str {
        self.client.base_url().as_str()
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Authenticate and mark the session established.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        self.client
            .login(username, password)
            .await
            .map_err(CoreError::from)?;
        self.session.set_authenticated(true);
        info!("session established for {}", username);
        Ok(())
    }

    /// End the session. The local flag clears even when the service
    /// call fails; as far as the console is concerned the cookie is
    /// gone either way.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let result = self.client.logout().await;
        self.session.set_authenticated(false);
        info!("session ended");
        result.map_err(CoreError::from)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn builds(&self) -> Result<Vec<Build>, CoreError> {
        self.observe(self.client.builds().await)
    }

    pub async fn floors_of(&self, build: &str) -> Result<Vec<Floor>, CoreError> {
        self.observe(self.client.floors_of(build).await)
    }

    pub async fn switches(&self, scope: &SwitchScope) -> Result<Vec<Switch>, CoreError> {
        self.observe(self.client.switches(scope).await)
    }

    // ── Deletes ──────────────────────────────────────────────────────

    pub async fn delete_floor(&self, build: &str, floor: i32) -> Result<(), CoreError> {
        self.observe(self.client.delete_floor(build, floor).await)
    }

    pub async fn delete_switch(&self, name: &str) -> Result<(), CoreError> {
        self.observe(self.client.delete_switch(name).await)
    }

    // ── Error observation ────────────────────────────────────────────

    /// Translate an API outcome, dropping the session flag when the
    /// service reports the cookie expired.
    fn observe<T>(&self, result: Result<T, wiremap_api::Error>) -> Result<T, CoreError> {
        result.map_err(|e| {
            if e.is_auth_expired() {
                warn!("session expired; marking unauthenticated");
                self.session.set_authenticated(false);
            }
            CoreError::from(e)
        })
    }
}

// ── Mutation seams ───────────────────────────────────────────────────

impl SwitchMutations for Inventory {
    async fn create_switch(&self, payload: &SwitchPayload) -> Result<(), CoreError> {
        self.observe(self.client.create_switch(payload).await)
    }

    async fn update_switch(&self, payload: &SwitchPayload) -> Result<(), CoreError> {
        self.observe(self.client.update_switch(payload).await)
    }
}

impl FloorMutations for Inventory {
    async fn create_floor(&self, payload: &FloorPayload) -> Result<(), CoreError> {
        self.observe(self.client.create_floor(payload).await)
    }
}
