//! The session controller: sign-in, sign-up, sign-out, and the in-memory
//! identity.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use api_gateway::ApiGateway;
use credential_store::CredentialStore;
use skinmorph_common::auth::{SignupRequest, SignupResponse};
use skinmorph_common::{Identity, Result, Role};
use tracing::info;

use crate::guard::View;

/// Enumerable sign-in state. `SignedIn` is never entered without a role,
/// because the role travels inside the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn(Identity),
}

/// Owner of the current identity and sole writer of the credential store.
///
/// Every other component reads session state through [`current_identity`]
/// and friends; none of them touch the store directly, which keeps the
/// persisted snapshot and the in-memory identity in sync.
///
/// [`current_identity`]: SessionController::current_identity
pub struct SessionController {
    store: Arc<dyn CredentialStore>,
    gateway: Arc<ApiGateway>,
    state: RwLock<SessionState>,
}

impl SessionController {
    pub fn new(store: Arc<dyn CredentialStore>, gateway: Arc<ApiGateway>) -> Self {
        Self {
            store,
            gateway,
            state: RwLock::new(SessionState::SignedOut),
        }
    }

    /// Rebuild the in-memory identity from the credential store.
    ///
    /// Called once at startup; calling it again simply re-reads and
    /// overwrites.
    pub fn initialize(&self) -> Result<()> {
        let state = match self.store.load()? {
            Some(credentials) => {
                info!(
                    "Restored session for {} ({})",
                    credentials.user.name, credentials.user.role
                );
                SessionState::SignedIn(credentials.user)
            }
            None => SessionState::SignedOut,
        };
        *self.write_state() = state;
        Ok(())
    }

    /// Authenticate against the remote API and persist the result.
    ///
    /// On failure the previous session state, persisted or in-memory, is
    /// left untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let response = self.gateway.login(email, password).await?;

        self.store.save(&response.user, &response.access_token)?;
        *self.write_state() = SessionState::SignedIn(response.user.clone());

        info!("Signed in as {} ({})", response.user.name, response.user.role);
        Ok(response.user)
    }

    /// Register a new account. Does not authenticate; the caller signs in
    /// separately afterwards.
    pub async fn sign_up(&self, request: &SignupRequest) -> Result<SignupResponse> {
        self.gateway.signup(request).await
    }

    /// Clear the persisted snapshot and the in-memory identity.
    ///
    /// Returns the unauthenticated entry view. Callers are expected to
    /// perform a hard redirect there, a full context reset, so nothing
    /// holding pre-sign-out state can still issue an authorized request.
    pub fn sign_out(&self) -> Result<View> {
        self.store.clear()?;
        *self.write_state() = SessionState::SignedOut;

        info!("Signed out");
        Ok(View::Login)
    }

    pub fn current_identity(&self) -> Option<Identity> {
        match &*self.read_state() {
            SessionState::SignedIn(identity) => Some(identity.clone()),
            SessionState::SignedOut => None,
        }
    }

    pub fn current_role(&self) -> Option<Role> {
        self.current_identity().map(|identity| identity.role)
    }

    pub fn state(&self) -> SessionState {
        self.read_state().clone()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
