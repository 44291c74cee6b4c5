//! Token-scoped relay for ephemeral cross-view payloads.
//!
//! The payload travels only with the navigation chain that created it, not
//! through any global cache: a direct link or a reload into a consuming
//! view holds no token and legitimately reads nothing, and every consumer
//! renders a defined fallback state for that case. Payloads never touch
//! durable storage.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use skinmorph_common::prediction::PredictOutcome;
use tracing::debug;
use uuid::Uuid;

/// Opaque handle scoping one navigation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationToken(Uuid);

/// Immutable payload carried from the capture flow into the result,
/// simulator, and referral views.
#[derive(Debug, Clone)]
pub struct WorkflowPayload {
    pub outcome: PredictOutcome,

    /// Reference to the image the outcome was computed from.
    pub original_image: String,
}

/// Carries payloads between views for the lifetime of a navigation chain.
#[derive(Default)]
pub struct WorkflowRelay {
    chains: Mutex<HashMap<NavigationToken, WorkflowPayload>>,
}

impl WorkflowRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a payload to a fresh navigation chain.
    pub fn attach(&self, payload: WorkflowPayload) -> NavigationToken {
        let token = NavigationToken(Uuid::new_v4());
        self.lock().insert(token, payload);
        debug!("Attached workflow payload to chain {:?}", token);
        token
    }

    /// Read the payload for `token`.
    ///
    /// Unknown tokens and finished chains read as `None`; no stale payload
    /// from an unrelated chain is ever returned.
    pub fn read(&self, token: &NavigationToken) -> Option<WorkflowPayload> {
        self.lock().get(token).cloned()
    }

    /// End a navigation chain, discarding its payload.
    pub fn finish(&self, token: &NavigationToken) {
        if self.lock().remove(token).is_some() {
            debug!("Finished workflow chain {:?}", token);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<NavigationToken, WorkflowPayload>> {
        match self.chains.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
