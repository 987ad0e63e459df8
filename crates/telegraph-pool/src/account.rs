//! A single Telegraph account
//!
//! Every page created through an account passes two independent gates:
//! the flood gate (closed while the account serves a flood-control penalty)
//! and the request lock (one in-flight `create_page` per account, at least
//! `min_request_interval` apart). The flood gate is checked first and
//! without holding the lock.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use common::Secret;
use telegraph_api::{AccountProfile, Document, Page, TOKEN_LENGTH, Transport, TransportError};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::gate::{FloodGate, GateGuard};

/// Per-account throttling and flood-control policy.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    /// Minimum spacing between two `create_page` calls on one account
    pub min_request_interval: Duration,
    /// Flood waits at least this long are answered by issuing a new token
    /// instead of waiting
    pub reprovision_threshold: Duration,
    /// Identity for newly issued accounts
    pub profile: AccountProfile,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            min_request_interval: Duration::from_millis(500),
            reprovision_threshold: Duration::from_secs(60),
            profile: AccountProfile::default(),
        }
    }
}

/// One Telegraph credential with its request serialization state.
pub struct Account {
    id: usize,
    credential: RwLock<Secret<String>>,
    /// Request lock; holds the completion time of the last successful call
    last_request: Mutex<Option<Instant>>,
    gate: FloodGate,
    transport: Arc<dyn Transport>,
    policy: AccountPolicy,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("blocked", &self.is_blocked())
            .finish_non_exhaustive()
    }
}

impl Account {
    pub fn new(
        id: usize,
        credential: Secret<String>,
        transport: Arc<dyn Transport>,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            id,
            credential: RwLock::new(credential),
            last_request: Mutex::new(None),
            gate: FloodGate::new(),
            transport,
            policy,
        }
    }

    /// Position of the account in the configured token list.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Whether a flood-control cooldown currently blocks this account.
    pub fn is_blocked(&self) -> bool {
        !self.gate.is_open()
    }

    /// Snapshot of the current access token.
    pub async fn credential(&self) -> Secret<String> {
        self.credential.read().await.clone()
    }

    /// Make sure the account can publish.
    ///
    /// Malformed tokens are replaced by a newly issued account before
    /// verification. If the service rejects the token, one replacement is
    /// issued; network failures or a failed issuance fail the account.
    pub async fn establish(&self) -> Result<(), TransportError> {
        match self.verify().await {
            Ok(()) => Ok(()),
            Err(TransportError::Api(code)) => {
                warn!(
                    account = self.id,
                    code = %code,
                    "Telegraph token rejected, creating a new account instead"
                );
                self.reprovision().await
            }
            Err(e) => Err(e),
        }
    }

    async fn verify(&self) -> Result<(), TransportError> {
        let token_length = self.credential.read().await.expose().chars().count();
        if token_length != TOKEN_LENGTH {
            warn!(
                account = self.id,
                token_length, "Telegraph token may be invalid, creating a new account instead"
            );
            self.reprovision().await?;
        }

        let token = self.credential().await;
        let info = self.transport.get_account_info(token.expose()).await?;
        debug!(account = self.id, short_name = %info.short_name, "Telegraph account verified");
        Ok(())
    }

    /// Create a page with this account.
    ///
    /// Waits for the flood gate, then for the request lock, then for the
    /// remainder of the minimum interval since the last successful call.
    /// Transport errors are returned unchanged.
    pub async fn publish(&self, page: &Document) -> Result<Page, TransportError> {
        self.gate.wait_open().await;

        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.policy.min_request_interval {
                tokio::time::sleep(self.policy.min_request_interval - elapsed).await;
            }
        }

        let token = self.credential().await;
        debug!(account = self.id, title = %page.title, "creating Telegraph page");
        let created = self.transport.create_page(token.expose(), page).await?;
        *last_request = Some(Instant::now());
        Ok(created)
    }

    /// Close the flood gate and run the cooldown on a background task.
    ///
    /// The gate is closed before this returns, so a retry that selects this
    /// account again blocks until the cooldown finishes. Returns `None` when
    /// a cooldown is already in progress.
    pub fn start_flood_cooldown(self: &Arc<Self>, retry_after_secs: u64) -> Option<JoinHandle<()>> {
        let guard = self.gate.try_close()?;
        let account = Arc::clone(self);
        Some(tokio::spawn(async move {
            account.cool_down(guard, retry_after_secs).await;
        }))
    }

    /// Serve a flood-control penalty in place. No-op if a cooldown is
    /// already in progress.
    pub async fn enter_flood_cooldown(&self, retry_after_secs: u64) {
        if let Some(guard) = self.gate.try_close() {
            self.cool_down(guard, retry_after_secs).await;
        }
    }

    async fn cool_down(&self, guard: GateGuard, retry_after_secs: u64) {
        info!(
            account = self.id,
            retry_after = retry_after_secs,
            "blocking requests for this Telegraph account due to flood control"
        );

        if retry_after_secs >= self.policy.reprovision_threshold.as_secs() {
            match self.reprovision().await {
                Ok(()) => warn!(
                    account = self.id,
                    retry_after = retry_after_secs,
                    "refusing to wait out flood control, created a new Telegraph account"
                ),
                Err(e) => {
                    warn!(
                        account = self.id,
                        error = %e,
                        "failed to create a replacement Telegraph account, waiting instead"
                    );
                    tokio::time::sleep(penalty(retry_after_secs)).await;
                }
            }
        } else {
            tokio::time::sleep(penalty(retry_after_secs)).await;
        }

        drop(guard);
        info!(account = self.id, "Telegraph account unblocked");
    }

    /// Issue a brand-new account and take over its token.
    async fn reprovision(&self) -> Result<(), TransportError> {
        let issued = self.transport.create_account(&self.policy.profile).await;
        crate::metrics::record_reprovision(issued.is_ok());
        let token = issued?;
        *self.credential.write().await = Secret::new(token);
        info!(account = self.id, "issued a new Telegraph access token");
        Ok(())
    }
}

/// Time to keep the gate closed for a `FLOOD_WAIT_<n>`: one second of
/// margin past `n`.
fn penalty(retry_after_secs: u64) -> Duration {
    Duration::from_secs(retry_after_secs.saturating_add(1))
}
