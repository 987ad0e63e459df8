//! Publish orchestration with retry and flood-control recovery
//!
//! One `publish` call is a bounded loop over attempts:
//!
//! - success → return the page URL
//! - flood control → start the cooldown on the failing account in the
//!   background and retry; a retry that lands on the same account waits on
//!   its flood gate
//! - connection error → retry, the pool moves on to the next account
//! - timeout or any other service error → give up immediately
//!
//! Flood and connection retries share one budget (`max_retries`).

use std::sync::Arc;

use telegraph_api::{AccountProfile, Document, Transport};
use telegraph_html::{FeedEntry, Footer, compose};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::flood::{Failure, classify};
use crate::metrics;
use crate::pool::AccountPool;

/// Publisher settings.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Attempts allowed per publish before giving up
    pub max_retries: u32,
    pub footer: Footer,
    /// Author for entries from untitled feeds
    pub profile: AccountProfile,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            footer: Footer::default(),
            profile: AccountProfile::default(),
        }
    }
}

/// Publishes documents through an account pool.
#[derive(Debug, Clone)]
pub struct Publisher {
    pool: Arc<AccountPool>,
    options: PublishOptions,
}

impl Publisher {
    pub fn new(pool: Arc<AccountPool>, options: PublishOptions) -> Self {
        Self { pool, options }
    }

    /// Set up the account pool described by `config` and wrap it.
    pub async fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let pool = AccountPool::initialize(
            config.credentials(),
            transport,
            config.account_policy(),
        )
        .await;
        Self::new(Arc::new(pool), config.publish_options())
    }

    pub fn pool(&self) -> &Arc<AccountPool> {
        &self.pool
    }

    /// Sanitize and publish a feed entry, returning the page URL.
    pub async fn publish_entry(&self, entry: &FeedEntry) -> Result<String> {
        if !self.pool.is_valid() {
            return Err(Error::NoAccounts);
        }
        let document = compose(entry, &self.options.footer, &self.options.profile);
        self.publish(&document).await
    }

    /// Publish `document`, returning the page URL.
    pub async fn publish(&self, document: &Document) -> Result<String> {
        if !self.pool.is_valid() {
            return Err(Error::NoAccounts);
        }

        let page = document.truncated();
        let mut retries = 0u32;
        let mut last_error = None;

        loop {
            if retries >= self.options.max_retries {
                warn!(attempts = retries, "giving up on Telegraph page");
                return Err(Error::TooManyRetries {
                    attempts: retries,
                    last: last_error,
                });
            }
            if retries >= 1 {
                if self.pool.count() > 1 {
                    info!(retries, "retrying using another Telegraph account");
                } else {
                    info!(retries, "retrying");
                }
            }

            let account = self.pool.select()?;
            let err = match account.publish(&page).await {
                Ok(created) => {
                    metrics::record_attempt("success");
                    return Ok(created.url);
                }
                Err(e) => e,
            };

            let failure = classify(&err);
            metrics::record_attempt(failure.label());
            match failure {
                Failure::FloodWait(retry_after) => {
                    warn!(account = account.id(), retry_after, "Telegraph flood control exceeded");
                    metrics::record_flood_wait(retry_after);
                    retries += 1;
                    // Detached: the gate is already closed when this returns.
                    if account.start_flood_cooldown(retry_after).is_none() {
                        debug!(account = account.id(), "flood cooldown already running");
                    }
                }
                Failure::Network => {
                    warn!(
                        account = account.id(),
                        error = %err,
                        "network error while creating Telegraph page, will retry"
                    );
                    retries += 1;
                }
                Failure::Timeout | Failure::Rejected => return Err(err.into()),
            }
            last_error = Some(err);
        }
    }
}
