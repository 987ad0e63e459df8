//! Account pool and round-robin selection
//!
//! The pool is built once at startup from the configured tokens. Accounts
//! that cannot be set up are dropped; the rest are handed out round-robin
//! for the lifetime of the pool. The pool never removes accounts after
//! initialization; a misbehaving account replaces its own token instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::Secret;
use telegraph_api::Transport;
use tracing::{error, info, warn};

use crate::account::{Account, AccountPolicy};
use crate::error::{Error, Result};

/// Ordered set of usable accounts with a rotation cursor.
#[derive(Debug)]
pub struct AccountPool {
    accounts: Vec<Arc<Account>>,
    next_index: AtomicUsize,
}

impl AccountPool {
    /// Set up one account per token.
    ///
    /// Accounts are verified one after another. Any account that cannot be
    /// verified or replaced is skipped with a warning; the pool is invalid
    /// only if none survive.
    pub async fn initialize(
        credentials: Vec<Secret<String>>,
        transport: Arc<dyn Transport>,
        policy: AccountPolicy,
    ) -> Self {
        let mut accounts = Vec::with_capacity(credentials.len());
        for (id, credential) in credentials.into_iter().enumerate() {
            let account = Account::new(id, credential, Arc::clone(&transport), policy.clone());
            match account.establish().await {
                Ok(()) => accounts.push(Arc::new(account)),
                Err(e) => {
                    warn!(account = id, error = %e, "cannot set up Telegraph account, skipping")
                }
            }
        }

        let pool = Self::from_accounts(accounts);
        if pool.is_valid() {
            info!(accounts = pool.count(), "Telegraph pool initialized");
        } else {
            error!("cannot set up any Telegraph account");
        }
        pool
    }

    /// Wrap already established accounts.
    pub fn from_accounts(accounts: Vec<Arc<Account>>) -> Self {
        Self {
            accounts,
            next_index: AtomicUsize::new(0),
        }
    }

    /// Next account in rotation.
    ///
    /// Returns `NoAccounts` if the pool is empty.
    pub fn select(&self) -> Result<Arc<Account>> {
        let n = self.accounts.len();
        if n == 0 {
            return Err(Error::NoAccounts);
        }

        let (Ok(previous) | Err(previous)) =
            self.next_index
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| {
                    let current = if i < n { i } else { 0 };
                    Some((current + 1) % n)
                });
        let current = if previous < n { previous } else { 0 };
        Ok(Arc::clone(&self.accounts[current]))
    }

    pub fn is_valid(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    pub fn accounts(&self) -> &[Arc<Account>] {
        &self.accounts
    }
}
