//! Telegraph account pool with flood-control-aware publishing
//!
//! Manages several Telegraph accounts, spreads page creation across them
//! round-robin, and recovers from flood control without surfacing it to the
//! caller. Each account serializes its own requests and keeps at least the
//! configured interval between them.
//!
//! Publish lifecycle:
//! 1. `AccountPool::initialize` verifies every token, issuing new accounts
//!    for malformed or rejected ones, and drops accounts it cannot set up
//! 2. `Publisher::publish` selects the next account and submits the page
//! 3. `FLOOD_WAIT_<n>` → the account's flood gate closes; a background driver
//!    waits `n + 1` seconds (or issues a new token when `n` is too long) and
//!    reopens it while the publish retries, possibly on another account
//! 4. Connection errors retry on the next account; timeouts and other service
//!    errors surface immediately
//! 5. After `max_retries` failed attempts the publish gives up

pub mod account;
pub mod config;
pub mod error;
pub mod flood;
pub mod gate;
pub mod metrics;
pub mod pool;
pub mod publisher;

#[cfg(test)]
pub(crate) mod testing;

pub use account::{Account, AccountPolicy};
pub use config::Config;
pub use error::{Error, Result};
pub use flood::{Failure, classify, parse_flood_wait};
pub use gate::{FloodGate, GateGuard};
pub use pool::AccountPool;
pub use publisher::{PublishOptions, Publisher};
