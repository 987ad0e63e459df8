//! Capability interface to the Telegraph publishing service
//!
//! Defines the `Transport` trait that decouples the account pool from the
//! HTTP client actually talking to Telegraph. The pool only needs three
//! operations (create a page, issue a new account, query account info) and a
//! small error taxonomy; the wire format, proxying and connection reuse are
//! the implementor's concern.

pub mod error;
pub mod types;

pub use error::{Result, TransportError};
pub use types::{
    AUTHOR_NAME_LIMIT, AUTHOR_URL_LIMIT, AccountInfo, AccountProfile, Document, Page, TITLE_LIMIT,
    TOKEN_LENGTH,
};

use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by `Transport` methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Abstraction over the Telegraph API client.
///
/// One transport is shared by every account in a pool; the access token is
/// passed per call so an account can swap its credential without rebuilding
/// the client. Implementations surface flood control as
/// `TransportError::Api("FLOOD_WAIT_<seconds>")`.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility (`Arc<dyn Transport>`).
pub trait Transport: Send + Sync {
    /// Publish a page under the account identified by `access_token`.
    fn create_page<'a>(&'a self, access_token: &'a str, page: &'a Document)
    -> TransportFuture<'a, Page>;

    /// Register a new account and return its access token.
    fn create_account<'a>(&'a self, profile: &'a AccountProfile) -> TransportFuture<'a, String>;

    /// Fetch account details; a service error means the token is not usable.
    fn get_account_info<'a>(&'a self, access_token: &'a str) -> TransportFuture<'a, AccountInfo>;
}
