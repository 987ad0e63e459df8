//! Error shapes reported by a `Transport`

/// Errors from Telegraph API calls.
///
/// `Api` carries the machine-readable error string returned by the service
/// (e.g. `ACCESS_TOKEN_INVALID`, `FLOOD_WAIT_7`). `Timeout` means the
/// client's own retry policy already gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Telegraph API error: {0}")]
    Api(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
