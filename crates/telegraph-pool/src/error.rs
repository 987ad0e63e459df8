//! Error types for publishing through the pool

use telegraph_api::TransportError;

/// Terminal publish failures.
///
/// Flood control and connection errors never appear here directly: the
/// publisher recovers from them until the retry budget runs out.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no Telegraph account configured")]
    NoAccounts,

    #[error("Telegraph publish gave up after {attempts} attempts")]
    TooManyRetries {
        attempts: u32,
        #[source]
        last: Option<TransportError>,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn too_many_retries_keeps_last_cause() {
        let err = Error::TooManyRetries {
            attempts: 3,
            last: Some(TransportError::Connection("reset".into())),
        };
        assert_eq!(err.to_string(), "Telegraph publish gave up after 3 attempts");
        let source = err.source().expect("last transport error is the source");
        assert!(source.to_string().contains("reset"));
    }

    #[test]
    fn transport_errors_display_unchanged() {
        let err: Error = TransportError::Api("PAGE_SAVE_FAILED".into()).into();
        assert_eq!(err.to_string(), "Telegraph API error: PAGE_SAVE_FAILED");
    }
}
