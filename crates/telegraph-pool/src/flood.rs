//! Failure classification for Telegraph responses
//!
//! Splits transport errors into the four recovery paths the publisher
//! distinguishes: flood control (cool down and retry), timeout (give up, the
//! client already retried), other connection errors (retry on the next
//! account) and everything else (give up).

use telegraph_api::TransportError;

/// Service error code prefix for flood control; the suffix is the number of
/// seconds to wait.
const FLOOD_WAIT_PREFIX: &str = "FLOOD_WAIT_";

/// Recovery path for a failed publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Flood control, retry after this many seconds
    FloodWait(u64),
    /// Transport timed out after its own retries
    Timeout,
    /// Connection-level failure, worth another attempt
    Network,
    /// Any other service error
    Rejected,
}

impl Failure {
    /// Label for metrics and logging.
    pub fn label(&self) -> &'static str {
        match self {
            Failure::FloodWait(_) => "flood_wait",
            Failure::Timeout => "timeout",
            Failure::Network => "network",
            Failure::Rejected => "rejected",
        }
    }
}

/// Extract the wait duration from a `FLOOD_WAIT_<n>` error code.
pub fn parse_flood_wait(code: &str) -> Option<u64> {
    code.strip_prefix(FLOOD_WAIT_PREFIX)?.parse().ok()
}

/// Classify a transport error.
pub fn classify(error: &TransportError) -> Failure {
    match error {
        TransportError::Api(code) => match parse_flood_wait(code) {
            Some(secs) => Failure::FloodWait(secs),
            None => Failure::Rejected,
        },
        TransportError::Timeout => Failure::Timeout,
        TransportError::Connection(_) => Failure::Network,
    }
}
