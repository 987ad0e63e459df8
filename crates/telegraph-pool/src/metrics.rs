//! Publish metrics
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops.
//!
//! - `telegraph_publish_attempts_total` (counter): label `outcome`
//! - `telegraph_flood_waits_total` (counter)
//! - `telegraph_flood_wait_seconds` (histogram): requested wait per flood event
//! - `telegraph_account_reprovisions_total` (counter): label `result`

/// Record one `create_page` attempt with its outcome (`success` or a
/// `Failure` label).
pub fn record_attempt(outcome: &'static str) {
    metrics::counter!("telegraph_publish_attempts_total", "outcome" => outcome).increment(1);
}

/// Record a flood-control rejection and the wait it asked for.
pub fn record_flood_wait(retry_after_secs: u64) {
    metrics::counter!("telegraph_flood_waits_total").increment(1);
    metrics::histogram!("telegraph_flood_wait_seconds").record(retry_after_secs as f64);
}

/// Record an attempt to issue a replacement access token.
pub fn record_reprovision(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("telegraph_account_reprovisions_total", "result" => result).increment(1);
}
