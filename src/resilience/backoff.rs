//! Delay between confirmation poll rounds.

use rand::Rng;
use std::time::Duration;

use crate::config::ConfirmationConfig;

/// Wait before poll round `attempt` (the first round runs immediately).
///
/// Doubles from `poll_interval_ms` up to `max_poll_interval_ms`, plus up to
/// 10% jitter. With equal bounds this is a fixed interval, the default.
pub fn poll_delay(attempt: u32, config: &ConfirmationConfig) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let ceiling = config.max_poll_interval_ms.max(config.poll_interval_ms);
    let doubled = 1u64
        .checked_shl(attempt - 1)
        .map_or(u64::MAX, |factor| config.poll_interval_ms.saturating_mul(factor));
    let delay_ms = doubled.min(ceiling);

    let spread = delay_ms / 10;
    let jitter = if spread > 0 {
        rand::thread_rng().gen_range(0..spread)
    } else {
        0
    };

    Duration::from_millis(delay_ms.saturating_add(jitter))
}
