//! Timer-backed suspension points used by the typewriter.

use std::time::Duration;

use tokio::time::Instant;

/// Suspends until `duration` has elapsed. Zero resolves immediately.
pub async fn wait(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    tokio::time::sleep(duration).await;
}

/// Suspends until `offset` after `start`. Offsets already in the past
/// resolve immediately, so scheduled work never drifts behind its slot.
pub async fn wait_until(start: Instant, offset: Duration) {
    let deadline = start + offset;
    if deadline <= Instant::now() {
        return;
    }
    tokio::time::sleep_until(deadline).await;
}
