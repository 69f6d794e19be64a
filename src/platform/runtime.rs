use std::time::Duration;

use chrono::Utc;

/// Asynchronously waits for the provided duration without blocking the executor thread.
///
/// Dropping the returned future cancels the wait.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    sleep_impl(duration).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep_impl(duration: Duration) {
    use gloo_timers::future::sleep;
    sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_impl(duration: Duration) {
    use tokio::time::sleep;
    sleep(duration).await;
}

/// Milliseconds since the Unix epoch according to the wall clock.
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn sleep_advances_paused_clock() {
        let start = tokio::time::Instant::now();
        sleep(Duration::from_millis(1_500)).await;
        assert!(start.elapsed() >= Duration::from_millis(1_500));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn zero_sleep_returns_immediately() {
        let start = tokio::time::Instant::now();
        sleep(Duration::ZERO).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn now_millis_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
