use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Enforces a minimum interval between outgoing requests and hands out an
/// exponential backoff duration for retrying a rate-limited request. Cloned
/// clients share one limiter via `Arc`.
pub struct RateLimiter {
    state: Mutex<RateLimiterState>,
}

struct RateLimiterState {
    last_request: Instant,
    min_interval: Duration,
    retry_count: u32,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64) -> Self {
        Self {
            state: Mutex::new(RateLimiterState {
                last_request: Instant::now() - Duration::from_secs(1),
                min_interval: Duration::from_secs_f64(1.0 / requests_per_second),
                retry_count: 0,
            }),
        }
    }

    pub async fn wait_if_needed(&self) {
        let mut state = self.state.lock().await;
        let elapsed = state.last_request.elapsed();
        if elapsed < state.min_interval {
            let wait_time = state.min_interval - elapsed;
            debug!(?wait_time, "rate limiting registry probe");
            tokio::time::sleep(wait_time).await;
        }
        state.last_request = Instant::now();
    }

    /// Exponential backoff: 1s, 2s, 4s, 8s, 16s (capped).
    pub async fn backoff(&self) -> Duration {
        let mut state = self.state.lock().await;
        state.retry_count += 1;
        let backoff_secs = 2_u64.pow(state.retry_count.min(4));
        Duration::from_secs(backoff_secs)
    }

    pub async fn reset_retry_count(&self) {
        self.state.lock().await.retry_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_does_not_wait() {
        let limiter = RateLimiter::new(1.0);
        let start = Instant::now();
        limiter.wait_if_needed().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn backoff_grows_and_caps_at_sixteen_seconds() {
        let limiter = RateLimiter::new(1.0);
        assert_eq!(limiter.backoff().await, Duration::from_secs(2));
        assert_eq!(limiter.backoff().await, Duration::from_secs(4));
        assert_eq!(limiter.backoff().await, Duration::from_secs(8));
        assert_eq!(limiter.backoff().await, Duration::from_secs(16));
        assert_eq!(limiter.backoff().await, Duration::from_secs(16));
    }

    #[tokio::test]
    async fn reset_retry_count_restarts_the_ladder() {
        let limiter = RateLimiter::new(1.0);
        limiter.backoff().await;
        limiter.backoff().await;
        limiter.reset_retry_count().await;
        assert_eq!(limiter.backoff().await, Duration::from_secs(2));
    }
}
