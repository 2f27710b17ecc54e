//! Minimum spacing between outbound calls

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum interval between consecutive calls to the remote service
///
/// The last-call timestamp sits behind an async mutex that is held across the
/// wait, so concurrent callers are spaced out one after another.
#[derive(Debug)]
pub struct Pacer {
    interval: Option<Duration>,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Waits out the rest of the interval since the previous call, then records this one
    ///
    /// Returns how long the caller was held back.
    pub async fn wait_if_needed(&self) -> Duration {
        let Some(interval) = self.interval else {
            return Duration::ZERO;
        };

        let mut last_call = self.last_call.lock().await;
        let mut waited = Duration::ZERO;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                waited = interval - elapsed;
                debug!(delay_ms = waited.as_millis() as u64, "pacing GIDEON API call");
                tokio::time::sleep(waited).await;
            }
        }
        *last_call = Some(Instant::now());
        waited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_interval_never_waits() {
        let pacer = Pacer::new(None);
        assert_eq!(pacer.wait_if_needed().await, Duration::ZERO);
        assert_eq!(pacer.wait_if_needed().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_first_call_is_immediate() {
        let pacer = Pacer::new(Some(Duration::from_secs(10)));
        let start = Instant::now();
        pacer.wait_if_needed().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_second_call_waits_remaining_interval() {
        let interval = Duration::from_millis(150);
        let pacer = Pacer::new(Some(interval));

        let start = Instant::now();
        pacer.wait_if_needed().await;
        pacer.wait_if_needed().await;

        assert!(start.elapsed() >= interval);
    }

    #[tokio::test]
    async fn test_no_wait_after_interval_has_passed() {
        let interval = Duration::from_millis(20);
        let pacer = Pacer::new(Some(interval));

        pacer.wait_if_needed().await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(pacer.wait_if_needed().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_spaced() {
        let interval = Duration::from_millis(100);
        let pacer = std::sync::Arc::new(Pacer::new(Some(interval)));

        let start = Instant::now();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let pacer = pacer.clone();
                tokio::spawn(async move { pacer.wait_if_needed().await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("pacer task panicked");
        }

        assert!(start.elapsed() >= interval * 2);
    }
}
