//! TMDB API request pacing.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Minimum-interval rate limiter for TMDB API.
///
/// TMDB enforces roughly 40 requests per second. A page of cards fans out
/// two requests per title, so every request is paced through one limiter.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Timestamp of the last granted request.
    last_request: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Returns how long a request issued at `now` has to wait.
    fn delay_at(&self, now: Instant) -> Duration {
        self.last_request.map_or(Duration::ZERO, |last| {
            self.min_interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Waits until the next request is allowed and records it.
    pub async fn wait(&mut self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            tracing::trace!(delay_ms = delay.as_millis(), "pacing TMDB request");
            tokio::time::sleep(delay).await;
        }
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_first_request_has_no_delay() {
        // Arrange
        let limiter = TmdbRateLimiter::new(Duration::from_secs(1));

        // Act
        let delay = limiter.delay_at(Instant::now());

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_delay_is_remaining_interval() {
        // Arrange
        let start = Instant::now();
        let limiter = TmdbRateLimiter {
            min_interval: Duration::from_millis(100),
            last_request: Some(start),
        };

        // Act
        let delay = limiter.delay_at(start.checked_add(Duration::from_millis(30)).unwrap());

        // Assert
        assert_eq!(delay, Duration::from_millis(70));
    }

    #[test]
    fn test_delay_after_interval_elapsed_is_zero() {
        // Arrange
        let start = Instant::now();
        let limiter = TmdbRateLimiter {
            min_interval: Duration::from_millis(100),
            last_request: Some(start),
        };

        // Act
        let delay = limiter.delay_at(start.checked_add(Duration::from_millis(250)).unwrap());

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_consecutive_waits_respect_interval() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(limiter.last_request.is_some());
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let limiter = TmdbRateLimiter::default_interval();

        // Assert
        assert_eq!(limiter.min_interval, Duration::from_millis(25));
    }
}
