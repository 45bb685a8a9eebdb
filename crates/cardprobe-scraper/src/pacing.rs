//! Politeness delay between consecutive batch items.

use std::time::Duration;

use cardprobe_core::BatchPolicy;

/// Base pacing delay plus a uniformly random share of the jitter window.
pub(crate) fn pacing_delay(policy: &BatchPolicy) -> Duration {
    let jitter_ms = u64::try_from(policy.pacing_jitter.as_millis()).unwrap_or(u64::MAX);
    if jitter_ms == 0 {
        return policy.pacing_delay;
    }
    let extra_ms = rand::random_range(0..=jitter_ms);
    policy
        .pacing_delay
        .saturating_add(Duration::from_millis(extra_ms))
}

/// Sleeps for one pacing interval. Returns immediately under a zero policy.
pub(crate) async fn pause(policy: &BatchPolicy) {
    let delay = pacing_delay(policy);
    if delay.is_zero() {
        return;
    }
    tracing::debug!(?delay, "pacing before next item");
    tokio::time::sleep(delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaced_policy_has_no_delay() {
        assert_eq!(pacing_delay(&BatchPolicy::unpaced(10)), Duration::ZERO);
    }

    #[test]
    fn delay_without_jitter_is_exact() {
        let policy = BatchPolicy {
            pacing_delay: Duration::from_millis(250),
            pacing_jitter: Duration::ZERO,
            ..BatchPolicy::default()
        };
        assert_eq!(pacing_delay(&policy), Duration::from_millis(250));
    }

    #[test]
    fn jitter_stays_within_window() {
        let policy = BatchPolicy {
            pacing_delay: Duration::from_millis(2_000),
            pacing_jitter: Duration::from_millis(1_000),
            ..BatchPolicy::default()
        };
        for _ in 0..200 {
            let delay = pacing_delay(&policy);
            assert!(delay >= Duration::from_millis(2_000), "{delay:?}");
            assert!(delay <= Duration::from_millis(3_000), "{delay:?}");
        }
    }

    #[tokio::test]
    async fn pause_returns_immediately_when_unpaced() {
        let started = std::time::Instant::now();
        pause(&BatchPolicy::unpaced(3)).await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
