use crate::model::SyncMeta;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    pub base_delay_secs: u64,
    pub max_retries: u32,
    pub pause_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_secs: 300,
            max_retries: 5,
            pause_secs: 86_400,
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempts: u32) -> u64 {
        self.base_delay_secs
            .saturating_mul(2u64.saturating_pow(attempts))
    }

    pub fn exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_retries
    }

    pub fn record_failure(&self, previous: &SyncMeta, now: u64) -> SyncMeta {
        let attempts = previous.attempts.saturating_add(1);
        let wait = if self.exhausted(attempts) {
            self.pause_secs
        } else {
            self.delay_for(attempts)
        };
        SyncMeta {
            attempts,
            next_retry: Some(now.saturating_add(wait)),
            last_success: previous.last_success,
        }
    }

    pub fn record_success(&self, now: u64) -> SyncMeta {
        SyncMeta {
            attempts: 0,
            next_retry: None,
            last_success: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            base_delay_secs: 60,
            max_retries,
            pause_secs: 86_400,
        }
    }

    #[test]
    fn backoff_doubles_per_failure() {
        let policy = policy(10);
        let now = 1_000;
        let mut meta = SyncMeta::default();
        let mut last_wait = 0;
        for k in 1..10u32 {
            meta = policy.record_failure(&meta, now);
            let wait = meta.next_retry.unwrap() - now;
            assert_eq!(meta.attempts, k);
            assert_eq!(wait, 60 * 2u64.pow(k));
            assert!(wait > last_wait);
            last_wait = wait;
        }
    }

    #[test]
    fn exhausted_retries_hit_the_pause_ceiling() {
        let policy = policy(3);
        let now = 5_000;
        let mut meta = SyncMeta::default();
        for _ in 0..3 {
            meta = policy.record_failure(&meta, now);
        }
        assert_eq!(meta.attempts, 3);
        assert_eq!(meta.next_retry, Some(now + 86_400));

        let later = now + 86_400;
        meta = policy.record_failure(&meta, later);
        assert_eq!(meta.attempts, 4);
        assert_eq!(meta.next_retry, Some(later + 86_400));
    }

    #[test]
    fn failure_keeps_last_success() {
        let policy = policy(3);
        let previous = SyncMeta {
            attempts: 0,
            next_retry: None,
            last_success: Some(42),
        };
        let meta = policy.record_failure(&previous, 100);
        assert_eq!(meta.last_success, Some(42));
    }

    #[test]
    fn success_resets_regardless_of_history() {
        let policy = policy(3);
        let meta = policy.record_success(900);
        assert_eq!(meta.attempts, 0);
        assert_eq!(meta.next_retry, None);
        assert_eq!(meta.last_success, Some(900));
    }

    #[test]
    fn delay_saturates() {
        let policy = policy(100);
        assert_eq!(policy.delay_for(80), u64::MAX);
    }
}
