use std::time::Duration;

use crate::request::error::{invalid_request, RequestResult};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_DELAY_MILLIS: u64 = 1_000;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_MAX_DELAY_MILLIS: u64 = 32_000;

/// Exponential backoff configuration for [`ResilientClient`](crate::request::ResilientClient).
///
/// The k-th wait (k starting at 0) lasts `initial_delay * backoff_multiplier^k`, never longer
/// than `max_delay`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy, rejecting zero attempts and multipliers below 1.
    ///
    /// The delay ceiling defaults to 32 seconds, or to `initial_delay` when that is larger.
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        backoff_multiplier: f64,
    ) -> RequestResult<Self> {
        if max_attempts == 0 {
            return Err(invalid_request("max_attempts must be at least 1"));
        }
        if !backoff_multiplier.is_finite() || backoff_multiplier < 1.0 {
            return Err(invalid_request(format!(
                "backoff_multiplier must be a finite number >= 1, got {backoff_multiplier}"
            )));
        }
        let max_delay = initial_delay.max(Duration::from_millis(DEFAULT_MAX_DELAY_MILLIS));
        Ok(Self {
            max_attempts,
            initial_delay,
            backoff_multiplier,
            max_delay,
        })
    }

    /// Replaces the delay ceiling. The ceiling may not be shorter than the initial delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> RequestResult<Self> {
        if max_delay < self.initial_delay {
            return Err(invalid_request(format!(
                "max_delay ({max_delay:?}) must not be shorter than initial_delay ({:?})",
                self.initial_delay
            )));
        }
        self.max_delay = max_delay;
        Ok(self)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Returns the wait applied before the `(retry + 1)`-th retry.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MILLIS),
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MILLIS),
        }
    }
}

/// Outcome of a single attempt, as seen by the backoff machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptResult {
    Success,
    RateLimited,
    NetworkFailure,
    NonRetryable,
}

/// States of a retried request. `Succeeded` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryState {
    Attempting { attempt: u32 },
    Waiting { attempt: u32, delay: Duration },
    Succeeded,
    Failed,
}

impl RetryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded | RetryState::Failed)
    }
}

/// Tracks the evolving backoff state across attempts.
///
/// The machine performs no I/O: callers issue the attempt, [`record`](Self::record) its result,
/// sleep for the delay carried by `Waiting` and then [`resume`](Self::resume).
#[derive(Clone, Debug)]
pub struct Backoff {
    policy: RetryPolicy,
    state: RetryState,
    attempts_made: u32,
    retries: u32,
    total_delay: Duration,
}

impl Backoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Attempting { attempt: 0 },
            attempts_made: 0,
            retries: 0,
            total_delay: Duration::ZERO,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Number of attempts recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts_made
    }

    /// Sum of every delay scheduled so far.
    pub fn total_delay(&self) -> Duration {
        self.total_delay
    }

    /// Applies the result of the current attempt. Ignored outside `Attempting`.
    pub fn record(&mut self, result: AttemptResult) -> RetryState {
        let RetryState::Attempting { attempt } = self.state else {
            return self.state;
        };
        self.attempts_made += 1;

        self.state = match result {
            AttemptResult::Success => RetryState::Succeeded,
            AttemptResult::NonRetryable => RetryState::Failed,
            AttemptResult::RateLimited | AttemptResult::NetworkFailure => {
                if attempt + 1 < self.policy.max_attempts {
                    let delay = self.policy.delay_for_retry(self.retries);
                    self.retries += 1;
                    self.total_delay += delay;
                    RetryState::Waiting {
                        attempt: attempt + 1,
                        delay,
                    }
                } else {
                    RetryState::Failed
                }
            }
        };
        self.state
    }

    /// Leaves `Waiting` once its delay has elapsed. Ignored in every other state.
    pub fn resume(&mut self) -> RetryState {
        if let RetryState::Waiting { attempt, .. } = self.state {
            self.state = RetryState::Attempting { attempt };
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn default_schedule_doubles_from_one_second() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = (0..4).map(|retry| policy.delay_for_retry(retry)).collect();
        assert_eq!(delays, vec![millis(1_000), millis(2_000), millis(4_000), millis(8_000)]);
    }

    #[test]
    fn delay_is_capped_by_ceiling() {
        let policy = RetryPolicy::new(20, millis(1_000), 2.0)
            .unwrap()
            .with_max_delay(millis(5_000))
            .unwrap();
        assert_eq!(policy.delay_for_retry(2), millis(4_000));
        assert_eq!(policy.delay_for_retry(3), millis(5_000));
        assert_eq!(policy.delay_for_retry(u32::MAX), millis(5_000));
    }

    #[test]
    fn rejects_invalid_policies() {
        assert!(RetryPolicy::new(0, millis(10), 2.0).is_err());
        assert!(RetryPolicy::new(3, millis(10), 0.5).is_err());
        assert!(RetryPolicy::new(3, millis(10), f64::NAN).is_err());
        let err = RetryPolicy::new(3, millis(10_000), 2.0)
            .unwrap()
            .with_max_delay(millis(1))
            .unwrap_err();
        assert_eq!(err.kind(), crate::request::RequestErrorKind::InvalidRequest);
    }

    #[test]
    fn ceiling_never_below_initial_delay() {
        let policy = RetryPolicy::new(2, Duration::from_secs(60), 1.0).unwrap();
        assert_eq!(policy.max_delay(), Duration::from_secs(60));
        assert_eq!(policy.delay_for_retry(5), Duration::from_secs(60));
    }

    #[test]
    fn success_on_first_attempt_is_terminal() {
        let mut backoff = Backoff::new(RetryPolicy::default());
        assert_eq!(backoff.state(), RetryState::Attempting { attempt: 0 });
        assert_eq!(backoff.record(AttemptResult::Success), RetryState::Succeeded);
        assert_eq!(backoff.attempts(), 1);
        assert_eq!(backoff.total_delay(), Duration::ZERO);
    }

    #[test]
    fn retryable_results_wait_then_resume() {
        let mut backoff = Backoff::new(RetryPolicy::default());
        assert_eq!(
            backoff.record(AttemptResult::RateLimited),
            RetryState::Waiting {
                attempt: 1,
                delay: millis(1_000)
            }
        );
        assert_eq!(backoff.resume(), RetryState::Attempting { attempt: 1 });
        assert_eq!(
            backoff.record(AttemptResult::NetworkFailure),
            RetryState::Waiting {
                attempt: 2,
                delay: millis(2_000)
            }
        );
        backoff.resume();
        assert_eq!(backoff.record(AttemptResult::Success), RetryState::Succeeded);
        assert_eq!(backoff.attempts(), 3);
        assert_eq!(backoff.total_delay(), millis(3_000));
    }

    #[test]
    fn exhausting_attempts_fails() {
        let policy = RetryPolicy::new(3, millis(100), 2.0).unwrap();
        let mut backoff = Backoff::new(policy);
        let mut state = backoff.state();
        while !state.is_terminal() {
            backoff.record(AttemptResult::RateLimited);
            state = backoff.resume();
        }
        assert_eq!(state, RetryState::Failed);
        assert_eq!(backoff.attempts(), 3);
        assert_eq!(backoff.total_delay(), millis(300));
    }

    #[test]
    fn non_retryable_fails_without_delay() {
        let mut backoff = Backoff::new(RetryPolicy::default());
        assert_eq!(backoff.record(AttemptResult::NonRetryable), RetryState::Failed);
        assert_eq!(backoff.total_delay(), Duration::ZERO);
    }

    #[test]
    fn record_is_ignored_outside_attempting() {
        let mut backoff = Backoff::new(RetryPolicy::default());
        let waiting = backoff.record(AttemptResult::RateLimited);
        assert_eq!(backoff.record(AttemptResult::Success), waiting);
        assert_eq!(backoff.attempts(), 1);
    }
}
