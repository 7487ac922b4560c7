//! Retry with exponential backoff for transient failures.
//!
//! The delay before retry `n` (1-based) is
//! `min(max_delay, base_delay * 2^(n-1)) + min(jitter_cap, jitter_step * n)`.
//! Only failures accepted by the classifier are retried; anything else is
//! returned at once without sleeping.

use std::time::Duration;

use crate::error::{Error, Result};

/// Substrings (matched case-insensitively) that mark a process or network
/// failure as transient.
pub const TRANSIENT_MARKERS: &[&str] = &[
    "WinError 10048",
    "Address already in use",
    "Operation timed out",
    "timed out",
    "network is unreachable",
    "could not resolve host",
    "Connection reset by peer",
    "The remote end hung up unexpectedly",
    "RPC failed",
    "unable to access",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_step: Duration,
    pub jitter_cap: Duration,
}

impl RetryPolicy {
    /// Spreadsheet API calls: five attempts in total, 1s doubling up to 8s.
    pub fn api() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            jitter_step: Duration::ZERO,
            jitter_cap: Duration::ZERO,
        }
    }

    /// External processes: six retries, 1.5s doubling, plus 0.2s per attempt (max 1s).
    pub fn process() -> Self {
        Self {
            max_retries: 6,
            base_delay: Duration::from_millis(1500),
            max_delay: Duration::from_secs(30),
            jitter_step: Duration::from_millis(200),
            jitter_cap: Duration::from_secs(1),
        }
    }

    /// Single attempt, never sleeps.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter_step: Duration::ZERO,
            jitter_cap: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let backoff = self
            .base_delay
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max_delay)
            .min(self.max_delay);
        let jitter = self.jitter_step.saturating_mul(retry).min(self.jitter_cap);
        backoff + jitter
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::process()
    }
}

/// True when the failure text contains one of [`TRANSIENT_MARKERS`].
pub fn is_transient_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    TRANSIENT_MARKERS
        .iter()
        .any(|marker| lower.contains(&marker.to_lowercase()))
}

/// Classifier for process failures: match the captured failure text.
pub fn is_transient_failure(err: &Error) -> bool {
    is_transient_text(&err.failure_text())
}

/// Classifier for API failures: trust the error's own `retryable` flag.
pub fn is_retryable(err: &Error) -> bool {
    err.retryable.unwrap_or(false)
}

/// Run `operation` under `policy`, sleeping with [`std::thread::sleep`].
pub fn retry<T, F, C>(policy: &RetryPolicy, label: &str, classify: C, operation: F) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
    C: Fn(&Error) -> bool,
{
    retry_with(policy, label, classify, std::thread::sleep, operation)
}

/// Like [`retry`], with the sleep function supplied by the caller.
///
/// `operation` receives the 1-based attempt number.
pub fn retry_with<T, F, C, S>(
    policy: &RetryPolicy,
    label: &str,
    classify: C,
    mut sleep: S,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
    C: Fn(&Error) -> bool,
    S: FnMut(Duration),
{
    let mut attempt = 1;
    loop {
        match operation(attempt) {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retries_done = attempt - 1;
                if retries_done >= policy.max_retries || !classify(&err) {
                    return Err(err);
                }

                let delay = policy.delay_for_retry(attempt);
                log_status!(
                    "retry",
                    "{} failed with a transient error: {}",
                    label,
                    err.failure_text().lines().last().unwrap_or_default()
                );
                log_status!(
                    "retry",
                    "Waiting {:.1}s before retrying ({}/{})",
                    delay.as_secs_f64(),
                    attempt,
                    policy.max_retries
                );
                sleep(delay);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandFailedDetails;
    use std::cell::RefCell;

    fn failure(stderr: &str) -> Error {
        Error::command_failed(
            CommandFailedDetails {
                command: "git push -u origin main".to_string(),
                exit_code: Some(128),
                stderr: stderr.to_string(),
                attempts: 1,
            },
            false,
        )
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
            jitter_step: Duration::from_millis(1),
            jitter_cap: Duration::from_millis(2),
        }
    }

    #[test]
    fn classifies_known_markers_case_insensitively() {
        assert!(is_transient_text("fatal: Could not resolve host: github.com"));
        assert!(is_transient_text("error: RPC failed; curl 56"));
        assert!(is_transient_text("[WinError 10048] Only one usage of each socket address"));
        assert!(!is_transient_text("error: src refspec main does not match any"));
    }

    #[test]
    fn delays_double_and_cap() {
        let policy = RetryPolicy::process();
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(1500 + 200));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(3000 + 400));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(6000 + 600));
        assert_eq!(policy.delay_for_retry(6), Duration::from_secs(30) + Duration::from_secs(1));
    }

    #[test]
    fn api_policy_has_no_jitter() {
        let policy = RetryPolicy::api();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_retry(4), Duration::from_secs(8));
        assert_eq!(policy.delay_for_retry(10), Duration::from_secs(8));
    }

    #[test]
    fn transient_failure_retries_until_exhausted() {
        let sleeps = RefCell::new(Vec::new());
        let mut calls = 0;

        let result: Result<()> = retry_with(
            &fast_policy(3),
            "git push",
            is_transient_failure,
            |d| sleeps.borrow_mut().push(d),
            |_| {
                calls += 1;
                Err(failure("fatal: unable to access 'https://github.com/u/r.git/'"))
            },
        );

        assert!(result.is_err());
        assert_eq!(calls, 4);
        assert_eq!(
            *sleeps.borrow(),
            vec![
                Duration::from_millis(11),
                Duration::from_millis(22),
                Duration::from_millis(42),
            ]
        );
    }

    #[test]
    fn non_transient_failure_fails_without_sleeping() {
        let mut slept = false;
        let mut calls = 0;

        let result: Result<()> = retry_with(
            &fast_policy(5),
            "git push",
            is_transient_failure,
            |_| slept = true,
            |_| {
                calls += 1;
                Err(failure("error: failed to push some refs"))
            },
        );

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert!(!slept);
    }

    #[test]
    fn recovers_after_transient_failure() {
        let result = retry_with(
            &fast_policy(3),
            "git push",
            is_transient_failure,
            |_| {},
            |attempt| {
                if attempt < 3 {
                    Err(failure("Connection reset by peer"))
                } else {
                    Ok(attempt)
                }
            },
        );

        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn retryable_flag_drives_api_classifier() {
        let transient = Error::source_request_failed("HTTP 503", true);
        let fatal = Error::source_request_failed("HTTP 403", false);
        assert!(is_retryable(&transient));
        assert!(!is_retryable(&fatal));
    }
}
