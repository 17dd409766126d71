//! Bounded retry primitive for reachability polling.
//!
//! A reusable sleep-and-probe loop expressed as an explicit policy value
//! driven by an injectable [`Sleeper`], so tests simulate time without
//! real delay.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::Sleeper;

/// Fixed-interval bounded retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Delay between attempts.
    pub interval: Duration,
    /// Hard cap on probe attempts.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// The reachability policy: 15-second interval, 40 attempts (~10 min).
    #[must_use]
    pub const fn reachability() -> Self {
        Self {
            interval: Duration::from_secs(15),
            max_attempts: 40,
        }
    }
}

/// Outcome of a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The probe passed on the given attempt (1-based).
    Passed { attempts: u32 },
    /// Every attempt was spent without a passing probe. The caller alone
    /// decides follow-up action.
    Exhausted,
}

/// Probe until `probe` passes or the policy is exhausted.
///
/// Success short-circuits on the first passing probe. Sleeps only between
/// attempts, so a probe passing on call k+1 costs exactly k intervals.
///
/// # Errors
///
/// Probe errors propagate immediately: a failing provider call is fatal,
/// not a reason to retry.
pub async fn poll<S, F, Fut>(policy: RetryPolicy, sleeper: &S, mut probe: F) -> Result<PollOutcome>
where
    S: Sleeper,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    for attempt in 1..=policy.max_attempts {
        if probe().await? {
            return Ok(PollOutcome::Passed { attempts: attempt });
        }
        if attempt < policy.max_attempts {
            sleeper.sleep(policy.interval).await;
        }
    }
    Ok(PollOutcome::Exhausted)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
