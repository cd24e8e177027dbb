// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Reconnect backoff: failure episode tracking and pluggable wait policies.

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;

/// Maps a consecutive-failure attempt count to a wait duration.
///
/// The wait is computed strictly from the attempt count, never from elapsed
/// wall-clock time; episode bookkeeping lives in [`FailureEpisode`].
pub type BackoffPolicy = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(2);
const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(60);

/// Default fixed-growth policy: `attempt * 2s`, capped at 60s.
#[must_use]
pub fn default_backoff(attempt: u32) -> Duration {
    DEFAULT_BACKOFF_STEP
        .saturating_mul(attempt.max(1))
        .min(DEFAULT_BACKOFF_CAP)
}

/// Computes the wait for an attempt count under `policy`, clamped so the
/// result is never zero for attempts >= 1.
#[must_use]
pub fn next_wait(policy: &BackoffPolicy, attempt: u32) -> Duration {
    policy(attempt).max(Duration::from_millis(1))
}

/// Tracks a run of consecutive failed connection attempts.
///
/// Failures separated by more than the reset threshold are not cumulative:
/// the attempt count falls back to zero before the next failure is counted.
/// The episode is zeroed outright on every successful connection.
#[derive(Debug, Default)]
pub struct FailureEpisode {
    attempts: u32,
    last_attempt: Option<Instant>,
}

impl FailureEpisode {
    /// Creates a fresh zero-state episode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failed attempt at `now` and returns the attempt count the
    /// backoff policy should be applied to.
    pub fn record_failure(&mut self, now: Instant, reset_after: Duration) -> u32 {
        if let Some(last) = self.last_attempt {
            if now.saturating_duration_since(last) >= reset_after {
                self.attempts = 0;
            }
        }

        self.attempts += 1;
        self.last_attempt = Some(now);
        self.attempts
    }

    /// Resets the episode to a fresh zero-state (on successful connection).
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.last_attempt = None;
    }

    /// Returns the current attempt count.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const RESET_AFTER: Duration = Duration::from_secs(30 * 60);

    #[rstest]
    fn test_default_backoff_positive_and_non_decreasing() {
        let mut previous = Duration::ZERO;
        for attempt in 1..=100 {
            let wait = default_backoff(attempt);
            assert!(wait > Duration::ZERO, "attempt {attempt} returned zero");
            assert!(wait >= previous, "attempt {attempt} decreased the wait");
            previous = wait;
        }
    }

    #[rstest]
    fn test_default_backoff_caps() {
        assert_eq!(default_backoff(1), Duration::from_secs(2));
        assert_eq!(default_backoff(30), Duration::from_secs(60));
        assert_eq!(default_backoff(1_000), Duration::from_secs(60));
    }

    #[rstest]
    fn test_next_wait_clamps_zero_policies() {
        let policy: BackoffPolicy = Arc::new(|_| Duration::ZERO);
        assert!(next_wait(&policy, 1) > Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_episode_counts_consecutive_failures() {
        let mut episode = FailureEpisode::new();
        let now = Instant::now();

        assert_eq!(episode.record_failure(now, RESET_AFTER), 1);
        assert_eq!(
            episode.record_failure(now + Duration::from_secs(5), RESET_AFTER),
            2
        );
        assert_eq!(
            episode.record_failure(now + Duration::from_secs(10), RESET_AFTER),
            3
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_episode_resets_after_quiet_period() {
        let mut episode = FailureEpisode::new();
        let now = Instant::now();

        for i in 0..7 {
            episode.record_failure(now + Duration::from_secs(i), RESET_AFTER);
        }
        assert_eq!(episode.attempts(), 7);

        // A failure after a long quiet period counts as attempt one again
        let later = now + Duration::from_secs(7) + RESET_AFTER;
        assert_eq!(episode.record_failure(later, RESET_AFTER), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_episode_reset_on_success() {
        let mut episode = FailureEpisode::new();
        let now = Instant::now();

        episode.record_failure(now, RESET_AFTER);
        episode.record_failure(now + Duration::from_secs(1), RESET_AFTER);
        episode.reset();

        assert_eq!(episode.attempts(), 0);
        assert_eq!(
            episode.record_failure(now + Duration::from_secs(2), RESET_AFTER),
            1
        );
    }
}
