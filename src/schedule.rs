//! Daily update scheduling: when the next run happens, how jobs are
//! registered, and how failed runs are retried.
//!
//! Everything here is pure bookkeeping over explicit timestamps; nothing
//! reads the clock. The `daemon` command drives it with the local time.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Days, NaiveDateTime, NaiveTime};

/// Name under which the daily wallpaper job is registered.
pub const DAILY_JOB_NAME: &str = "wallpaper_daily_update";

// ============================================================================
// DailySchedule
// ============================================================================

/// A once-a-day run shortly after midnight.
///
/// A run may start anywhere within `flex` after `run_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub run_at: NaiveTime,
    pub flex: Duration,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            run_at: NaiveTime::from_hms_opt(0, 1, 0).unwrap_or_default(),
            flex: Duration::from_secs(15 * 60),
        }
    }
}

impl DailySchedule {
    /// Start of the run window on the day after `now`.
    ///
    /// Returns `None` only at the end of chrono's representable range.
    pub fn next_run_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let tomorrow = now.date().checked_add_days(Days::new(1))?;
        Some(tomorrow.and_time(self.run_at))
    }

    /// Time to wait from `now` until the next run window opens.
    pub fn initial_delay(&self, now: NaiveDateTime) -> Option<Duration> {
        let next = self.next_run_after(now)?;
        (next - now).to_std().ok()
    }

    /// Whether `at` falls inside the `[run_at, run_at + flex)` window of its day.
    pub fn in_window(&self, at: NaiveDateTime) -> bool {
        let start = at.date().and_time(self.run_at);
        let Ok(flex) = chrono::Duration::from_std(self.flex) else {
            return false;
        };
        at >= start && at < start + flex
    }
}

// ============================================================================
// JobRegistry
// ============================================================================

/// What to do when a job with the same name is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingJobPolicy {
    /// Leave the existing job untouched.
    Keep,
    /// Swap in the new job.
    Replace,
}

/// A registered periodic job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJob {
    pub schedule: DailySchedule,
    pub next_run: NaiveDateTime,
}

impl ScheduledJob {
    /// A job whose first run is the next window after `now`.
    pub fn daily(schedule: DailySchedule, now: NaiveDateTime) -> Option<Self> {
        Some(Self {
            schedule,
            next_run: schedule.next_run_after(now)?,
        })
    }

    /// Whether `now` is past the end of this job's run window, e.g. because
    /// the machine was asleep. An overdue job still runs once, late.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        let Ok(flex) = chrono::Duration::from_std(self.schedule.flex) else {
            return false;
        };
        now >= self.next_run + flex
    }
}

/// Named, unique periodic jobs.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: HashMap<String, ScheduledJob>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `job` under `name`. Returns whether the registry changed.
    ///
    /// With [`ExistingJobPolicy::Keep`] this is idempotent, so it is safe to
    /// call on every start-up.
    pub fn enqueue_unique(&mut self, name: &str, job: ScheduledJob, policy: ExistingJobPolicy) -> bool {
        match (self.jobs.get(name), policy) {
            (Some(_), ExistingJobPolicy::Keep) => false,
            (Some(existing), ExistingJobPolicy::Replace) if *existing == job => false,
            _ => {
                tracing::info!(name, next_run = %job.next_run, "scheduled job");
                self.jobs.insert(name.to_owned(), job);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScheduledJob> {
        self.jobs.get(name)
    }

    /// Removes the job registered under `name`.
    pub fn cancel(&mut self, name: &str) -> Option<ScheduledJob> {
        self.jobs.remove(name)
    }

    /// Moves a job's next run to the window after `now`. Returns the new time.
    pub fn advance(&mut self, name: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let job = self.jobs.get_mut(name)?;
        job.next_run = job.schedule.next_run_after(now)?;
        Some(job.next_run)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

// ============================================================================
// Retry
// ============================================================================

/// Exponential backoff for failed background runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(30),
            max_backoff: Duration::from_secs(5 * 60 * 60),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after `attempt` (1-based) has failed,
    /// or `None` once attempts are exhausted.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        Some(self.initial_backoff.saturating_mul(factor).min(self.max_backoff))
    }
}

/// Result of one background run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    /// Try again after the delay.
    Retry(Duration),
    /// Attempts exhausted; wait for the next scheduled run.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn next_run_is_tomorrow_just_after_midnight() {
        let schedule = DailySchedule::default();
        assert_eq!(schedule.next_run_after(at(2026, 1, 31, 15, 30)), Some(at(2026, 2, 1, 0, 1)));
        // Even just before today's window, the first run is tomorrow.
        assert_eq!(schedule.next_run_after(at(2026, 1, 31, 0, 0)), Some(at(2026, 2, 1, 0, 1)));
        // Year and leap-day rollover.
        assert_eq!(schedule.next_run_after(at(2026, 12, 31, 23, 59)), Some(at(2027, 1, 1, 0, 1)));
        assert_eq!(schedule.next_run_after(at(2024, 2, 28, 12, 0)), Some(at(2024, 2, 29, 0, 1)));
    }

    #[test]
    fn initial_delay_counts_to_next_window() {
        let schedule = DailySchedule::default();
        let delay = schedule.initial_delay(at(2026, 1, 31, 23, 0)).unwrap();
        assert_eq!(delay, Duration::from_secs(61 * 60));
    }

    #[test]
    fn flex_window_is_fifteen_minutes() {
        let schedule = DailySchedule::default();
        assert!(!schedule.in_window(at(2026, 2, 1, 0, 0)));
        assert!(schedule.in_window(at(2026, 2, 1, 0, 1)));
        assert!(schedule.in_window(at(2026, 2, 1, 0, 15)));
        assert!(!schedule.in_window(at(2026, 2, 1, 0, 16)));
    }

    #[test]
    fn job_is_overdue_only_after_its_window() {
        let job = ScheduledJob::daily(DailySchedule::default(), at(2026, 1, 31, 22, 0)).unwrap();
        assert_eq!(job.next_run, at(2026, 2, 1, 0, 1));

        assert!(!job.is_overdue(at(2026, 1, 31, 23, 59)));
        assert!(!job.is_overdue(at(2026, 2, 1, 0, 1)));
        assert!(!job.is_overdue(at(2026, 2, 1, 0, 15)));
        assert!(job.is_overdue(at(2026, 2, 1, 0, 16)));
        assert!(job.is_overdue(at(2026, 2, 3, 0, 5)));
    }

    #[test]
    fn keep_policy_is_idempotent() {
        let mut registry = JobRegistry::new();
        let first = ScheduledJob::daily(DailySchedule::default(), at(2026, 1, 1, 9, 0)).unwrap();
        let later = ScheduledJob::daily(DailySchedule::default(), at(2026, 1, 5, 9, 0)).unwrap();

        assert!(registry.enqueue_unique(DAILY_JOB_NAME, first.clone(), ExistingJobPolicy::Keep));
        assert!(!registry.enqueue_unique(DAILY_JOB_NAME, later, ExistingJobPolicy::Keep));
        assert_eq!(registry.get(DAILY_JOB_NAME), Some(&first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn replace_policy_swaps_job() {
        let mut registry = JobRegistry::new();
        let first = ScheduledJob::daily(DailySchedule::default(), at(2026, 1, 1, 9, 0)).unwrap();
        let later = ScheduledJob::daily(DailySchedule::default(), at(2026, 1, 5, 9, 0)).unwrap();

        registry.enqueue_unique(DAILY_JOB_NAME, first, ExistingJobPolicy::Keep);
        assert!(registry.enqueue_unique(DAILY_JOB_NAME, later.clone(), ExistingJobPolicy::Replace));
        assert_eq!(registry.get(DAILY_JOB_NAME), Some(&later));
    }

    #[test]
    fn cancel_and_advance() {
        let mut registry = JobRegistry::new();
        let job = ScheduledJob::daily(DailySchedule::default(), at(2026, 1, 1, 9, 0)).unwrap();
        registry.enqueue_unique(DAILY_JOB_NAME, job, ExistingJobPolicy::Keep);

        assert_eq!(registry.advance(DAILY_JOB_NAME, at(2026, 1, 2, 0, 3)), Some(at(2026, 1, 3, 0, 1)));
        assert!(registry.cancel(DAILY_JOB_NAME).is_some());
        assert!(registry.is_empty());
        assert!(registry.advance(DAILY_JOB_NAME, at(2026, 1, 2, 0, 3)).is_none());
    }

    #[test]
    fn backoff_doubles_until_exhausted() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.next_delay(1), Some(Duration::from_secs(30)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_secs(60)));
        assert_eq!(policy.next_delay(3), Some(Duration::from_secs(120)));
        assert_eq!(policy.next_delay(4), Some(Duration::from_secs(240)));
        assert_eq!(policy.next_delay(5), None);
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 40,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.next_delay(30), Some(policy.max_backoff));
        assert_eq!(policy.next_delay(39), Some(policy.max_backoff));
    }
}
