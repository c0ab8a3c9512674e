//! Weekly update schedule and next-run estimation.
//!
//! The estimate is advisory: it only feeds the metadata document. The actual
//! trigger lives in an external scheduler.

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone, Utc, Weekday};

use crate::error::{AppError, ErrorKind};

/// Fixed weekly schedule: a set of weekdays at one UTC time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub weekdays: Vec<Weekday>,
    pub at: NaiveTime,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            weekdays: vec![Weekday::Mon, Weekday::Thu],
            at: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl Schedule {
    pub fn new(mut weekdays: Vec<Weekday>, at: NaiveTime) -> Result<Self, AppError> {
        if weekdays.is_empty() {
            return Err(AppError::new(
                ErrorKind::Config,
                "Schedule needs at least one weekday.",
            ));
        }
        weekdays.sort_by_key(|d| d.num_days_from_monday());
        weekdays.dedup();
        Ok(Self { weekdays, at })
    }

    /// Next scheduled instant strictly after `now`.
    ///
    /// Today counts only while the scheduled time is still ahead; a scheduled
    /// time equal to `now` has already passed.
    pub fn next_run(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        if self.runs_on(now.weekday()) && now.time() < self.at {
            return Some(Utc.from_utc_datetime(&today.and_time(self.at)));
        }

        (1..=7u64)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .find(|day| self.runs_on(day.weekday()))
            .map(|day| Utc.from_utc_datetime(&day.and_time(self.at)))
    }

    /// Human-readable form, e.g. `Mon, Thu at 06:00 UTC`.
    pub fn describe(&self) -> String {
        let days: Vec<String> = self.weekdays.iter().map(|d| d.to_string()).collect();
        format!("{} at {} UTC", days.join(", "), self.at.format("%H:%M"))
    }

    fn runs_on(&self, day: Weekday) -> bool {
        self.weekdays.contains(&day)
    }
}
