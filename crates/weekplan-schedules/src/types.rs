use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use weekplan_core::Day;

/// One titled activity on one day of the week, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Store-assigned; the `schedule_id` column.
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    /// Fixed at creation. Only the title is editable.
    pub day: Day,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Schedule {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// A user's schedules bucketed by day.
///
/// Always holds all seven days, in week order, even when a bucket is empty;
/// serialises as `{"monday": [...], ..., "sunday": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeekSchedules(BTreeMap<Day, Vec<Schedule>>);

impl WeekSchedules {
    pub fn empty() -> Self {
        Self(Day::ALL.into_iter().map(|d| (d, Vec::new())).collect())
    }

    /// Bucket `schedules`, keeping their relative order within each day.
    pub fn from_schedules(schedules: impl IntoIterator<Item = Schedule>) -> Self {
        let mut week = Self::empty();
        for schedule in schedules {
            week.0.entry(schedule.day).or_default().push(schedule);
        }
        week
    }

    pub fn day(&self, day: Day) -> &[Schedule] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of schedules across all seven days.
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}
