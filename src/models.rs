use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Task priority, ordered by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Stable ordinal used in exports (1 = low, 3 = high).
    pub fn value(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Low => "[LOW]",
            Self::Medium => "[MEDIUM]",
            Self::High => "[HIGH]",
        }
    }

    /// The next priority, wrapping from high back to low.
    pub fn cycle(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" | "1" => Ok(Self::Low),
            "medium" | "med" | "m" | "2" => Ok(Self::Medium),
            "high" | "h" | "3" => Ok(Self::High),
            _ => Err(TaskError::InvalidPriority(s.to_string())),
        }
    }
}

/// Input for `TaskManager::add_task`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Local>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: DateTime<Local>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A single to-do item.
///
/// Tasks get their id from the `TaskManager` that stores them; a task built
/// with [`Task::new`] has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: Option<u64>,
    title: String,
    description: String,
    priority: Priority,
    due_date: Option<DateTime<Local>>,
    completed: bool,
    created_at: DateTime<Local>,
    completed_at: Option<DateTime<Local>>,
}

impl Task {
    /// Builds a pending task. The title is not validated here.
    pub fn new(draft: NewTask, created_at: DateTime<Local>) -> Self {
        Self {
            id: None,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            due_date: draft.due_date,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_date(&self) -> Option<DateTime<Local>> {
        self.due_date
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    /// Marks the task done. Completing twice refreshes `completed_at`.
    pub fn mark_completed(&mut self, at: DateTime<Local>) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    /// True when the task is pending and `now` is strictly past its due date.
    pub fn is_overdue(&self, now: DateTime<Local>) -> bool {
        match self.due_date {
            Some(due) if !self.completed => now > due,
            _ => false,
        }
    }

    /// Whole days left until the due date, rounded down.
    ///
    /// Negative once the task is overdue. `None` for completed tasks and
    /// tasks without a due date.
    pub fn days_until_due(&self, now: DateTime<Local>) -> Option<i64> {
        if self.completed {
            return None;
        }
        self.due_date.map(|due| {
            let millis = (due - now).num_milliseconds();
            millis.div_euclid(SECONDS_PER_DAY * 1000)
        })
    }

    /// Short human label for the time left: "Today", "3d" or "2d overdue".
    pub fn due_label(&self, now: DateTime<Local>) -> Option<String> {
        self.days_until_due(now).map(|days| {
            if days < 0 {
                format!("{}d overdue", days.abs())
            } else if days == 0 {
                "Today".to_string()
            } else {
                format!("{}d", days)
            }
        })
    }

    /// Case-insensitive substring match on title or description.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority.value(),
            due_date: self.due_date.map(|d| d.to_rfc3339()),
            completed: self.completed,
            created_at: self.created_at.to_rfc3339(),
            completed_at: self.completed_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// Serializable view of a task, as written to exports.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    /// 1 = low, 2 = medium, 3 = high.
    pub priority: u8,
    pub due_date: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub completed_at: Option<String>,
}

/// Parses a due date typed by a user.
///
/// Accepts `YYYY-MM-DD` (due at the end of that local day) or a day offset
/// from `now` such as `+3` or `-1`.
pub fn parse_due_date(input: &str, now: DateTime<Local>) -> Result<DateTime<Local>, TaskError> {
    let input = input.trim();
    let invalid = || TaskError::InvalidDueDate(input.to_string());

    if input.starts_with('+') || input.starts_with('-') {
        let days: i64 = input.parse().map_err(|_| invalid())?;
        return Duration::try_days(days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(invalid);
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
    let end_of_day = date.and_hms_opt(23, 59, 59).ok_or_else(invalid)?;
    Local
        .from_local_datetime(&end_of_day)
        .earliest()
        .ok_or_else(invalid)
}
