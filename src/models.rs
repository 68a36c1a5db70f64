use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day tokens accepted by weekly recurrences.
///
/// Anything outside the seven canonical lowercase names is kept verbatim in
/// `Other` so stored records survive a read/write cycle untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Other(String),
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DayOfWeek::Sunday => "sunday",
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Other(token) => token,
        }
    }
}

impl From<String> for DayOfWeek {
    fn from(token: String) -> Self {
        match token.as_str() {
            "sunday" => DayOfWeek::Sunday,
            "monday" => DayOfWeek::Monday,
            "tuesday" => DayOfWeek::Tuesday,
            "wednesday" => DayOfWeek::Wednesday,
            "thursday" => DayOfWeek::Thursday,
            "friday" => DayOfWeek::Friday,
            "saturday" => DayOfWeek::Saturday,
            _ => DayOfWeek::Other(token),
        }
    }
}

impl From<&str> for DayOfWeek {
    fn from(token: &str) -> Self {
        DayOfWeek::from(token.to_string())
    }
}

impl From<DayOfWeek> for String {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a custom recurrence interval.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum RepetitionUnit {
    Days,
    Weeks,
    Months,
    Years,
    Other(String),
}

impl RepetitionUnit {
    pub fn as_str(&self) -> &str {
        match self {
            RepetitionUnit::Days => "days",
            RepetitionUnit::Weeks => "weeks",
            RepetitionUnit::Months => "months",
            RepetitionUnit::Years => "years",
            RepetitionUnit::Other(token) => token,
        }
    }
}

impl From<String> for RepetitionUnit {
    fn from(token: String) -> Self {
        match token.as_str() {
            "days" => RepetitionUnit::Days,
            "weeks" => RepetitionUnit::Weeks,
            "months" => RepetitionUnit::Months,
            "years" => RepetitionUnit::Years,
            _ => RepetitionUnit::Other(token),
        }
    }
}

impl From<&str> for RepetitionUnit {
    fn from(token: &str) -> Self {
        RepetitionUnit::from(token.to_string())
    }
}

impl From<RepetitionUnit> for String {
    fn from(unit: RepetitionUnit) -> Self {
        match unit {
            RepetitionUnit::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RepetitionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a task repeats.
///
/// Values are only ever stored and displayed; nothing computes the next
/// occurrence from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    /// Every `interval` days.
    Daily { interval: i64 },
    /// On the listed days of every week, in the order they were picked.
    Weekly { days: Vec<DayOfWeek> },
    /// On a fixed day of every month.
    Monthly { day_of_month: i64 },
    /// Every `interval` units.
    Custom { interval: i64, unit: RepetitionUnit },
}

impl Recurrence {
    /// The discriminator token written to `repetitionType`.
    pub fn kind(&self) -> RecurrenceKind {
        match self {
            Recurrence::Daily { .. } => RecurrenceKind::Daily,
            Recurrence::Weekly { .. } => RecurrenceKind::Weekly,
            Recurrence::Monthly { .. } => RecurrenceKind::Monthly,
            Recurrence::Custom { .. } => RecurrenceKind::Custom,
        }
    }
}

/// Discriminator of a [`Recurrence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl RecurrenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Custom => "custom",
        }
    }
}

impl FromStr for RecurrenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            "custom" => Ok(RecurrenceKind::Custom),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The account that owns tasks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A household task as the application sees it, with its recurrence decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task.
    pub task_id: u64,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Owning user, if any.
    pub owner_id: Option<u64>,
    /// Whether the task has been completed.
    pub is_completed: bool,
    /// Calendar day the task is due.
    pub due_date: NaiveDate,
    /// Repetition rule, `None` when the task does not repeat.
    pub repetition: Option<Recurrence>,
}

/// Input for inserting a task; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub owner_id: Option<u64>,
    pub due_date: NaiveDate,
    pub repetition: Option<Recurrence>,
}
