//! Conversion between stored `(repetitionType, repetitionData)` pairs, raw
//! form input and the typed [`Recurrence`].
//!
//! Nothing in here returns an error to the caller. Absent or malformed
//! recurrence data means the task does not repeat, so a corrupted payload can
//! never block listing or creating tasks.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use serde::{de, Deserialize, Deserializer};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{DayOfWeek, Recurrence, RecurrenceKind, RepetitionUnit};

/// Form field names used by the add-task form.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DUE_DATE: &str = "dueDate";
    pub const REPETITION_TYPE: &str = "repetitionType";
    pub const DAILY_INTERVAL: &str = "dailyInterval";
    pub const WEEKLY_DAYS: &str = "weeklyDays";
    pub const MONTHLY_DAY: &str = "monthlyDay";
    pub const CUSTOM_INTERVAL: &str = "customInterval";
    pub const CUSTOM_UNIT: &str = "customUnit";
}

/// `repetitionType` token meaning "does not repeat" on the form.
pub const NO_REPETITION: &str = "none";

/// The persisted shape of a recurrence: discriminator and flat field object.
pub type StoragePair = (Option<String>, Option<Value>);

/// Why a stored pair could not be turned into a [`Recurrence`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown repetition type '{0}'")]
    UnknownKind(String),
    #[error("repetition data is not a JSON object")]
    NotAnObject,
    #[error("repetition data string is not valid JSON: {0}")]
    UnparseableString(#[source] serde_json::Error),
    #[error("malformed {kind} repetition data: {source}")]
    Malformed {
        kind: RecurrenceKind,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct DailyData {
    #[serde(deserialize_with = "whole_number")]
    interval: i64,
}

#[derive(Deserialize)]
struct WeeklyData {
    days: Vec<DayOfWeek>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthlyData {
    #[serde(deserialize_with = "whole_number")]
    day_of_month: i64,
}

#[derive(Deserialize)]
struct CustomData {
    #[serde(deserialize_with = "whole_number")]
    interval: i64,
    unit: RepetitionUnit,
}

/// Accepts integers and floats with no fractional part (`2.0`), rejecting
/// everything else including numeric strings.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(de::Error::custom(format!("expected a whole number, got {n}"))),
    }
}

/// Decodes a stored pair.
///
/// Returns `None` when either half is missing, and also when the pair is
/// present but unusable (unknown type, payload of the wrong shape). The latter
/// case is logged.
pub fn decode(kind: Option<&str>, data: Option<&Value>) -> Option<Recurrence> {
    let kind = kind.filter(|k| !k.is_empty())?;
    let data = data.filter(|d| !d.is_null())?;
    match try_decode(kind, data) {
        Ok(recurrence) => Some(recurrence),
        Err(e) => {
            warn!(repetition_type = kind, error = %e, "treating task as non-recurring");
            None
        }
    }
}

/// Strict form of [`decode`] for a pair that is known to be present.
///
/// Field values are taken as stored: intervals and days of month are not
/// range-checked, and day or unit tokens outside the canonical sets are kept.
pub fn try_decode(kind: &str, data: &Value) -> Result<Recurrence, DecodeError> {
    let kind: RecurrenceKind = kind.parse().map_err(DecodeError::UnknownKind)?;
    let data = payload_object(data)?;
    let malformed = |source| DecodeError::Malformed { kind, source };

    let recurrence = match kind {
        RecurrenceKind::Daily => {
            let d: DailyData = serde_json::from_value(data).map_err(malformed)?;
            Recurrence::Daily { interval: d.interval }
        }
        RecurrenceKind::Weekly => {
            let d: WeeklyData = serde_json::from_value(data).map_err(malformed)?;
            Recurrence::Weekly { days: d.days }
        }
        RecurrenceKind::Monthly => {
            let d: MonthlyData = serde_json::from_value(data).map_err(malformed)?;
            Recurrence::Monthly {
                day_of_month: d.day_of_month,
            }
        }
        RecurrenceKind::Custom => {
            let d: CustomData = serde_json::from_value(data).map_err(malformed)?;
            Recurrence::Custom {
                interval: d.interval,
                unit: d.unit,
            }
        }
    };
    Ok(recurrence)
}

/// Older records may hold the payload as a JSON-encoded string.
fn payload_object(data: &Value) -> Result<Value, DecodeError> {
    match data {
        Value::Object(_) => Ok(data.clone()),
        Value::String(raw) => {
            let parsed: Value =
                serde_json::from_str(raw).map_err(DecodeError::UnparseableString)?;
            if parsed.is_object() {
                Ok(parsed)
            } else {
                Err(DecodeError::NotAnObject)
            }
        }
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Encodes a recurrence into its stored pair; `None` maps to `(None, None)`.
pub fn encode(recurrence: Option<&Recurrence>) -> StoragePair {
    let Some(recurrence) = recurrence else {
        return (None, None);
    };
    let data = match recurrence {
        Recurrence::Daily { interval } => json!({ "interval": interval }),
        Recurrence::Weekly { days } => json!({ "days": days }),
        Recurrence::Monthly { day_of_month } => json!({ "dayOfMonth": day_of_month }),
        Recurrence::Custom { interval, unit } => json!({ "interval": interval, "unit": unit }),
    };
    (Some(recurrence.kind().as_str().to_string()), Some(data))
}

/// Flat field-name to value(s) mapping, as submitted by the add-task form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`append`](Self::append).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Adds a value; multi-valued fields such as `weeklyDays` are appended to.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    /// First value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value of a field, in submission order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Builds a recurrence from the add-task form.
///
/// `raw_type` is the `repetitionType` field. Numbers that do not parse, or
/// that are out of range, fall back to 1. A weekly selection with no days and
/// a custom rule without a unit both mean the task does not repeat. Day and
/// unit tokens are kept verbatim.
pub fn from_user_input(raw_type: Option<&str>, form: &FormData) -> Option<Recurrence> {
    let raw_type = raw_type
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != NO_REPETITION)?;
    let kind = match raw_type.parse::<RecurrenceKind>() {
        Ok(kind) => kind,
        Err(other) => {
            debug!(repetition_type = %other, "ignoring unknown repetition type");
            return None;
        }
    };

    match kind {
        RecurrenceKind::Daily => Some(Recurrence::Daily {
            interval: number_or_default(form.get(fields::DAILY_INTERVAL), 1..=i64::MAX),
        }),
        RecurrenceKind::Weekly => {
            let days: Vec<DayOfWeek> = form
                .get_all(fields::WEEKLY_DAYS)
                .iter()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty())
                .map(DayOfWeek::from)
                .collect();
            if days.is_empty() {
                return None;
            }
            Some(Recurrence::Weekly { days })
        }
        RecurrenceKind::Monthly => Some(Recurrence::Monthly {
            day_of_month: number_or_default(form.get(fields::MONTHLY_DAY), 1..=31),
        }),
        RecurrenceKind::Custom => {
            let interval = number_or_default(form.get(fields::CUSTOM_INTERVAL), 1..=i64::MAX);
            let unit = form
                .get(fields::CUSTOM_UNIT)
                .map(str::trim)
                .filter(|u| !u.is_empty())?;
            Some(Recurrence::Custom {
                interval,
                unit: RepetitionUnit::from(unit),
            })
        }
    }
}

fn number_or_default(raw: Option<&str>, range: RangeInclusive<i64>) -> i64 {
    raw.and_then(parse_leading_int)
        .filter(|n| range.contains(n))
        .unwrap_or(1)
}

/// Parses the integer at the start of `raw`: leading whitespace and an
/// optional sign, then as many digits as there are ("12abc" is 12).
pub(crate) fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_int_parsing() {
        assert_eq!(parse_leading_int("3"), Some(3));
        assert_eq!(parse_leading_int("  12abc"), Some(12));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("2.9"), Some(2));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn out_of_range_numbers_fall_back_to_one() {
        assert_eq!(number_or_default(Some("0"), 1..=i64::MAX), 1);
        assert_eq!(number_or_default(Some("-3"), 1..=i64::MAX), 1);
        assert_eq!(number_or_default(Some("32"), 1..=31), 1);
        assert_eq!(number_or_default(Some("31"), 1..=31), 31);
        assert_eq!(number_or_default(None, 1..=31), 1);
    }

    #[test]
    fn form_data_keeps_all_values_in_order() {
        let form = FormData::new()
            .with(fields::WEEKLY_DAYS, "monday")
            .with(fields::WEEKLY_DAYS, "friday");
        assert_eq!(form.get(fields::WEEKLY_DAYS), Some("monday"));
        assert_eq!(form.get_all(fields::WEEKLY_DAYS), ["monday", "friday"]);
        assert!(form.get_all(fields::MONTHLY_DAY).is_empty());
        assert_eq!(form.get(fields::MONTHLY_DAY), None);
    }

    #[test]
    fn payload_string_is_parsed() {
        let data = Value::String(r#"{"interval": 2}"#.to_string());
        assert_eq!(
            try_decode("daily", &data).unwrap(),
            Recurrence::Daily { interval: 2 }
        );
        assert!(matches!(
            try_decode("daily", &Value::String("{oops".into())),
            Err(DecodeError::UnparseableString(_))
        ));
        assert!(matches!(
            try_decode("daily", &json!([1, 2])),
            Err(DecodeError::NotAnObject)
        ));
    }

    #[test]
    fn whole_number_floats_are_accepted() {
        assert_eq!(
            try_decode("monthly", &json!({ "dayOfMonth": 15.0 })).unwrap(),
            Recurrence::Monthly { day_of_month: 15 }
        );
        assert!(matches!(
            try_decode("daily", &json!({ "interval": 1.5 })),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_kind_is_reported() {
        assert!(matches!(
            try_decode("hourly", &json!({})),
            Err(DecodeError::UnknownKind(k)) if k == "hourly"
        ));
    }
}
