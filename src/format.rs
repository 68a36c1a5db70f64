//! Portuguese (pt-BR) display text for recurrences and task fields.

use std::fmt;

use chrono::NaiveDate;
use serde_json::Value;

use crate::codec;
use crate::models::{DayOfWeek, Recurrence, RepetitionUnit};

/// Shown for tasks without a usable recurrence.
pub const DOES_NOT_REPEAT: &str = "Não se repete";

/// Renders a stored `(repetitionType, repetitionData)` pair.
///
/// Never fails: a missing, unknown or malformed pair reads as
/// [`DOES_NOT_REPEAT`].
pub fn format_stored(kind: Option<&str>, data: Option<&Value>) -> String {
    describe_optional(codec::decode(kind, data).as_ref())
}

pub fn describe_optional(recurrence: Option<&Recurrence>) -> String {
    match recurrence {
        Some(r) => describe(r),
        None => DOES_NOT_REPEAT.to_string(),
    }
}

/// One line describing how often a task repeats.
pub fn describe(recurrence: &Recurrence) -> String {
    match recurrence {
        Recurrence::Daily { interval: 1 } => "Todo dia".to_string(),
        Recurrence::Daily { interval } => format!("A cada {} dias", interval),
        Recurrence::Weekly { days } => {
            let names: Vec<&str> = days.iter().map(day_abbreviation).collect();
            format!("Toda semana: {}", names.join(", "))
        }
        Recurrence::Monthly { day_of_month } => format!("Todo dia {} do mês", day_of_month),
        Recurrence::Custom { interval, unit } => {
            format!("A cada {} {}", interval, unit_plural(unit))
        }
    }
}

/// Three-letter day name; unknown tokens are shown as stored.
pub fn day_abbreviation(day: &DayOfWeek) -> &str {
    match day {
        DayOfWeek::Sunday => "Dom",
        DayOfWeek::Monday => "Seg",
        DayOfWeek::Tuesday => "Ter",
        DayOfWeek::Wednesday => "Qua",
        DayOfWeek::Thursday => "Qui",
        DayOfWeek::Friday => "Sex",
        DayOfWeek::Saturday => "Sáb",
        DayOfWeek::Other(token) => token,
    }
}

/// Plural noun for a unit; unknown tokens are shown as stored.
pub fn unit_plural(unit: &RepetitionUnit) -> &str {
    match unit {
        RepetitionUnit::Days => "dias",
        RepetitionUnit::Weeks => "semanas",
        RepetitionUnit::Months => "meses",
        RepetitionUnit::Years => "anos",
        RepetitionUnit::Other(token) => token,
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(self))
    }
}

/// `dd/mm/yyyy`
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn status_label(is_completed: bool) -> &'static str {
    if is_completed {
        "Concluída"
    } else {
        "Pendente"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tokens_render_verbatim() {
        let weekly = Recurrence::Weekly {
            days: vec![DayOfWeek::Monday, DayOfWeek::from("funday")],
        };
        assert_eq!(describe(&weekly), "Toda semana: Seg, funday");

        let custom = Recurrence::Custom {
            interval: 2,
            unit: RepetitionUnit::from("fortnights"),
        };
        assert_eq!(describe(&custom), "A cada 2 fortnights");
    }

    #[test]
    fn every_day_abbreviation() {
        let all = DayOfWeek::ALL;
        let names: Vec<&str> = all.iter().map(day_abbreviation).collect();
        assert_eq!(names, ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"]);
    }

    #[test]
    fn display_matches_describe() {
        let r = Recurrence::Custom {
            interval: 1,
            unit: RepetitionUnit::Years,
        };
        assert_eq!(r.to_string(), "A cada 1 anos");
        assert_eq!(describe_optional(None), DOES_NOT_REPEAT);
    }

    #[test]
    fn due_date_and_status() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_due_date(date), "07/03/2025");
        assert_eq!(status_label(true), "Concluída");
        assert_eq!(status_label(false), "Pendente");
    }
}
