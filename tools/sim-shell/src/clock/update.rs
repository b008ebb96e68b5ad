use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

/// A calendar component the user may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Month,
    Day,
    Year,
    Hour,
    Minute,
    Second,
}

impl Field {
    pub fn allowed(self) -> RangeInclusive<i64> {
        match self {
            Field::Month => 1..=12,
            // No month-length check here; composition catches impossible dates.
            Field::Day => 1..=31,
            // Bounded by a signed 32-bit time_t.
            Field::Year => 1970..=2038,
            Field::Hour => 0..=23,
            Field::Minute => 0..=59,
            Field::Second => 0..=59,
        }
    }

    fn validate(self, provided: i64) -> Result<(), ValidationError> {
        let allowed = self.allowed();
        if allowed.contains(&provided) {
            Ok(())
        } else {
            Err(ValidationError {
                field: self,
                provided,
                allowed,
            })
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Month => "month",
            Field::Day => "day",
            Field::Year => "year",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field} ({}-{})", .allowed.start(), .allowed.end())]
pub struct ValidationError {
    pub field: Field,
    pub provided: i64,
    pub allowed: RangeInclusive<i64>,
}

/// Whether an update replaces the date or the time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Date,
    Time,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateKind::Date => f.write_str("date"),
            UpdateKind::Time => f.write_str("time"),
        }
    }
}

/// Raw user-supplied components for one override, not yet range checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockUpdate {
    Date { month: i64, day: i64, year: i64 },
    Time { hour: i64, minute: i64, second: i64 },
}

impl ClockUpdate {
    pub fn kind(&self) -> UpdateKind {
        match self {
            ClockUpdate::Date { .. } => UpdateKind::Date,
            ClockUpdate::Time { .. } => UpdateKind::Time,
        }
    }

    /// Builds an update from three integers in prompt order
    /// (`MM DD YYYY` or `HH MM SS`).
    pub fn from_parts(kind: UpdateKind, [a, b, c]: [i64; 3]) -> Self {
        match kind {
            UpdateKind::Date => ClockUpdate::Date { month: a, day: b, year: c },
            UpdateKind::Time => ClockUpdate::Time { hour: a, minute: b, second: c },
        }
    }

    /// Checks fields in prompt order and reports the first one out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            ClockUpdate::Date { month, day, year } => {
                Field::Month.validate(month)?;
                Field::Day.validate(day)?;
                Field::Year.validate(year)
            }
            ClockUpdate::Time { hour, minute, second } => {
                Field::Hour.validate(hour)?;
                Field::Minute.validate(minute)?;
                Field::Second.validate(second)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_reports_first_bad_field() {
        let update = ClockUpdate::Date { month: 13, day: 0, year: 1900 };
        let err = update.validate().unwrap_err();

        assert_eq!(err.field, Field::Month);
        assert_eq!(err.provided, 13);
        assert_eq!(err.to_string(), "Invalid month (1-12)");
    }

    #[test]
    fn test_validation_messages() {
        let cases = [
            (ClockUpdate::Date { month: 1, day: 32, year: 2000 }, "Invalid day (1-31)"),
            (ClockUpdate::Date { month: 1, day: 1, year: 2039 }, "Invalid year (1970-2038)"),
            (ClockUpdate::Time { hour: 24, minute: 0, second: 0 }, "Invalid hour (0-23)"),
            (ClockUpdate::Time { hour: 0, minute: 60, second: 0 }, "Invalid minute (0-59)"),
            (ClockUpdate::Time { hour: 0, minute: 0, second: -1 }, "Invalid second (0-59)"),
        ];

        for (update, message) in cases {
            assert_eq!(update.validate().unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn test_day_range_is_lenient_about_month_length() {
        assert!(ClockUpdate::Date { month: 2, day: 31, year: 2023 }.validate().is_ok());
    }

    #[test]
    fn test_from_parts_uses_prompt_order() {
        assert_eq!(
            ClockUpdate::from_parts(UpdateKind::Time, [7, 8, 9]),
            ClockUpdate::Time { hour: 7, minute: 8, second: 9 }
        );
    }
}
