use chrono::{DateTime, Days, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{FineError, Result};

/// calendar unit of a time period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Month,
    Year,
}

/// signed amount of calendar units, e.g. "2 months"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimePeriod {
    pub value: i32,
    pub unit: TimeUnit,
}

impl TimePeriod {
    pub fn new(value: i32, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    pub fn days(value: i32) -> Self {
        Self::new(value, TimeUnit::Day)
    }

    pub fn months(value: i32) -> Self {
        Self::new(value, TimeUnit::Month)
    }

    pub fn years(value: i32) -> Self {
        Self::new(value, TimeUnit::Year)
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    /// advance a date by this period once
    pub fn advance(&self, date: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.advance_by(date, 1)
    }

    /// advance a date by `times` repetitions of this period
    ///
    /// Month and year steps are taken from `date` in one jump, so the
    /// day-of-month is kept where the target month has it and clamped to the
    /// month end otherwise (Jan 31 + 1 month = Feb 28/29, + 2 months = Mar 31).
    pub fn advance_by(&self, date: DateTime<Utc>, times: i64) -> Result<DateTime<Utc>> {
        let steps = i64::from(self.value)
            .checked_mul(times)
            .ok_or_else(|| self.out_of_range(date, times))?;

        let advanced = match self.unit {
            TimeUnit::Day => {
                let days = Days::new(steps.unsigned_abs());
                if steps >= 0 {
                    date.checked_add_days(days)
                } else {
                    date.checked_sub_days(days)
                }
            }
            TimeUnit::Month | TimeUnit::Year => {
                let months = match self.unit {
                    TimeUnit::Year => steps.checked_mul(12),
                    _ => Some(steps),
                }
                .and_then(|m| u32::try_from(m.unsigned_abs()).ok().map(|abs| (m, abs)));

                months.and_then(|(signed, abs)| {
                    if signed >= 0 {
                        date.checked_add_months(Months::new(abs))
                    } else {
                        date.checked_sub_months(Months::new(abs))
                    }
                })
            }
        };

        advanced.ok_or_else(|| self.out_of_range(date, times))
    }

    fn out_of_range(&self, date: DateTime<Utc>, times: i64) -> FineError {
        FineError::InvalidDate {
            message: format!("{date} advanced {times} x {self} is out of range"),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TimeUnit::Day => "day",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        };
        if self.value.abs() == 1 {
            write!(f, "{} {}", self.value, unit)
        } else {
            write!(f, "{} {}s", self.value, unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_advance_days() {
        assert_eq!(TimePeriod::days(10).advance(date(2024, 2, 25)).unwrap(), date(2024, 3, 6));
        assert_eq!(TimePeriod::days(-1).advance(date(2024, 3, 1)).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_advance_months_keeps_day() {
        assert_eq!(TimePeriod::months(1).advance(date(2024, 1, 15)).unwrap(), date(2024, 2, 15));
        assert_eq!(TimePeriod::months(1).advance(date(2024, 1, 31)).unwrap(), date(2024, 2, 29));
        assert_eq!(TimePeriod::months(1).advance_by(date(2024, 1, 31), 2).unwrap(), date(2024, 3, 31));
        assert_eq!(TimePeriod::months(-2).advance(date(2024, 5, 31)).unwrap(), date(2024, 3, 31));
    }

    #[test]
    fn test_advance_years() {
        assert_eq!(TimePeriod::years(1).advance(date(2024, 2, 29)).unwrap(), date(2025, 2, 28));
        assert_eq!(TimePeriod::years(2).advance_by(date(2020, 6, 1), 3).unwrap(), date(2026, 6, 1));
    }

    #[test]
    fn test_out_of_range() {
        let result = TimePeriod::years(i32::MAX).advance(date(2024, 1, 1));
        assert!(matches!(result, Err(FineError::InvalidDate { .. })));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&TimePeriod::months(3)).unwrap();
        assert_eq!(json, r#"{"value":3,"unit":"month"}"#);

        let period: TimePeriod = serde_json::from_str(r#"{"value":14,"unit":"day"}"#).unwrap();
        assert_eq!(period, TimePeriod::days(14));

        assert!(serde_json::from_str::<TimePeriod>(r#"{"value":1,"unit":"week"}"#).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TimePeriod::months(1).to_string(), "1 month");
        assert_eq!(TimePeriod::days(30).to_string(), "30 days");
    }
}
