use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::amount::{Amount, Rate};
use crate::errors::{FineError, Result};
use crate::interest::InterestMethod;
use crate::period::{TimePeriod, TimeUnit};

/// interest accrued in one complete period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAccrual {
    /// date the period completed
    pub period_end: DateTime<Utc>,
    pub principal_base: Amount,
    pub interest_amount: Amount,
}

/// engine for counting accrual periods and accruing interest over them
pub struct AccrualEngine {
    pub period: TimePeriod,
}

impl AccrualEngine {
    pub fn new(period: TimePeriod) -> Self {
        Self { period }
    }

    fn ensure_positive(&self) -> Result<()> {
        if !self.period.is_positive() {
            return Err(FineError::InvalidConfiguration {
                message: format!("interest period must be positive, got {}", self.period),
            });
        }
        Ok(())
    }

    /// number of complete periods between `start` and `end`
    ///
    /// A period counts once its end is on or before `end`; partial periods
    /// are dropped. The k-th boundary is `start` advanced by k periods, so
    /// the count is found from a calendar estimate and corrected by at most
    /// a step or two instead of walking every boundary.
    pub fn count_periods(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u32> {
        self.ensure_positive()?;
        if end <= start {
            return Ok(0);
        }

        let mut count = self.estimate_periods(start, end).max(0);
        while count > 0 && self.period.advance_by(start, count)? > end {
            count -= 1;
        }
        // a boundary past the last representable date is past `end` too
        while matches!(self.period.advance_by(start, count + 1), Ok(boundary) if boundary <= end) {
            count += 1;
        }

        u32::try_from(count).map_err(|_| FineError::InvalidDate {
            message: format!("{count} periods of {} between {start} and {end}", self.period),
        })
    }

    fn estimate_periods(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        let value = i64::from(self.period.value);
        let months = (i64::from(end.year()) - i64::from(start.year())) * 12
            + i64::from(end.month())
            - i64::from(start.month());
        match self.period.unit {
            TimeUnit::Day => (end - start).num_days() / value,
            TimeUnit::Month => months / value,
            TimeUnit::Year => months / (12 * value),
        }
    }

    /// per-period breakdown of the first `limit` complete periods
    pub fn schedule(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        principal: Amount,
        rate: Rate,
        method: InterestMethod,
        limit: usize,
    ) -> Result<Vec<PeriodAccrual>> {
        self.ensure_positive()?;

        let mut schedule = Vec::new();
        let mut base = principal;
        for k in 1..=limit {
            let period_end = self.period.advance_by(start, k as i64)?;
            if period_end > end {
                break;
            }
            let interest_amount = period_interest(base, rate);
            schedule.push(PeriodAccrual {
                period_end,
                principal_base: base,
                interest_amount,
            });
            if method == InterestMethod::Compound {
                base += interest_amount;
            }
        }
        Ok(schedule)
    }
}

/// interest for one period on `base`, truncated to cents
fn period_interest(base: Amount, rate: Rate) -> Amount {
    base * rate.as_decimal()
}

/// simple interest: the same truncated amount every period
pub fn simple_interest(principal: Amount, rate: Rate, periods: u32) -> Amount {
    period_interest(principal, rate) * periods
}

/// compound interest: each period's interest joins the principal
pub fn compound_interest(principal: Amount, rate: Rate, periods: u32) -> Amount {
    let mut base = principal;
    for _ in 0..periods {
        let interest = period_interest(base, rate);
        if interest.is_zero() {
            break;
        }
        base += interest;
        if base.major() == u64::MAX {
            break;
        }
    }
    base - principal
}
