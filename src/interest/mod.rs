pub mod accrual;
pub mod late_payment;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::errors::Result;
use crate::types::PayedState;

pub use accrual::{AccrualEngine, PeriodAccrual};
pub use late_payment::LatePaymentEngine;

/// how interest of later periods relates to earlier ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestMethod {
    /// every period charges the rate on the original amount
    Simple,
    /// every period charges the rate on the amount plus earlier interest
    Compound,
}

impl InterestMethod {
    pub fn from_compound_flag(compound: bool) -> Self {
        if compound {
            InterestMethod::Compound
        } else {
            InterestMethod::Simple
        }
    }
}

/// interest calculation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestCalculation {
    pub interest_amount: Amount,
    pub principal_base: Amount,
    pub periods: u32,
    /// end of the interest free period, `None` for settled fines
    pub interest_start: Option<DateTime<Utc>>,
    /// payment date or "now", `None` for settled fines
    pub reference_date: Option<DateTime<Utc>>,
    /// `None` when no late payment interest is configured
    pub method: Option<InterestMethod>,
}

impl InterestCalculation {
    pub(crate) fn none(principal: Amount, method: Option<InterestMethod>) -> Self {
        Self {
            interest_amount: Amount::ZERO,
            principal_base: principal,
            periods: 0,
            interest_start: None,
            reference_date: None,
            method,
        }
    }

    /// principal plus interest
    pub fn total_owed(&self) -> Amount {
        self.principal_base + self.interest_amount
    }
}

/// trait for late payment interest calculations
pub trait InterestCalculator {
    /// interest owed on `principal` for a fine dated `origin`
    ///
    /// `now` is the reference date for unpayed fines; payed fines use their
    /// payment date instead.
    fn calculate_interest(
        &self,
        principal: Amount,
        origin: DateTime<Utc>,
        payed: &PayedState,
        now: DateTime<Utc>,
    ) -> Result<InterestCalculation>;
}
