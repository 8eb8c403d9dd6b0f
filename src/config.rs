use serde::{Deserialize, Serialize};

use crate::amount::Rate;
use crate::errors::{FineError, Result};
use crate::period::TimePeriod;
use crate::types::ClubId;

/// late payment interest configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatePaymentInterest {
    /// grace window after the fine date before interest starts
    pub interest_free_period: TimePeriod,
    /// length of one accrual period
    pub interest_period: TimePeriod,
    /// fraction charged per accrual period
    pub interest_rate: Rate,
    /// add accrued interest to the principal after every period
    pub compound_interest: bool,
}

impl LatePaymentInterest {
    pub fn new(
        interest_free_period: TimePeriod,
        interest_period: TimePeriod,
        interest_rate: Rate,
        compound_interest: bool,
    ) -> Self {
        Self {
            interest_free_period,
            interest_period,
            interest_rate,
            compound_interest,
        }
    }

    /// create simple monthly interest configuration
    pub fn monthly_simple(rate: Rate, interest_free_period: TimePeriod) -> Self {
        Self::new(interest_free_period, TimePeriod::months(1), rate, false)
    }

    /// create compound monthly interest configuration
    pub fn monthly_compound(rate: Rate, interest_free_period: TimePeriod) -> Self {
        Self::new(interest_free_period, TimePeriod::months(1), rate, true)
    }

    /// create simple yearly interest configuration
    pub fn yearly_simple(rate: Rate, interest_free_period: TimePeriod) -> Self {
        Self::new(interest_free_period, TimePeriod::years(1), rate, false)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interest_free_period.value < 0 {
            return Err(FineError::InvalidConfiguration {
                message: format!(
                    "interest free period must not be negative, got {}",
                    self.interest_free_period
                ),
            });
        }
        if !self.interest_period.is_positive() {
            return Err(FineError::InvalidConfiguration {
                message: format!("interest period must be positive, got {}", self.interest_period),
            });
        }
        if self.interest_rate.is_negative() {
            return Err(FineError::InvalidConfiguration {
                message: format!("interest rate must not be negative, got {}", self.interest_rate),
            });
        }
        Ok(())
    }
}

/// change to a club's late payment interest slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// set or replace the configuration
    Update(LatePaymentInterest),
    /// clear the configuration
    Remove,
}

impl ChangeType {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeType::Update(_) => "update",
            ChangeType::Remove => "remove",
        }
    }

    pub fn late_payment_interest(&self) -> Option<&LatePaymentInterest> {
        match self {
            ChangeType::Update(interest) => Some(interest),
            ChangeType::Remove => None,
        }
    }
}

impl From<Option<LatePaymentInterest>> for ChangeType {
    fn from(interest: Option<LatePaymentInterest>) -> Self {
        match interest {
            Some(interest) => ChangeType::Update(interest),
            None => ChangeType::Remove,
        }
    }
}

/// club level settings relevant to fines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSettings {
    pub club_id: ClubId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    late_payment_interest: Option<LatePaymentInterest>,
}

impl ClubSettings {
    pub fn new(club_id: ClubId) -> Self {
        Self {
            club_id,
            late_payment_interest: None,
        }
    }

    pub fn with_late_payment_interest(mut self, interest: LatePaymentInterest) -> Result<Self> {
        self.apply(&ChangeType::Update(interest))?;
        Ok(self)
    }

    /// default configuration for fines without their own
    pub fn late_payment_interest(&self) -> Option<&LatePaymentInterest> {
        self.late_payment_interest.as_ref()
    }

    /// replace or clear the configuration slot
    pub fn apply(&mut self, change: &ChangeType) -> Result<()> {
        match change {
            ChangeType::Update(interest) => {
                interest.validate()?;
                tracing::info!(
                    club_id = %self.club_id,
                    rate = %interest.interest_rate,
                    period = %interest.interest_period,
                    compound = interest.compound_interest,
                    "late payment interest updated"
                );
                self.late_payment_interest = Some(*interest);
            }
            ChangeType::Remove => {
                tracing::info!(club_id = %self.club_id, "late payment interest removed");
                self.late_payment_interest = None;
            }
        }
        Ok(())
    }
}
