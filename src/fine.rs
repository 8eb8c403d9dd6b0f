use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amount::Amount;
use crate::config::{ClubSettings, LatePaymentInterest};
use crate::errors::{FineError, Result};
use crate::interest::{InterestCalculation, InterestCalculator, LatePaymentEngine};
use crate::types::{FineId, PayedState, PersonId};

/// a fine as far as amounts and interest are concerned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fine {
    pub id: FineId,
    pub person_id: PersonId,
    /// date the fine was given
    #[serde(with = "fine_date")]
    pub date: DateTime<Utc>,
    /// amount of a single fine
    pub amount: Amount,
    /// how many times the fine was given
    #[serde(default = "default_number", deserialize_with = "deserialize_number")]
    pub number: u32,
    pub payed: PayedState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// overrides the club configuration when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_payment_interest: Option<LatePaymentInterest>,
}

fn default_number() -> u32 {
    1
}

fn deserialize_number<'de, D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let number = u32::deserialize(deserializer)?;
    check_number(number).map_err(serde::de::Error::custom)
}

fn check_number(number: u32) -> Result<u32> {
    if number == 0 {
        return Err(FineError::InvalidFineNumber { number });
    }
    Ok(number)
}

impl Fine {
    /// create new unpayed fine
    pub fn new(person_id: PersonId, date: DateTime<Utc>, amount: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            date,
            amount,
            number: 1,
            payed: PayedState::Unpayed,
            reason: String::new(),
            late_payment_interest: None,
        }
    }

    /// how many times the fine was given, rejects 0 like the decoder
    pub fn with_number(mut self, number: u32) -> Result<Self> {
        self.number = check_number(number)?;
        Ok(self)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_late_payment_interest(mut self, interest: LatePaymentInterest) -> Self {
        self.late_payment_interest = Some(interest);
        self
    }

    /// amount times number
    pub fn complete_amount(&self) -> Amount {
        self.amount * self.number
    }

    /// configuration used for this fine: its own, else the club default
    pub fn effective_interest<'a>(&'a self, club: &'a ClubSettings) -> Option<&'a LatePaymentInterest> {
        self.late_payment_interest
            .as_ref()
            .or_else(|| club.late_payment_interest())
    }

    /// full interest breakdown as of `now`
    pub fn interest_calculation(&self, club: &ClubSettings, now: DateTime<Utc>) -> Result<InterestCalculation> {
        match self.effective_interest(club) {
            Some(config) => LatePaymentEngine::new(*config).calculate_interest(
                self.complete_amount(),
                self.date,
                &self.payed,
                now,
            ),
            None => Ok(InterestCalculation::none(self.complete_amount(), None)),
        }
    }

    /// late payment interest as of `now`
    pub fn interest(&self, club: &ClubSettings, now: DateTime<Utc>) -> Result<Amount> {
        Ok(self.interest_calculation(club, now)?.interest_amount)
    }

    /// late payment interest with "now" from a time provider
    pub fn interest_now(&self, club: &ClubSettings, time_provider: &SafeTimeProvider) -> Result<Amount> {
        self.interest(club, time_provider.now())
    }

    /// complete amount plus late payment interest
    pub fn amount_with_interest(&self, club: &ClubSettings, now: DateTime<Utc>) -> Result<Amount> {
        Ok(self.interest_calculation(club, now)?.total_owed())
    }

    /// record a payment
    pub fn pay(&mut self, pay_date: DateTime<Utc>, in_app: bool) -> Result<()> {
        self.payed = self.payed.pay(pay_date, in_app)?;
        tracing::debug!(fine_id = %self.id, %pay_date, in_app, "fine payed");
        Ok(())
    }

    /// waive the fine
    pub fn settle(&mut self) -> Result<()> {
        self.payed = self.payed.settle()?;
        tracing::debug!(fine_id = %self.id, "fine settled");
        Ok(())
    }
}

/// fine dates are epoch seconds on the wire, ISO dates are accepted too
mod fine_date {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Seconds(i64),
        FractionalSeconds(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(date.timestamp())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let parsed = match RawDate::deserialize(deserializer)? {
            RawDate::Seconds(secs) => Utc.timestamp_opt(secs, 0).single(),
            RawDate::FractionalSeconds(secs) => {
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9).round() as u32;
                Utc.timestamp_opt(whole as i64, nanos.min(999_999_999)).single()
            }
            RawDate::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|d| d.and_utc())
                }),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("invalid fine date"))
    }
}
