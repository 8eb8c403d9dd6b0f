use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{FineError, Result};

/// unique identifier for a fine
pub type FineId = Uuid;

/// unique identifier for a person in a club
pub type PersonId = Uuid;

/// unique identifier for a club
pub type ClubId = Uuid;

/// payment state of a fine
///
/// A fine starts `Unpayed` and moves to `Payed` or `Settled` exactly once;
/// both of those are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPayedState", into = "RawPayedState")]
pub enum PayedState {
    /// still owed, interest keeps accruing
    #[default]
    Unpayed,
    /// paid on `pay_date`, interest stops at that date
    Payed {
        pay_date: DateTime<Utc>,
        in_app: bool,
    },
    /// waived by the club, no interest
    Settled,
}

impl PayedState {
    pub fn is_unpayed(&self) -> bool {
        matches!(self, PayedState::Unpayed)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_unpayed()
    }

    pub fn pay_date(&self) -> Option<DateTime<Utc>> {
        match self {
            PayedState::Payed { pay_date, .. } => Some(*pay_date),
            _ => None,
        }
    }

    /// wire name of the state
    pub fn name(&self) -> &'static str {
        match self {
            PayedState::Unpayed => "unpayed",
            PayedState::Payed { .. } => "payed",
            PayedState::Settled => "settled",
        }
    }

    /// record a payment
    pub fn pay(&self, pay_date: DateTime<Utc>, in_app: bool) -> Result<PayedState> {
        self.transition(PayedState::Payed { pay_date, in_app })
    }

    /// waive the fine
    pub fn settle(&self) -> Result<PayedState> {
        self.transition(PayedState::Settled)
    }

    fn transition(&self, to: PayedState) -> Result<PayedState> {
        if self.is_terminal() {
            tracing::warn!(from = self.name(), to = to.name(), "rejected payed state transition");
            return Err(FineError::InvalidStateTransition {
                from: self.name().to_string(),
                to: to.name().to_string(),
            });
        }
        Ok(to)
    }
}

impl fmt::Display for PayedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayedState::Payed { pay_date, .. } => write!(f, "payed ({})", pay_date.date_naive()),
            other => f.write_str(other.name()),
        }
    }
}

/// payed state as it appears on the wire
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayedState {
    state: String,
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pay_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    in_app: Option<bool>,
}

impl TryFrom<RawPayedState> for PayedState {
    type Error = FineError;

    fn try_from(raw: RawPayedState) -> Result<Self> {
        match raw.state.as_str() {
            "unpayed" => Ok(PayedState::Unpayed),
            "settled" => Ok(PayedState::Settled),
            "payed" => {
                let pay_date = raw.pay_date.ok_or_else(|| FineError::InvalidPayedState {
                    message: "payDate missing for state payed".to_string(),
                })?;
                Ok(PayedState::Payed {
                    pay_date,
                    in_app: raw.in_app.unwrap_or(false),
                })
            }
            other => Err(FineError::InvalidPayedState {
                message: format!("unknown state {other:?}"),
            }),
        }
    }
}

impl From<PayedState> for RawPayedState {
    fn from(state: PayedState) -> Self {
        let (pay_date, in_app) = match state {
            PayedState::Payed { pay_date, in_app } => (Some(pay_date), Some(in_app)),
            _ => (None, None),
        };
        RawPayedState {
            state: state.name().to_string(),
            pay_date,
            in_app,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lifecycle() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let unpayed = PayedState::default();

        let payed = unpayed.pay(date, true).unwrap();
        assert_eq!(payed.pay_date(), Some(date));
        assert!(payed.is_terminal());

        let settled = unpayed.settle().unwrap();
        assert_eq!(settled, PayedState::Settled);
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let payed = PayedState::Unpayed.pay(date, false).unwrap();

        assert!(matches!(payed.settle(), Err(FineError::InvalidStateTransition { .. })));
        assert!(matches!(payed.pay(date, false), Err(FineError::InvalidStateTransition { .. })));
        assert!(matches!(
            PayedState::Settled.pay(date, false),
            Err(FineError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_decode_states() {
        let unpayed: PayedState = serde_json::from_str(r#"{"state":"unpayed"}"#).unwrap();
        assert_eq!(unpayed, PayedState::Unpayed);

        let settled: PayedState = serde_json::from_str(r#"{"state":"settled"}"#).unwrap();
        assert_eq!(settled, PayedState::Settled);

        let payed: PayedState =
            serde_json::from_str(r#"{"state":"payed","payDate":1709251200,"inApp":true}"#).unwrap();
        assert_eq!(
            payed,
            PayedState::Payed {
                pay_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                in_app: true,
            }
        );
    }

    #[test]
    fn test_decode_rejects_invalid() {
        let unknown = serde_json::from_str::<PayedState>(r#"{"state":"refunded"}"#).unwrap_err();
        assert!(unknown.to_string().contains("unknown state"));

        let missing = serde_json::from_str::<PayedState>(r#"{"state":"payed"}"#).unwrap_err();
        assert!(missing.to_string().contains("payDate missing"));
    }

    #[test]
    fn test_encode() {
        let json = serde_json::to_string(&PayedState::Unpayed).unwrap();
        assert_eq!(json, r#"{"state":"unpayed"}"#);

        let payed = PayedState::Payed {
            pay_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            in_app: false,
        };
        let json = serde_json::to_string(&payed).unwrap();
        assert_eq!(json, r#"{"state":"payed","payDate":1709251200,"inApp":false}"#);
    }
}
