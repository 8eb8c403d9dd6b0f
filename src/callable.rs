//! Parameter payloads for backend callable functions.
//!
//! Building a call only produces its name and JSON parameters; sending it is
//! left to the caller's transport.

use serde_json::{json, Map, Value};

use crate::config::{ChangeType, LatePaymentInterest};
use crate::errors::Result;
use crate::types::ClubId;

/// a backend function call with named JSON parameters
pub trait CallableFunction {
    fn function_name(&self) -> &'static str;

    fn parameters(&self) -> Result<Value>;
}

/// sets, replaces or removes a club's late payment interest
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeLatePaymentInterestCall {
    pub club_id: ClubId,
    pub change_type: ChangeType,
}

impl ChangeLatePaymentInterestCall {
    /// update when `interest` is given, remove otherwise
    pub fn new(club_id: ClubId, interest: Option<LatePaymentInterest>) -> Self {
        Self {
            club_id,
            change_type: ChangeType::from(interest),
        }
    }

    pub fn update(club_id: ClubId, interest: LatePaymentInterest) -> Self {
        Self::new(club_id, Some(interest))
    }

    pub fn remove(club_id: ClubId) -> Self {
        Self::new(club_id, None)
    }
}

impl CallableFunction for ChangeLatePaymentInterestCall {
    fn function_name(&self) -> &'static str {
        "changeLatePaymentInterest"
    }

    fn parameters(&self) -> Result<Value> {
        if let Some(interest) = self.change_type.late_payment_interest() {
            interest.validate()?;
        }

        let mut parameters = Map::new();
        parameters.insert("clubId".to_string(), json!(self.club_id));
        parameters.insert("changeType".to_string(), json!(self.change_type.name()));
        if let Some(interest) = self.change_type.late_payment_interest() {
            parameters.insert("latePaymentInterest".to_string(), serde_json::to_value(interest)?);
        }
        Ok(Value::Object(parameters))
    }
}
