use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amount::Amount;
use crate::config::ClubSettings;
use crate::errors::Result;
use crate::fine::Fine;
use crate::types::{PayedState, PersonId};

/// totals over a set of fines as of one reference time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FineSummary {
    /// complete amounts of payed fines, without interest
    pub payed: Amount,
    /// complete amounts of unpayed fines, without interest
    pub unpayed: Amount,
    /// complete amounts of settled fines
    pub settled: Amount,
    /// interest charged on payed fines up to their payment date
    pub payed_interest: Amount,
    /// interest accrued so far on unpayed fines
    pub unpayed_interest: Amount,
    pub fine_count: u32,
}

impl FineSummary {
    pub fn from_fines<'a>(
        fines: impl IntoIterator<Item = &'a Fine>,
        club: &ClubSettings,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let mut summary = FineSummary::default();
        for fine in fines {
            summary.add(fine, club, now)?;
        }
        Ok(summary)
    }

    /// one summary per person
    pub fn by_person<'a>(
        fines: impl IntoIterator<Item = &'a Fine>,
        club: &ClubSettings,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<PersonId, FineSummary>> {
        let mut summaries: BTreeMap<PersonId, FineSummary> = BTreeMap::new();
        for fine in fines {
            summaries.entry(fine.person_id).or_default().add(fine, club, now)?;
        }
        Ok(summaries)
    }

    fn add(&mut self, fine: &Fine, club: &ClubSettings, now: DateTime<Utc>) -> Result<()> {
        let amount = fine.complete_amount();
        match fine.payed {
            PayedState::Settled => self.settled += amount,
            PayedState::Payed { .. } => {
                self.payed += amount;
                self.payed_interest += fine.interest(club, now)?;
            }
            PayedState::Unpayed => {
                self.unpayed += amount;
                self.unpayed_interest += fine.interest(club, now)?;
            }
        }
        self.fine_count = self.fine_count.saturating_add(1);
        Ok(())
    }

    /// everything charged on payed and unpayed fines, interest included
    pub fn total(&self) -> Amount {
        self.payed + self.payed_interest + self.unpayed + self.unpayed_interest
    }

    /// what is still owed: unpayed fines plus their interest
    pub fn outstanding(&self) -> Amount {
        self.unpayed + self.unpayed_interest
    }
}
