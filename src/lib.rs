pub mod amount;
pub mod callable;
pub mod config;
pub mod errors;
pub mod fine;
pub mod interest;
pub mod period;
pub mod summary;
pub mod types;

// re-export key types
pub use amount::{Amount, Rate};
pub use callable::{CallableFunction, ChangeLatePaymentInterestCall};
pub use config::{ChangeType, ClubSettings, LatePaymentInterest};
pub use errors::{FineError, Result};
pub use fine::Fine;
pub use interest::{
    AccrualEngine, InterestCalculation, InterestCalculator, InterestMethod, LatePaymentEngine,
    PeriodAccrual,
};
pub use period::{TimePeriod, TimeUnit};
pub use summary::FineSummary;
pub use types::{ClubId, FineId, PayedState, PersonId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
