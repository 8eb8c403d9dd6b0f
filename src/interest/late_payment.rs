use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::amount::Amount;
use crate::config::LatePaymentInterest;
use crate::errors::Result;
use crate::interest::accrual::{compound_interest, simple_interest};
use crate::interest::{AccrualEngine, InterestCalculation, InterestCalculator, InterestMethod, PeriodAccrual};
use crate::types::PayedState;

/// engine for late payment interest on fines
pub struct LatePaymentEngine {
    pub config: LatePaymentInterest,
}

impl LatePaymentEngine {
    pub fn new(config: LatePaymentInterest) -> Self {
        Self { config }
    }

    fn method(&self) -> InterestMethod {
        InterestMethod::from_compound_flag(self.config.compound_interest)
    }

    /// date interest starts accruing for a fine dated `origin`
    pub fn interest_start(&self, origin: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.config.interest_free_period.advance(origin)
    }

    /// payment date for payed fines, `now` for unpayed ones, `None` once settled
    fn reference_date(payed: &PayedState, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match payed {
            PayedState::Settled => None,
            PayedState::Payed { pay_date, .. } => Some(*pay_date),
            PayedState::Unpayed => Some(now),
        }
    }

    /// per-period breakdown of the interest, at most `limit` periods long
    pub fn accrual_schedule(
        &self,
        principal: Amount,
        origin: DateTime<Utc>,
        payed: &PayedState,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<PeriodAccrual>> {
        let Some(reference_date) = Self::reference_date(payed, now) else {
            return Ok(Vec::new());
        };
        self.config.validate()?;

        let interest_start = self.interest_start(origin)?;
        AccrualEngine::new(self.config.interest_period).schedule(
            interest_start,
            reference_date,
            principal,
            self.config.interest_rate,
            self.method(),
            limit,
        )
    }

    /// interest owed with "now" taken from a time provider
    pub fn calculate_now(
        &self,
        principal: Amount,
        origin: DateTime<Utc>,
        payed: &PayedState,
        time_provider: &SafeTimeProvider,
    ) -> Result<InterestCalculation> {
        self.calculate_interest(principal, origin, payed, time_provider.now())
    }

    /// total interest amount only
    pub fn interest_amount(
        &self,
        principal: Amount,
        origin: DateTime<Utc>,
        payed: &PayedState,
        now: DateTime<Utc>,
    ) -> Result<Amount> {
        Ok(self.calculate_interest(principal, origin, payed, now)?.interest_amount)
    }
}

impl InterestCalculator for LatePaymentEngine {
    fn calculate_interest(
        &self,
        principal: Amount,
        origin: DateTime<Utc>,
        payed: &PayedState,
        now: DateTime<Utc>,
    ) -> Result<InterestCalculation> {
        let method = self.method();

        let Some(reference_date) = Self::reference_date(payed, now) else {
            return Ok(InterestCalculation::none(principal, Some(method)));
        };

        self.config.validate()?;

        let interest_start = self.interest_start(origin)?;
        let mut result = InterestCalculation::none(principal, Some(method));
        result.interest_start = Some(interest_start);
        result.reference_date = Some(reference_date);

        if reference_date <= interest_start {
            return Ok(result);
        }

        let periods = AccrualEngine::new(self.config.interest_period).count_periods(interest_start, reference_date)?;
        let rate = self.config.interest_rate;
        result.periods = periods;
        result.interest_amount = match method {
            InterestMethod::Simple => simple_interest(principal, rate, periods),
            InterestMethod::Compound => compound_interest(principal, rate, periods),
        };

        tracing::debug!(
            principal = %principal,
            interest = %result.interest_amount,
            periods = result.periods,
            method = ?method,
            %interest_start,
            %reference_date,
            "late payment interest calculated"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Rate;
    use crate::errors::FineError;
    use crate::period::TimePeriod;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 18, 0, 0).unwrap()
    }

    fn engine(compound: bool) -> LatePaymentEngine {
        LatePaymentEngine::new(LatePaymentInterest::new(
            TimePeriod::days(0),
            TimePeriod::months(1),
            Rate::from_percentage(1),
            compound,
        ))
    }

    #[test]
    fn test_simple_three_months() {
        let result = engine(false)
            .calculate_interest(Amount::from_major(100), date(2024, 1, 10), &PayedState::Unpayed, date(2024, 4, 10))
            .unwrap();

        assert_eq!(result.interest_amount, Amount::new(3, 0).unwrap());
        assert_eq!(result.periods, 3);
        assert_eq!(result.method, Some(InterestMethod::Simple));
        assert_eq!(result.total_owed(), Amount::new(103, 0).unwrap());
    }

    #[test]
    fn test_compound_three_months() {
        let result = engine(true)
            .calculate_interest(Amount::from_major(100), date(2024, 1, 10), &PayedState::Unpayed, date(2024, 4, 10))
            .unwrap();

        assert_eq!(result.interest_amount, Amount::new(3, 3).unwrap());
        assert_eq!(result.periods, 3);

        let schedule = engine(true)
            .accrual_schedule(Amount::from_major(100), date(2024, 1, 10), &PayedState::Unpayed, date(2024, 4, 10), 12)
            .unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[2].principal_base, Amount::new(102, 1).unwrap());
    }

    #[test]
    fn test_far_future_pay_date() {
        // a millisecond timestamp read as seconds lands in year 56134
        let config = LatePaymentInterest::new(
            TimePeriod::days(0),
            TimePeriod::days(1),
            Rate::from_bps(1),
            false,
        );
        let origin = date(2024, 1, 1);
        let payed = PayedState::Payed {
            pay_date: Utc.with_ymd_and_hms(56134, 1, 6, 18, 0, 0).unwrap(),
            in_app: false,
        };
        let principal = Amount::from_major(100);

        let simple = LatePaymentEngine::new(config)
            .calculate_interest(principal, origin, &payed, origin)
            .unwrap();
        assert!(simple.periods > 19_000_000);
        assert_eq!(simple.interest_amount, Amount::new(0, 1).unwrap() * simple.periods);

        let compound = LatePaymentEngine::new(LatePaymentInterest { compound_interest: true, ..config })
            .calculate_interest(principal, origin, &payed, origin)
            .unwrap();
        assert_eq!(compound.periods, simple.periods);
        assert!(compound.interest_amount > simple.interest_amount);

        let schedule = LatePaymentEngine::new(config)
            .accrual_schedule(principal, origin, &payed, origin, 30)
            .unwrap();
        assert_eq!(schedule.len(), 30);
    }

    #[test]
    fn test_negative_grace_period_rejected() {
        let config = LatePaymentInterest::new(
            TimePeriod::months(-3),
            TimePeriod::months(1),
            Rate::from_percentage(1),
            false,
        );
        let origin = date(2024, 6, 1);
        let result = LatePaymentEngine::new(config).calculate_interest(
            Amount::from_major(100),
            origin,
            &PayedState::Unpayed,
            origin,
        );
        assert!(matches!(result, Err(FineError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_settled_schedule_is_empty() {
        let schedule = engine(false)
            .accrual_schedule(Amount::from_major(100), date(2020, 1, 1), &PayedState::Settled, date(2024, 1, 1), 12)
            .unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_partial_period_does_not_accrue() {
        let interest = engine(false)
            .interest_amount(Amount::from_major(100), date(2024, 1, 10), &PayedState::Unpayed, date(2024, 4, 9))
            .unwrap();
        assert_eq!(interest, Amount::new(2, 0).unwrap());
    }

    #[test]
    fn test_settled_is_always_zero() {
        for compound in [false, true] {
            let result = engine(compound)
                .calculate_interest(Amount::from_major(500), date(2020, 1, 1), &PayedState::Settled, date(2024, 1, 1))
                .unwrap();
            assert_eq!(result.interest_amount, Amount::ZERO);
            assert_eq!(result.reference_date, None);
        }
    }

    #[test]
    fn test_payed_stops_at_pay_date() {
        let payed = PayedState::Payed {
            pay_date: date(2024, 3, 10),
            in_app: false,
        };
        let result = engine(false)
            .calculate_interest(Amount::from_major(100), date(2024, 1, 10), &payed, date(2030, 1, 1))
            .unwrap();

        assert_eq!(result.interest_amount, Amount::new(2, 0).unwrap());
        assert_eq!(result.reference_date, Some(date(2024, 3, 10)));
    }

    #[test]
    fn test_grace_period_boundary() {
        let config = LatePaymentInterest::new(
            TimePeriod::days(14),
            TimePeriod::months(1),
            Rate::from_percentage(2),
            false,
        );
        let engine = LatePaymentEngine::new(config);
        let origin = date(2024, 5, 1);
        let start = engine.interest_start(origin).unwrap();
        assert_eq!(start, date(2024, 5, 15));

        let at_start = engine
            .interest_amount(Amount::from_major(50), origin, &PayedState::Unpayed, start)
            .unwrap();
        assert_eq!(at_start, Amount::ZERO);

        let one_period_later = engine
            .interest_amount(Amount::from_major(50), origin, &PayedState::Unpayed, date(2024, 6, 15))
            .unwrap();
        assert!(one_period_later > Amount::ZERO);
        assert_eq!(one_period_later, Amount::new(1, 0).unwrap());
    }

    #[test]
    fn test_reference_before_origin() {
        let interest = engine(true)
            .interest_amount(Amount::from_major(100), date(2024, 6, 1), &PayedState::Unpayed, date(2024, 1, 1))
            .unwrap();
        assert_eq!(interest, Amount::ZERO);
    }

    #[test]
    fn test_simple_interest_is_linear() {
        let config = LatePaymentInterest::new(
            TimePeriod::days(0),
            TimePeriod::days(10),
            Rate::from_decimal(dec!(0.035)),
            false,
        );
        let engine = LatePaymentEngine::new(config);
        let principal = Amount::new(47, 19).unwrap();
        let origin = date(2024, 1, 1);

        let one = engine
            .interest_amount(principal, origin, &PayedState::Unpayed, date(2024, 1, 11))
            .unwrap();
        for n in 1..=30_i64 {
            let now = origin + Duration::days(10 * n);
            let interest = engine
                .interest_amount(principal, origin, &PayedState::Unpayed, now)
                .unwrap();
            assert_eq!(interest, one * n);
            assert_eq!(interest, simple_interest(principal, config.interest_rate, n as u32));
        }
    }

    #[test]
    fn test_compound_at_least_simple() {
        let origin = date(2023, 1, 1);
        let principal = Amount::new(80, 40).unwrap();
        for months in 2..=24 {
            let now = TimePeriod::months(months).advance(origin).unwrap();
            let simple = engine(false)
                .interest_amount(principal, origin, &PayedState::Unpayed, now)
                .unwrap();
            let compound = engine(true)
                .interest_amount(principal, origin, &PayedState::Unpayed, now)
                .unwrap();
            assert!(compound >= simple, "{months} months: {compound} < {simple}");
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LatePaymentInterest::new(
            TimePeriod::days(0),
            TimePeriod::months(0),
            Rate::from_percentage(1),
            false,
        );
        let result = LatePaymentEngine::new(config).calculate_interest(
            Amount::from_major(10),
            date(2024, 1, 1),
            &PayedState::Unpayed,
            date(2024, 6, 1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_calculate_with_time_manipulation() {
        let time = SafeTimeProvider::new(TimeSource::Test(date(2024, 1, 10)));
        let control = time.test_control().unwrap();
        let origin = time.now();
        let engine = engine(false);

        let result = engine
            .calculate_now(Amount::from_major(100), origin, &PayedState::Unpayed, &time)
            .unwrap();
        assert_eq!(result.interest_amount, Amount::ZERO);

        control.advance(Duration::days(31));
        let result = engine
            .calculate_now(Amount::from_major(100), origin, &PayedState::Unpayed, &time)
            .unwrap();
        assert_eq!(result.interest_amount, Amount::new(1, 0).unwrap());
        assert_eq!(result.reference_date, Some(date(2024, 2, 10)));
    }
}
