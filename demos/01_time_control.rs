/// time control - watch interest accrue with a test clock
use fine_interest_rs::chrono::{Duration, TimeZone, Utc};
use fine_interest_rs::{
    Amount, ClubSettings, Fine, LatePaymentInterest, Rate, SafeTimeProvider, TimePeriod, TimeSource,
    Uuid,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let club = ClubSettings::new(Uuid::new_v4()).with_late_payment_interest(
        LatePaymentInterest::monthly_compound(Rate::from_percentage(5), TimePeriod::days(0)),
    )?;
    let mut fine = Fine::new(Uuid::new_v4(), time.now(), Amount::from_major(40));

    println!("=== compound interest, 5% per month ===\n");
    for _ in 0..6 {
        controller.advance(Duration::days(30));
        let calculation = fine.interest_calculation(&club, time.now())?;
        println!(
            "{}: {} periods, interest {}, owed {}",
            time.now().date_naive(),
            calculation.periods,
            calculation.interest_amount,
            calculation.total_owed()
        );
    }

    // paying freezes the interest at the payment date
    fine.pay(time.now(), false)?;
    controller.advance(Duration::days(365));
    println!("\none year after payment: {}", fine.interest_now(&club, &time)?);

    Ok(())
}
