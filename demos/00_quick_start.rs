/// quick start - minimal example to get started
use fine_interest_rs::chrono::{TimeZone, Utc};
use fine_interest_rs::{Amount, ClubSettings, Fine, LatePaymentInterest, Rate, TimePeriod, Uuid};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // club charges 1% per month after a 14 day grace period
    let club = ClubSettings::new(Uuid::new_v4()).with_late_payment_interest(
        LatePaymentInterest::monthly_simple(Rate::from_percentage(1), TimePeriod::days(14)),
    )?;

    // a 12.50 fine given twice on new year's day
    let fine = Fine::new(
        Uuid::new_v4(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Amount::new(12, 50)?,
    )
    .with_number(2)?
    .with_reason("late for training");

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    println!("fine:     {}", fine.complete_amount());
    println!("interest: {}", fine.interest(&club, now)?);
    println!("total:    {}", fine.amount_with_interest(&club, now)?);

    Ok(())
}
