/// json payloads - decoding fines and building the config change call
use fine_interest_rs::chrono::{TimeZone, Utc};
use fine_interest_rs::{
    CallableFunction, ChangeLatePaymentInterestCall, ClubSettings, Fine, FineSummary,
    LatePaymentInterest, Rate, TimePeriod, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fines: Vec<Fine> = serde_json::from_str(
        r#"[
            {
                "id": "6f1c5e8e-2b1a-4c3e-9d7a-1f2e3d4c5b6a",
                "personId": "0b4d7c2a-8e9f-4a1b-b2c3-d4e5f6a7b8c9",
                "date": 1704067200,
                "amount": 5,
                "payed": { "state": "unpayed" },
                "reason": "forgot jersey"
            },
            {
                "id": "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d",
                "personId": "0b4d7c2a-8e9f-4a1b-b2c3-d4e5f6a7b8c9",
                "date": "2024-02-01",
                "amount": 2.5,
                "number": 3,
                "payed": { "state": "payed", "payDate": 1711929600, "inApp": true }
            }
        ]"#,
    )?;

    let interest = LatePaymentInterest::monthly_simple(Rate::from_percentage(2), TimePeriod::days(0));
    let mut club = ClubSettings::new(Uuid::new_v4());

    let call = ChangeLatePaymentInterestCall::update(club.club_id, interest);
    println!("{} {}", call.function_name(), serde_json::to_string_pretty(&call.parameters()?)?);
    club.apply(&call.change_type)?;

    let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let summary = FineSummary::from_fines(&fines, &club, now)?;
    println!("\nsummary:\n{}", serde_json::to_string_pretty(&summary)?);

    let invalid = serde_json::from_str::<Fine>(r#"{"amount": -5.00}"#);
    println!("\nnegative amount: {}", invalid.unwrap_err());

    Ok(())
}
