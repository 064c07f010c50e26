use super::*;

#[test]
fn epoch_ms_converts_to_expected_utc_instant() {
    // 2024-01-01T00:00:00Z in epoch millis.
    let dt = epoch_ms_to_utc(1_704_067_200_000);
    assert_eq!(dt.to_rfc3339(), "2024-01-01T00:00:00+00:00");
}

#[test]
fn wildly_out_of_range_timestamp_falls_back_rather_than_panicking() {
    let dt = epoch_ms_to_utc(i64::MAX);
    assert!(dt.timestamp() > 0);
}
