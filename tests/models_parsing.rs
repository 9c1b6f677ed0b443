use chrono::NaiveDate;
use fitplot::axis::AxisKey;
use fitplot::models::{ActivityRecord, NewActivity};
use fitplot::project::PlotValue;

#[test]
fn parse_service_rows() {
    let sample = r#"
    [
      {
        "id": 41,
        "user_id": 3,
        "activity": "run",
        "activity_type": "road",
        "date": "2025-02-01",
        "time": "06:30",
        "moving_time": "00:34:25",
        "distance_km": 5.0,
        "elevation_m": 35.5,
        "perceived_effort": 6,
        "pace_float_mps": 6.88,
        "speed_kmphr": 8.72,
        "date_updated": "2025-02-02T10:00:00"
      },
      {
        "id": 42,
        "user_id": 3,
        "activity": "run",
        "activity_type": "trail",
        "date": "2025/02/08",
        "time": "08:00",
        "moving_time": "01:00:00",
        "distance_km": 10,
        "perceived_effort": 8
      }
    ]
    "#;
    let rows: Vec<ActivityRecord> = serde_json::from_str(sample).unwrap();
    assert_eq!(rows.len(), 2);

    let a = &rows[0];
    assert_eq!(a.date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    assert_eq!(a.elevation_m, Some(35.5));
    assert_eq!(a.field(AxisKey::Pace), Some(PlotValue::Number(6.88)));
    assert_eq!(a.field(AxisKey::PerceivedEffort), Some(PlotValue::Number(6.0)));

    let b = &rows[1];
    assert_eq!(b.date, NaiveDate::from_ymd_opt(2025, 2, 8).unwrap());
    assert_eq!(b.distance_km, 10.0);
    assert_eq!(b.elevation_m, None);
    assert_eq!(b.pace_float_mps, None);
    assert_eq!(b.field(AxisKey::Elevation), None);
    assert_eq!(b.moving_time_secs(), Some(3600));
}

#[test]
fn timestamp_dates_keep_the_day() {
    let json = r#"{"id":1,"user_id":1,"activity":"walk","activity_type":"road",
        "date":"2025-04-30T00:00:00.000Z","time":"12:00","moving_time":"00:20:00",
        "distance_km":2.0,"perceived_effort":1}"#;
    let r: ActivityRecord = serde_json::from_str(json).unwrap();
    assert_eq!(r.date.to_string(), "2025-04-30");
}

#[test]
fn bad_date_is_a_decode_error() {
    let json = r#"{"id":1,"user_id":1,"activity":"walk","activity_type":"road",
        "date":"30.04.2025","time":"12:00","moving_time":"00:20:00",
        "distance_km":2.0,"perceived_effort":1}"#;
    assert!(serde_json::from_str::<ActivityRecord>(json).is_err());
}

#[test]
fn derived_metrics_fill_gaps_only() {
    let json = r#"{"id":1,"user_id":1,"activity":"run","activity_type":"road",
        "date":"2025-04-30","time":"12:00","moving_time":"00:34:25",
        "distance_km":5.0,"perceived_effort":5,"speed_kmphr":9.99}"#;
    let r: ActivityRecord = serde_json::from_str(json).unwrap();
    let r = r.with_derived_metrics();
    assert_eq!(r.pace_float_mps, Some(6.88));
    assert_eq!(r.speed_kmphr, Some(9.99));

    let mut broken = r.clone();
    broken.moving_time = "soon".into();
    broken.pace_float_mps = None;
    assert_eq!(broken.with_derived_metrics().pace_float_mps, None);
}

#[test]
fn new_activity_omits_missing_elevation() {
    let new = NewActivity {
        user_id: 3,
        date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
        time: "07:15".into(),
        activity: "run".into(),
        activity_type: "road".into(),
        moving_time: "00:45:00".into(),
        distance_km: 9.0,
        perceived_effort: 5,
        elevation_m: None,
    };
    let v = serde_json::to_value(&new).unwrap();
    assert_eq!(v["date"], "2025-05-04");
    assert!(v.get("elevation_m").is_none());
}
