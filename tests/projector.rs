use chrono::NaiveDate;
use fitplot::axis::AxisKey;
use fitplot::models::ActivityRecord;
use fitplot::project::{PlotPoint, PlotValue, project, project_by_field};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rec(
    id: i64,
    date: NaiveDate,
    km: f64,
    pace: Option<f64>,
    elevation: Option<f64>,
) -> ActivityRecord {
    ActivityRecord {
        id,
        user_id: 3,
        activity: "run".into(),
        activity_type: "road".into(),
        date,
        time: "06:45".into(),
        moving_time: "00:30:00".into(),
        distance_km: km,
        elevation_m: elevation,
        perceived_effort: 5,
        pace_float_mps: pace,
        speed_kmphr: None,
    }
}

#[test]
fn one_point_per_record_in_input_order() {
    let rows = vec![
        rec(1, day(2025, 3, 1), 8.0, Some(4.8), None),
        rec(2, day(2025, 2, 1), 5.0, Some(5.2), Some(40.0)),
        rec(3, day(2025, 1, 1), 10.0, Some(6.0), Some(12.5)),
    ];
    let pts = project(&rows, AxisKey::Pace, AxisKey::Distance);
    assert_eq!(pts.len(), 3);
    assert_eq!(pts[0], PlotPoint::new(8.0, 4.8));
    assert_eq!(pts[1], PlotPoint::new(5.0, 5.2));
    assert_eq!(pts[2], PlotPoint::new(10.0, 6.0));

    let by_date = project(&rows, AxisKey::Pace, AxisKey::Date);
    assert_eq!(by_date[0].x, Some(PlotValue::Date(day(2025, 3, 1))));
    assert_eq!(by_date[2].x, Some(PlotValue::Date(day(2025, 1, 1))));
}

#[test]
fn empty_input_projects_to_nothing() {
    assert!(project(&[], AxisKey::Speed, AxisKey::Date).is_empty());
}

#[test]
fn missing_fields_become_none() {
    let rows = vec![
        rec(1, day(2025, 3, 1), 8.0, None, None),
        rec(2, day(2025, 2, 1), 5.0, Some(5.2), Some(40.0)),
    ];
    let pts = project(&rows, AxisKey::Pace, AxisKey::Elevation);
    assert_eq!(pts[0], PlotPoint { x: None, y: None });
    assert!(!pts[0].is_complete());
    assert!(pts[1].is_complete());
}

#[test]
fn unknown_field_names_do_not_fail() {
    let rows = vec![rec(1, day(2025, 3, 1), 8.0, Some(4.8), None)];
    let pts = project_by_field(&rows, "pace_float_mps", "cadence");
    assert_eq!(pts.len(), 1);
    assert_eq!(pts[0].x, None);
    assert_eq!(pts[0].y, Some(PlotValue::Number(4.8)));

    let pts = project_by_field(&rows, "pace_float_mps", "distance_km");
    assert_eq!(pts[0], PlotPoint::new(8.0, 4.8));
}

#[test]
fn points_serialize_as_plain_values() {
    let p = PlotPoint::new(day(2025, 2, 1), 5.2);
    assert_eq!(
        serde_json::to_value(p).unwrap(),
        serde_json::json!({ "x": "2025-02-01", "y": 5.2 })
    );
}
