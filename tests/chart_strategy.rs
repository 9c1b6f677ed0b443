use fitplot::axis::{
    DATE_TITLE, DISTANCE_TITLE, ELEVATION_TITLE, PACE_TITLE, PERCEIVED_EFFORT_TITLE, SPEED_TITLE,
};
use fitplot::chart::{self, ChartKind, MARKER_COLOR, build_chart, select_chart_kind};
use fitplot::project::PlotPoint;

#[test]
fn date_selects_the_time_chart() {
    assert_eq!(select_chart_kind(DATE_TITLE), Some(ChartKind::TimeScatter));
}

#[test]
fn numeric_x_axes_select_the_numeric_chart() {
    for title in [DISTANCE_TITLE, ELEVATION_TITLE, PERCEIVED_EFFORT_TITLE] {
        assert_eq!(
            select_chart_kind(title),
            Some(ChartKind::NumericScatter),
            "{title}"
        );
    }
}

#[test]
fn anything_else_selects_nothing() {
    for title in [PACE_TITLE, SPEED_TITLE, "", "date", "Distance"] {
        assert_eq!(select_chart_kind(title), None, "{title:?}");
    }
    assert!(build_chart("x", PACE_TITLE, SPEED_TITLE, vec![]).is_none());
}

#[test]
fn description_carries_styling_and_axes() {
    let c = build_chart(
        &chart::chart_title(PACE_TITLE, DISTANCE_TITLE),
        PACE_TITLE,
        DISTANCE_TITLE,
        vec![PlotPoint::new(5.0, 5.2)],
    )
    .unwrap();
    assert_eq!(c.kind, ChartKind::NumericScatter);
    assert_eq!(c.title(), "Pace (min/km) vs Distance (km)");
    assert!(c.title.display && c.title.bold);
    assert_eq!(c.title.font_px, 16);
    assert_eq!(c.title.padding_bottom_px, 10);
    assert!(!c.show_legend);
    assert_eq!(c.series.label, None);
    assert_eq!(c.series.color, MARKER_COLOR);
    assert_eq!(MARKER_COLOR.to_string(), "rgb(43, 125, 17)");
    assert!(c.y_axis.is_reversed);
    assert!(!c.x_axis.is_reversed);
    assert!(!c.x_axis.is_time_axis);
    assert_eq!(c.points().len(), 1);
}

#[test]
fn chart_config_marks_time_and_reversed_scales() {
    let c = build_chart(
        &chart::chart_title(PACE_TITLE, DATE_TITLE),
        PACE_TITLE,
        DATE_TITLE,
        vec![],
    )
    .unwrap();
    let cfg = c.to_chart_config();
    assert_eq!(cfg["type"], "scatter");
    assert_eq!(cfg["options"]["plugins"]["title"]["text"], "Pace (min/km) vs Date");
    assert_eq!(cfg["options"]["plugins"]["title"]["font"]["weight"], "bold");
    assert_eq!(cfg["options"]["plugins"]["legend"]["display"], false);
    assert_eq!(cfg["options"]["scales"]["x"]["type"], "time");
    assert_eq!(cfg["options"]["scales"]["x"]["reverse"], false);
    assert_eq!(cfg["options"]["scales"]["y"]["reverse"], true);
    assert!(cfg["options"]["scales"]["y"].get("type").is_none());
    assert_eq!(
        cfg["data"]["datasets"][0]["backgroundColor"],
        "rgb(43, 125, 17)"
    );
    assert_eq!(cfg["data"]["datasets"][0]["data"], serde_json::json!([]));
}

#[test]
fn speed_axis_is_not_reversed() {
    let c = build_chart("s", SPEED_TITLE, ELEVATION_TITLE, vec![]).unwrap();
    let cfg = c.to_chart_config();
    assert_eq!(cfg["options"]["scales"]["y"]["reverse"], false);
    assert_eq!(cfg["options"]["scales"]["y"]["title"]["text"], "Speed (km/hr)");
}
