use crate::models::ActivityRecord;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save activities as CSV with header. Absent optional fields become empty cells.
pub fn save_csv<P: AsRef<Path>>(records: &[ActivityRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create csv {}", path.display()))?;
    wtr.serialize((
        "id",
        "user_id",
        "activity",
        "activity_type",
        "date",
        "time",
        "moving_time",
        "distance_km",
        "elevation_m",
        "perceived_effort",
        "pace_float_mps",
        "speed_kmphr",
    ))?;
    for r in records {
        wtr.serialize((
            r.id,
            r.user_id,
            &r.activity,
            &r.activity_type,
            r.date.format("%Y-%m-%d").to_string(),
            &r.time,
            &r.moving_time,
            r.distance_km,
            r.elevation_m,
            r.perceived_effort,
            r.pace_float_mps,
            r.speed_kmphr,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save activities as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[ActivityRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create json {}", path.display()))?;
    let s = serde_json::to_string_pretty(records).context("serialize activities")?;
    f.write_all(s.as_bytes())
        .with_context(|| format!("write json {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record() -> ActivityRecord {
        ActivityRecord {
            id: 7,
            user_id: 3,
            activity: "run".into(),
            activity_type: "trail".into(),
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            time: "07:30".into(),
            moving_time: "00:34:25".into(),
            distance_km: 5.0,
            elevation_m: None,
            perceived_effort: 6,
            pace_float_mps: Some(6.88),
            speed_kmphr: None,
        }
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("a.csv");
        let jsonp = dir.path().join("a.json");
        let rows = vec![record()];
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();

        let csv_text = std::fs::read_to_string(&csvp).unwrap();
        let mut lines = csv_text.lines();
        assert!(lines.next().unwrap().starts_with("id,user_id,activity"));
        assert_eq!(
            lines.next().unwrap(),
            "7,3,run,trail,2025-02-01,07:30,00:34:25,5.0,,6,6.88,"
        );

        let back: Vec<ActivityRecord> =
            serde_json::from_str(&std::fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn write_errors_name_the_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("a.json");
        let err = save_json(&[record()], &missing).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("create json") && msg.contains("a.json"), "{msg}");
        let err = save_csv(&[record()], dir.path().join("nope").join("a.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("create csv"));
    }
}
