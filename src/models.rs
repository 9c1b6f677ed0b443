use crate::axis::AxisKey;
use crate::error::PlotError;
use crate::project::PlotValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One logged workout as returned by the tracker service.
///
/// `pace_float_mps` and `speed_kmphr` are computed by the service; despite its name
/// the pace field holds decimal **minutes per km** (e.g. `6.88` for 6:53 min/km).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub id: i64,
    pub user_id: i64,
    pub activity: String,
    pub activity_type: String,
    #[serde(deserialize_with = "de_date_dash_or_slash")]
    pub date: NaiveDate,
    pub time: String,
    /// `hh:mm:ss`
    pub moving_time: String,
    pub distance_km: f64,
    #[serde(default)]
    pub elevation_m: Option<f64>,
    pub perceived_effort: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_float_mps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmphr: Option<f64>,
}

impl ActivityRecord {
    /// Value of the field behind an axis key. Optional fields that are absent yield `None`.
    pub fn field(&self, key: AxisKey) -> Option<PlotValue> {
        match key {
            AxisKey::Pace => self.pace_float_mps.map(PlotValue::Number),
            AxisKey::Speed => self.speed_kmphr.map(PlotValue::Number),
            AxisKey::Distance => Some(PlotValue::Number(self.distance_km)),
            AxisKey::Elevation => self.elevation_m.map(PlotValue::Number),
            AxisKey::PerceivedEffort => Some(PlotValue::Number(self.perceived_effort as f64)),
            AxisKey::Date => Some(PlotValue::Date(self.date)),
        }
    }

    /// Moving time in whole seconds, if `moving_time` is well formed.
    pub fn moving_time_secs(&self) -> Option<u32> {
        parse_moving_time(&self.moving_time)
    }

    /// Fill in pace and speed when the service left them out.
    /// Values already present are kept as-is.
    pub fn with_derived_metrics(mut self) -> Self {
        if let Some(secs) = self.moving_time_secs() {
            if self.pace_float_mps.is_none() {
                self.pace_float_mps = pace_min_per_km(self.distance_km, secs);
            }
            if self.speed_kmphr.is_none() {
                self.speed_kmphr = speed_km_per_hr(self.distance_km, secs);
            }
        }
        self
    }
}

/// Parse `hh:mm:ss` into seconds.
pub fn parse_moving_time(s: &str) -> Option<u32> {
    let mut parts = s.trim().split(':');
    let h: u32 = parts.next()?.trim().parse().ok()?;
    let m: u32 = parts.next()?.trim().parse().ok()?;
    let sec: u32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || m >= 60 || sec >= 60 {
        return None;
    }
    h.checked_mul(3600)?.checked_add(m * 60 + sec)
}

/// Pace in decimal minutes per km, truncated to whole seconds first ("6:53" -> 6.88).
pub fn pace_min_per_km(distance_km: f64, moving_secs: u32) -> Option<f64> {
    if distance_km.is_nan() || distance_km <= 0.0 || moving_secs == 0 {
        return None;
    }
    let secs_per_km = moving_secs as f64 / distance_km;
    let mins = (secs_per_km / 60.0).floor();
    let secs = (secs_per_km % 60.0).floor();
    Some(round2(mins + secs / 60.0))
}

/// Average speed in km/h, two decimals.
pub fn speed_km_per_hr(distance_km: f64, moving_secs: u32) -> Option<f64> {
    if moving_secs == 0 || !distance_km.is_finite() || distance_km < 0.0 {
        return None;
    }
    Some(round2(distance_km / (moving_secs as f64 / 3600.0)))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Serde helper: accept `YYYY-MM-DD` as well as the older `YYYY/MM/DD` form.
fn de_date_dash_or_slash<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct DateVisitor;

    impl<'de> Visitor<'de> for DateVisitor {
        type Value = NaiveDate;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a date formatted as YYYY-MM-DD or YYYY/MM/DD")
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            // Timestamps like "2025-02-01T00:00:00.000Z" keep only the date part.
            let day = s.split('T').next().unwrap_or(s).trim();
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(day, "%Y/%m/%d"))
                .map_err(E::custom)
        }
    }

    deserializer.deserialize_str(DateVisitor)
}

/// Payload for creating an activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewActivity {
    pub user_id: i64,
    pub date: NaiveDate,
    pub time: String,
    pub activity: String,
    pub activity_type: String,
    pub moving_time: String,
    pub distance_km: f64,
    pub perceived_effort: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perceived_effort: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
}

impl ActivityUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ActivityUpdate::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Column the service sorts listings by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Id,
    UserId,
    Date,
    Time,
    Activity,
    ActivityType,
    MovingTime,
    DistanceKm,
    PerceivedEffort,
    ElevationM,
    DateUpdated,
}

impl SortBy {
    pub const ALL: [SortBy; 11] = [
        SortBy::Id,
        SortBy::UserId,
        SortBy::Date,
        SortBy::Time,
        SortBy::Activity,
        SortBy::ActivityType,
        SortBy::MovingTime,
        SortBy::DistanceKm,
        SortBy::PerceivedEffort,
        SortBy::ElevationM,
        SortBy::DateUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Id => "id",
            SortBy::UserId => "user_id",
            SortBy::Date => "date",
            SortBy::Time => "time",
            SortBy::Activity => "activity",
            SortBy::ActivityType => "activity_type",
            SortBy::MovingTime => "moving_time",
            SortBy::DistanceKm => "distance_km",
            SortBy::PerceivedEffort => "perceived_effort",
            SortBy::ElevationM => "elevation_m",
            SortBy::DateUpdated => "date_updated",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortBy::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort column: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Asc,
    Desc,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Asc => "asc",
            OrderBy::Desc => "desc",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(OrderBy::Asc),
            "desc" => Ok(OrderBy::Desc),
            other => Err(format!("unknown order: {other} (expected asc or desc)")),
        }
    }
}

/// Paging and ordering for activity listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub offset: u32,
    pub limit: u32,
    pub sort_by: SortBy,
    pub order_by: OrderBy,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
            sort_by: SortBy::Id,
            order_by: OrderBy::Asc,
        }
    }
}

impl ListQuery {
    pub fn to_query_param(&self) -> String {
        format!(
            "offset={}&limit={}&sort_by={}&order_by={}",
            self.offset, self.limit, self.sort_by, self.order_by
        )
    }
}

/// Inclusive calendar date range for plot queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Parse two `YYYY-MM-DD` strings. A start after the end is rejected.
    pub fn parse(start: &str, end: &str) -> Result<Self, PlotError> {
        let start_date = parse_iso_date(start)?;
        let end_date = parse_iso_date(end)?;
        if start_date > end_date {
            return Err(PlotError::InvalidDateRange {
                start: start.trim().to_string(),
                end: end.trim().to_string(),
            });
        }
        Ok(Self {
            start: start_date,
            end: end_date,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn to_query_param(&self) -> String {
        format!(
            "start_date={}&end_date={}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

fn parse_iso_date(s: &str) -> Result<NaiveDate, PlotError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| PlotError::InvalidDate {
        value: s.trim().to_string(),
    })
}

/// Grouping key used in stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub activity: String,
    pub activity_type: String,
}

impl From<&ActivityRecord> for GroupKey {
    fn from(r: &ActivityRecord) -> Self {
        Self {
            activity: r.activity.clone(),
            activity_type: r.activity_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_time_parses_and_rejects_junk() {
        assert_eq!(parse_moving_time("00:34:25"), Some(2065));
        assert_eq!(parse_moving_time("1:00:00"), Some(3600));
        assert_eq!(parse_moving_time("34:25"), None);
        assert_eq!(parse_moving_time("00:61:00"), None);
        assert_eq!(parse_moving_time("aa:bb:cc"), None);
        // hours beyond u32 seconds
        assert_eq!(parse_moving_time("1200000:00:00"), None);
        assert_eq!(parse_moving_time("1193046:28:15"), Some(u32::MAX));
    }

    #[test]
    fn pace_and_speed_match_service_rounding() {
        // 5 km in 34:25 -> 6:53 min/km -> 6.88
        assert_eq!(pace_min_per_km(5.0, 2065), Some(6.88));
        assert_eq!(speed_km_per_hr(5.0, 2065), Some(8.72));
        assert_eq!(pace_min_per_km(10.0, 3600), Some(6.0));
        assert_eq!(pace_min_per_km(0.0, 3600), None);
        assert_eq!(speed_km_per_hr(5.0, 0), None);
    }

    #[test]
    fn date_range_rejects_reversed_and_malformed() {
        let ok = DateRange::parse("2025-01-01", "2025-06-01").unwrap();
        assert_eq!(
            ok.to_query_param(),
            "start_date=2025-01-01&end_date=2025-06-01"
        );
        assert!(ok.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));

        assert_eq!(
            DateRange::parse("2025-06-01", "2025-05-01"),
            Err(PlotError::InvalidDateRange {
                start: "2025-06-01".into(),
                end: "2025-05-01".into()
            })
        );
        assert!(matches!(
            DateRange::parse("2025/06/01", "2025-07-01"),
            Err(PlotError::InvalidDate { .. })
        ));
        // same day is a valid one-day range
        assert!(DateRange::parse("2025-05-01", "2025-05-01").is_ok());
    }

    #[test]
    fn sort_and_order_parse_case_insensitively() {
        assert_eq!("DISTANCE_KM".parse::<SortBy>(), Ok(SortBy::DistanceKm));
        assert_eq!("DESC".parse::<OrderBy>(), Ok(OrderBy::Desc));
        assert!("speed".parse::<SortBy>().is_err());
        assert_eq!(
            ListQuery::default().to_query_param(),
            "offset=0&limit=10&sort_by=id&order_by=asc"
        );
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let u = ActivityUpdate::default();
        assert!(u.is_empty());
        assert_eq!(serde_json::to_string(&u).unwrap(), "{}");
    }
}
