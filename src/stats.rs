use crate::axis::AxisKey;
use crate::models::{ActivityRecord, GroupKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics of one axis for a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: GroupKey,
    pub axis: AxisKey,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics of `axis` grouped by (activity, activity_type).
///
/// Records without a numeric value for `axis` count as missing; on the date axis
/// that is every record.
pub fn grouped_summary(records: &[ActivityRecord], axis: AxisKey) -> Vec<Summary> {
    let mut groups: BTreeMap<GroupKey, (Vec<f64>, usize)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(GroupKey::from(r)).or_default();
        match r.field(axis).and_then(|v| v.as_f64()).filter(|v| v.is_finite()) {
            Some(v) => entry.0.push(v),
            None => entry.1 += 1,
        }
    }

    let mut out = Vec::new();
    for (key, (mut vals, missing)) in groups {
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            key,
            axis,
            count,
            missing,
            min,
            max,
            mean,
            median,
        });
    }
    out
}
