//! Attendance aggregations. Every function here is a pure read of the dataset.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::dataset::{
    AttendanceRecord, Dataset, DEPARTMENT_COLUMN, JOB_ROLE_COLUMN, PEER_RATING_COLUMN,
};

/// Column a grouped aggregation is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Department,
    PeerRating,
    JobRole,
}

impl Dimension {
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Department => DEPARTMENT_COLUMN,
            Dimension::PeerRating => PEER_RATING_COLUMN,
            Dimension::JobRole => JOB_ROLE_COLUMN,
        }
    }
}

/// Mean attendance of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
    pub count: usize,
}

/// Mean attendance per distinct value of one column, in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAttendance {
    pub dimension: Dimension,
    pub groups: Vec<GroupMean>,
}

impl GroupedAttendance {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn means(&self) -> impl Iterator<Item = f64> + '_ {
        self.groups.iter().map(|g| g.mean)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.groups.iter().find(|g| g.key == key).map(|g| g.mean)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Descriptive statistics of the attendance column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    pub max: f64,
}

/// Sums attendance per key, keeping groups in the order their keys first appear.
fn group_means<'a, K, F>(dataset: &'a Dataset, key_of: F) -> Vec<(K, GroupMean)>
where
    K: Eq + Hash + Clone + fmt::Display,
    F: Fn(&'a AttendanceRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut totals: Vec<(K, f64, usize)> = Vec::new();

    for record in dataset.records() {
        let key = key_of(record);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            totals.push((key, 0.0, 0));
            totals.len() - 1
        });
        totals[slot].1 += record.attendance;
        totals[slot].2 += 1;
    }

    totals
        .into_iter()
        .map(|(key, sum, count)| {
            let group = GroupMean {
                key: key.to_string(),
                mean: sum / count as f64,
                count,
            };
            (key, group)
        })
        .collect()
}

fn descending_by_mean<K>(dimension: Dimension, groups: Vec<(K, GroupMean)>) -> GroupedAttendance {
    let mut groups: Vec<GroupMean> = groups.into_iter().map(|(_, g)| g).collect();
    // stable: equal means keep first-appearance order
    groups.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    GroupedAttendance { dimension, groups }
}

/// Mean attendance per department, highest first.
pub fn department_attendance(dataset: &Dataset) -> GroupedAttendance {
    let groups = group_means(dataset, |r| r.department.as_str());
    descending_by_mean(Dimension::Department, groups)
}

/// Mean attendance per peer rating, ordered by the rating itself.
pub fn peer_rating_attendance(dataset: &Dataset) -> GroupedAttendance {
    let mut groups = group_means(dataset, |r| &r.peer_rating);
    groups.sort_by(|a, b| a.0.cmp(b.0));
    GroupedAttendance {
        dimension: Dimension::PeerRating,
        groups: groups.into_iter().map(|(_, g)| g).collect(),
    }
}

/// Mean attendance per job role, highest first.
pub fn job_role_attendance(dataset: &Dataset) -> GroupedAttendance {
    let groups = group_means(dataset, |r| r.job_role.as_str());
    descending_by_mean(Dimension::JobRole, groups)
}

/// Linear interpolation between the two closest ranks of sorted `values`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Count, mean, spread and quartiles of every attendance value.
pub fn overall_attendance(dataset: &Dataset) -> AttendanceSummary {
    let mut values: Vec<f64> = dataset.attendance().collect();
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let min = quantile(&values, 0.0);
    let max = quantile(&values, 1.0);
    // rounding in the sum can push the mean a hair outside [min, max]
    let mean = (values.iter().sum::<f64>() / count as f64).clamp(min, max);
    let std = (count > 1).then(|| {
        let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (squared / (count - 1) as f64).sqrt()
    });

    AttendanceSummary {
        count,
        mean,
        std,
        min,
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q3: quantile(&values, 0.75),
        max,
    }
}
