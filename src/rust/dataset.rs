//! Employee attendance records and loading them from CSV.

use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

pub const DEPARTMENT_COLUMN: &str = "Department";
pub const PEER_RATING_COLUMN: &str = "Peer Rating";
pub const JOB_ROLE_COLUMN: &str = "Job Role";
pub const ATTENDANCE_COLUMN: &str = "Attendance (%)";

const REQUIRED_COLUMNS: [&str; 4] = [
    DEPARTMENT_COLUMN,
    PEER_RATING_COLUMN,
    JOB_ROLE_COLUMN,
    ATTENDANCE_COLUMN,
];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Line {line}: column '{column}' is blank")]
    MissingValue { line: u64, column: String },
    #[error("Line {line}: attendance value '{value}' is not a finite number")]
    InvalidAttendance { line: u64, value: String },
    #[error("Dataset contains no records")]
    Empty,
}

/// An ordinal peer rating as it appears in the data.
///
/// Ratings that read as numbers compare numerically, so `"10"` sorts after
/// `"9"` and `"4"` equals `"4.0"`. Anything else compares as text and sorts
/// after every numeric rating.
#[derive(Debug, Clone)]
pub struct PeerRating {
    label: String,
    numeric: Option<f64>,
}

impl PeerRating {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let numeric = label.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        Self { label, numeric }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> Option<f64> {
        self.numeric
    }
}

impl Ord for PeerRating {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric, other.numeric) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.label.cmp(&other.label),
        }
    }
}

impl PartialOrd for PeerRating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PeerRating {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PeerRating {}

impl Hash for PeerRating {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.numeric {
            Some(v) => v.to_bits().hash(state),
            None => self.label.hash(state),
        }
    }
}

impl fmt::Display for PeerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// One employee row.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub department: String,
    pub peer_rating: PeerRating,
    pub job_role: String,
    /// Attendance percentage, nominally within [0, 100]
    pub attendance: f64,
}

impl AttendanceRecord {
    pub fn new(
        department: impl Into<String>,
        peer_rating: impl Into<String>,
        job_role: impl Into<String>,
        attendance: f64,
    ) -> Self {
        Self {
            department: department.into(),
            peer_rating: PeerRating::new(peer_rating),
            job_role: job_role.into(),
            attendance,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Peer Rating")]
    peer_rating: String,
    #[serde(rename = "Job Role")]
    job_role: String,
    #[serde(rename = "Attendance (%)")]
    attendance: String,
}

impl RawRecord {
    fn into_record(self, line: u64) -> Result<AttendanceRecord, DatasetError> {
        for (column, value) in [
            (DEPARTMENT_COLUMN, &self.department),
            (PEER_RATING_COLUMN, &self.peer_rating),
            (JOB_ROLE_COLUMN, &self.job_role),
            (ATTENDANCE_COLUMN, &self.attendance),
        ] {
            if value.is_empty() {
                return Err(DatasetError::MissingValue { line, column: column.to_string() });
            }
        }

        let attendance = self.attendance
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DatasetError::InvalidAttendance {
                line,
                value: self.attendance.clone(),
            })?;

        if !(0.0..=100.0).contains(&attendance) {
            warn!("Line {}: attendance {} is outside 0-100", line, attendance);
        }

        Ok(AttendanceRecord::new(self.department, self.peer_rating, self.job_role, attendance))
    }
}

/// A non-empty, read-only table of attendance records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<AttendanceRecord>,
}

impl Dataset {
    /// Loads a CSV file with a header row.
    ///
    /// # Errors
    /// - `IoError` if the file cannot be opened
    /// - any error from [`Dataset::from_reader`]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!("Loaded {} attendance records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parses CSV data with a header row.
    ///
    /// Columns other than the four required ones are ignored. Headers and
    /// cells are trimmed. Loading stops at the first bad row.
    ///
    /// # Errors
    /// - `MissingColumn` if a required header is absent
    /// - `MissingValue` if a required cell is blank
    /// - `InvalidAttendance` if an attendance cell is not a finite number
    /// - `CsvError` for malformed CSV
    /// - `Empty` if there are no data rows
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DatasetError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawRecord = row.deserialize(Some(&headers))?;
            records.push(raw.into_record(line)?);
        }

        Self::from_records(records)
    }

    /// Wraps already-parsed records.
    ///
    /// # Errors
    /// - `Empty` if `records` is empty
    /// - `InvalidAttendance` if any attendance is NaN or infinite
    pub fn from_records(records: Vec<AttendanceRecord>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        if let Some((i, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| !r.attendance.is_finite())
        {
            return Err(DatasetError::InvalidAttendance {
                line: i as u64 + 1,
                value: record.attendance.to_string(),
            });
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The attendance column in row order.
    pub fn attendance(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.attendance)
    }
}
