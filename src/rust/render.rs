//! Plain-text rendering of answers for the terminal.

use std::fmt;

use strum::IntoEnumIterator;

use crate::aggregate::{AttendanceSummary, GroupedAttendance};
use crate::dispatch::{Insight, Response, NOT_UNDERSTOOD_MESSAGE};
use crate::intent::Intent;

/// Example questions shown at startup.
pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "What is the average attendance by Employee Peer rating?",
    "Which department has the heighest attendance?",
    "Show attendance by roles.",
];

/// Title and usage notes printed before the first question.
pub fn banner() -> String {
    let mut out = String::from("Employee Attendance Insights\n\n");
    out.push_str("Ask questions in plain language about attendance by department, peer rating or job role.\n");
    out.push_str("For example:\n");
    for question in EXAMPLE_QUESTIONS {
        out.push_str(&format!("  - {}\n", question));
    }
    out.push_str("\nTopics:\n");
    for intent in Intent::iter() {
        out.push_str(&format!("  - {}: {}\n", intent.heading(), intent.description()));
    }
    out
}

impl fmt::Display for GroupedAttendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.dimension.column();
        let value_header = "Attendance (%)";
        let width = self.groups
            .iter()
            .map(|g| g.key.chars().count())
            .chain(std::iter::once(header.chars().count()))
            .max()
            .unwrap_or_default();

        writeln!(f, "{:<width$}  {:>14}", header, value_header, width = width)?;
        writeln!(f, "{}  {}", "-".repeat(width), "-".repeat(14))?;
        for group in &self.groups {
            writeln!(f, "{:<width$}  {:>14.2}", group.key, group.mean, width = width)?;
        }
        Ok(())
    }
}

impl fmt::Display for AttendanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<6} {:>10}", "count", self.count)?;
        writeln!(f, "{:<6} {:>10.2}", "mean", self.mean)?;
        match self.std {
            Some(std) => writeln!(f, "{:<6} {:>10.2}", "std", std)?,
            None => writeln!(f, "{:<6} {:>10}", "std", "n/a")?,
        }
        writeln!(f, "{:<6} {:>10.2}", "min", self.min)?;
        writeln!(f, "{:<6} {:>10.2}", "25%", self.q1)?;
        writeln!(f, "{:<6} {:>10.2}", "50%", self.median)?;
        writeln!(f, "{:<6} {:>10.2}", "75%", self.q3)?;
        writeln!(f, "{:<6} {:>10.2}", "max", self.max)
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.title())?;
        match self {
            Insight::Table { table, .. } => write!(f, "{}", table),
            Insight::Summary { summary, .. } => write!(f, "{}", summary),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Answer(insight) => write!(f, "{}", insight),
            Response::NotUnderstood(_) => writeln!(f, "{}", NOT_UNDERSTOOD_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Dimension, GroupMean};
    use crate::dispatch::Rejection;

    #[test]
    fn test_table_rendering() {
        let table = GroupedAttendance {
            dimension: Dimension::Department,
            groups: vec![
                GroupMean { key: "Engineering".into(), mean: 90.0, count: 2 },
                GroupMean { key: "Sales".into(), mean: 85.0, count: 2 },
            ],
        };
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Department"));
        assert!(lines[2].starts_with("Engineering") && lines[2].ends_with("90.00"));
        assert!(lines[3].starts_with("Sales") && lines[3].ends_with("85.00"));
    }

    #[test]
    fn test_not_understood_message() {
        let response = Response::NotUnderstood(Rejection::EmptyQuery);
        assert_eq!(response.to_string().trim_end(), NOT_UNDERSTOOD_MESSAGE);
    }

    #[test]
    fn test_banner_lists_examples() {
        let text = banner();
        for question in EXAMPLE_QUESTIONS {
            assert!(text.contains(question));
        }
        assert!(text.contains("Overall Attendance Summary"));
    }
}
