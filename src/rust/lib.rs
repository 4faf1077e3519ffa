//! Answer plain-language questions about employee attendance.
//!
//! A question is routed by a small bag-of-words intent classifier to one of
//! four fixed aggregations over an attendance table.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use attendance_insights::{AttendanceRecord, Dataset, QueryRouter, Response};
//!
//! let dataset = Dataset::from_records(vec![
//!     AttendanceRecord::new("Sales", "4", "Associate", 90.0),
//!     AttendanceRecord::new("Sales", "3", "Associate", 80.0),
//!     AttendanceRecord::new("Engineering", "5", "Developer", 95.0),
//!     AttendanceRecord::new("Engineering", "4", "Developer", 85.0),
//! ])?;
//!
//! let router = QueryRouter::with_defaults()?;
//! match router.answer("What is the average attendance by department?", &dataset) {
//!     Response::Answer(insight) => println!("{}", insight),
//!     Response::NotUnderstood(reason) => println!("not understood: {}", reason),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Building a classifier directly
//!
//! The classifier is generic over labels and can be trained on any small
//! example set:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use attendance_insights::{Classifier, ClassDefinition};
//!
//! let classifier = Classifier::builder()
//!     .add_class(
//!         ClassDefinition::new("positive", "Content with positive sentiment")
//!             .with_examples(vec!["great", "awesome", "excellent"])
//!     )?
//!     .add_class(
//!         ClassDefinition::new("negative", "Content with negative sentiment")
//!             .with_examples(vec!["bad", "terrible", "awful"])
//!     )?
//!     .build()?;
//!
//! let (label, _scores) = classifier.predict("what a great day")?;
//! assert_eq!(label, "positive");
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod dispatch;
pub mod intent;
pub mod render;

pub use aggregate::{
    department_attendance, job_role_attendance, overall_attendance, peer_rating_attendance,
    AttendanceSummary, Dimension, GroupMean, GroupedAttendance,
};
pub use classifier::{
    Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, ClassDefinition, TextVectorizer,
};
pub use config::{RouterConfig, TrainingConfig};
pub use dataset::{AttendanceRecord, Dataset, DatasetError, PeerRating};
pub use dispatch::{dispatch, dispatch_label, Insight, QueryRouter, Rejection, Response, RoutedQuery};
pub use intent::{Intent, IntentClassifier, IntentPrediction};

pub fn init_logger() {
    env_logger::init();
}
