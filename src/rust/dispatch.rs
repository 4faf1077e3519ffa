//! Routing a classified question to its aggregation.

use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::aggregate::{
    department_attendance, job_role_attendance, overall_attendance, peer_rating_attendance,
    AttendanceSummary, GroupedAttendance,
};
use crate::classifier::ClassifierError;
use crate::config::RouterConfig;
use crate::dataset::Dataset;
use crate::intent::{Intent, IntentClassifier, IntentPrediction};

/// Message shown when a question cannot be answered.
pub const NOT_UNDERSTOOD_MESSAGE: &str = "Sorry, I couldn't understand your question.";

/// The aggregation an intent runs, as a plain function value.
#[derive(Debug, Clone, Copy)]
pub enum Aggregation {
    Grouped(fn(&Dataset) -> GroupedAttendance),
    Summary(fn(&Dataset) -> AttendanceSummary),
}

impl Intent {
    pub fn aggregation(self) -> Aggregation {
        match self {
            Intent::DepartmentAttendance => Aggregation::Grouped(department_attendance),
            Intent::PeerRatingAttendance => Aggregation::Grouped(peer_rating_attendance),
            Intent::JobRoleAttendance => Aggregation::Grouped(job_role_attendance),
            Intent::OverallAttendance => Aggregation::Summary(overall_attendance),
        }
    }
}

/// An answered question: a heading plus either a table or summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    Table {
        intent: Intent,
        title: &'static str,
        table: GroupedAttendance,
    },
    Summary {
        intent: Intent,
        title: &'static str,
        summary: AttendanceSummary,
    },
}

impl Insight {
    pub fn intent(&self) -> Intent {
        match self {
            Insight::Table { intent, .. } | Insight::Summary { intent, .. } => *intent,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Insight::Table { title, .. } | Insight::Summary { title, .. } => *title,
        }
    }
}

/// Why a question was turned away.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    EmptyQuery,
    UnknownVocabulary,
    LowConfidence { confidence: f64, threshold: f64 },
    UnknownLabel { label: String },
    Unclassifiable { message: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyQuery => write!(f, "the question is empty"),
            Rejection::UnknownVocabulary => write!(f, "none of its words are familiar"),
            Rejection::LowConfidence { confidence, threshold } => write!(
                f,
                "best match confidence {:.1}% is below {:.1}%",
                confidence * 100.0,
                threshold * 100.0
            ),
            Rejection::UnknownLabel { label } => write!(f, "no answer is defined for '{}'", label),
            Rejection::Unclassifiable { message } => write!(f, "{}", message),
        }
    }
}

/// What the user gets back for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum Response {
    Answer(Insight),
    NotUnderstood(Rejection),
}

impl Response {
    pub fn is_understood(&self) -> bool {
        matches!(self, Response::Answer(_))
    }

    pub fn insight(&self) -> Option<&Insight> {
        match self {
            Response::Answer(insight) => Some(insight),
            Response::NotUnderstood(_) => None,
        }
    }
}

/// Runs the aggregation for `intent`.
pub fn dispatch(intent: Intent, dataset: &Dataset) -> Insight {
    let title = intent.heading();
    match intent.aggregation() {
        Aggregation::Grouped(aggregate) => Insight::Table { intent, title, table: aggregate(dataset) },
        Aggregation::Summary(aggregate) => Insight::Summary { intent, title, summary: aggregate(dataset) },
    }
}

/// Runs the aggregation named by a classifier label.
///
/// A label that names no intent is answered with
/// [`Response::NotUnderstood`] instead of failing.
pub fn dispatch_label(label: &str, dataset: &Dataset) -> Response {
    match label.parse::<Intent>() {
        Ok(intent) => Response::Answer(dispatch(intent, dataset)),
        Err(_) => {
            warn!("No aggregation for label '{}'", label);
            Response::NotUnderstood(Rejection::UnknownLabel { label: label.to_string() })
        }
    }
}

/// A question together with how it was classified and answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedQuery {
    pub query: String,
    pub prediction: Option<IntentPrediction>,
    pub response: Response,
}

/// Classifies questions and answers them from a dataset.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use attendance_insights::{AttendanceRecord, Dataset, Intent, QueryRouter};
///
/// let dataset = Dataset::from_records(vec![
///     AttendanceRecord::new("Sales", "4", "Associate", 90.0),
///     AttendanceRecord::new("Engineering", "5", "Developer", 95.0),
/// ])?;
/// let router = QueryRouter::with_defaults()?;
///
/// let response = router.answer("Which department has the best attendance?", &dataset);
/// assert_eq!(response.insight().map(|i| i.intent()), Some(Intent::DepartmentAttendance));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QueryRouter {
    classifier: IntentClassifier,
    config: RouterConfig,
}

impl QueryRouter {
    /// # Errors
    /// - `ValidationError` if the configuration is out of range
    pub fn new(classifier: IntentClassifier, config: RouterConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        Ok(Self { classifier, config })
    }

    /// Trains the intent classifier and uses the default rejection rules.
    pub fn with_defaults() -> Result<Self, ClassifierError> {
        Self::new(IntentClassifier::new()?, RouterConfig::default())
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Classifies `query`, applies the rejection rules and runs the chosen aggregation.
    pub fn route(&self, query: &str, dataset: &Dataset) -> RoutedQuery {
        let routed = |prediction, response| RoutedQuery {
            query: query.to_string(),
            prediction,
            response,
        };

        if query.trim().is_empty() {
            return routed(None, Response::NotUnderstood(Rejection::EmptyQuery));
        }

        let prediction = match self.classifier.predict(query) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!("Could not classify {:?}: {}", query, e);
                let rejection = Rejection::Unclassifiable { message: e.to_string() };
                return routed(None, Response::NotUnderstood(rejection));
            }
        };

        if self.config.reject_unknown_vocabulary && prediction.known_tokens == 0 {
            warn!("Rejected {:?}: no known words", query);
            return routed(Some(prediction), Response::NotUnderstood(Rejection::UnknownVocabulary));
        }

        if let Some(threshold) = self.config.min_confidence {
            if prediction.confidence < threshold {
                warn!(
                    "Rejected {:?}: confidence {:.3} below {:.3}",
                    query, prediction.confidence, threshold
                );
                let rejection = Rejection::LowConfidence {
                    confidence: prediction.confidence,
                    threshold,
                };
                return routed(Some(prediction), Response::NotUnderstood(rejection));
            }
        }

        debug!("Dispatching {:?} to {}", query, prediction.label);
        let response = dispatch_label(&prediction.label, dataset);
        routed(Some(prediction), response)
    }

    /// Answers `query` from `dataset`. Never fails: anything that cannot be
    /// answered becomes [`Response::NotUnderstood`].
    pub fn answer(&self, query: &str, dataset: &Dataset) -> Response {
        self.route(query, dataset).response
    }
}
