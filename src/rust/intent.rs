//! The fixed set of questions the bot understands and the classifier trained
//! to recognise them.

use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::classifier::{ClassDefinition, Classifier, ClassifierError, TextVectorizer};
use crate::config::TrainingConfig;

/// What a question is asking for.
///
/// The snake_case form of each variant is the label the classifier is
/// trained with, so `Intent` and the classifier's label set are the same set
/// by construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    DepartmentAttendance,
    PeerRatingAttendance,
    JobRoleAttendance,
    OverallAttendance,
}

impl Intent {
    pub fn label(self) -> &'static str {
        self.into()
    }

    pub fn description(self) -> &'static str {
        match self {
            Intent::DepartmentAttendance => "Average attendance per department, highest first",
            Intent::PeerRatingAttendance => "Average attendance per peer rating, by rating",
            Intent::JobRoleAttendance => "Average attendance per job role, highest first",
            Intent::OverallAttendance => "Descriptive statistics of attendance across all employees",
        }
    }

    /// Title shown above the answer.
    pub fn heading(self) -> &'static str {
        match self {
            Intent::DepartmentAttendance => "Department-wise Attendance",
            Intent::PeerRatingAttendance => "Peer Rating vs Attendance",
            Intent::JobRoleAttendance => "Job Role-wise Attendance",
            Intent::OverallAttendance => "Overall Attendance Summary",
        }
    }

    /// Phrasings the classifier learns this intent from.
    pub fn training_examples(self) -> &'static [&'static str] {
        match self {
            Intent::DepartmentAttendance => &[
                "What is the average attendance by department?",
                "Attendance in each department?",
                "Show department wise attendance",
            ],
            Intent::PeerRatingAttendance => &[
                "Attendance by peer rating",
                "Does peer rating affect attendance?",
                "Show rating wise attendance",
            ],
            Intent::JobRoleAttendance => &[
                "Attendance by job role",
                "Which job roles have better attendance?",
                "Show role wise attendance",
            ],
            Intent::OverallAttendance => &[
                "Give overall attendance summary",
                "Attendance overview",
                "Describe the attendance data",
            ],
        }
    }

    fn class_definition(self) -> ClassDefinition {
        ClassDefinition::new(self.label(), self.description())
            .with_examples(self.training_examples().to_vec())
    }
}

/// Result of classifying one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentPrediction {
    /// Label of the most probable class
    pub label: String,
    /// Probability of `label`
    pub confidence: f64,
    /// Probability of every label, in training order
    pub scores: Vec<(String, f64)>,
    /// Number of query tokens found in the training vocabulary
    pub known_tokens: usize,
}

impl IntentPrediction {
    /// The predicted label as an `Intent`, if it names one.
    pub fn intent(&self) -> Option<Intent> {
        self.label.parse().ok()
    }
}

/// Classifier over the four [`Intent`]s, trained on their fixed examples.
///
/// Construct it once at startup and pass it by reference; it holds no
/// per-query state.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use attendance_insights::{Intent, IntentClassifier};
///
/// let classifier = IntentClassifier::new()?;
/// assert_eq!(classifier.classify("Attendance by job role")?, Intent::JobRoleAttendance);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    classifier: Classifier,
}

impl IntentClassifier {
    /// Trains the classifier with the default configuration.
    pub fn new() -> Result<Self, ClassifierError> {
        Self::with_training_config(TrainingConfig::default())
    }

    pub fn with_training_config(config: TrainingConfig) -> Result<Self, ClassifierError> {
        let mut builder = Classifier::builder().with_training_config(config);
        for intent in Intent::iter() {
            builder = builder.add_class(intent.class_definition())?;
        }
        Ok(Self { classifier: builder.build()? })
    }

    /// The underlying label classifier.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Scores `query` against every intent.
    ///
    /// # Errors
    /// - `ValidationError` if the query is empty
    pub fn predict(&self, query: &str) -> Result<IntentPrediction, ClassifierError> {
        let (label, probs) = self.classifier.predict(query)?;
        let scores: Vec<(String, f64)> = self.classifier
            .class_labels()
            .iter()
            .map(|l| (l.clone(), probs.get(l).copied().unwrap_or_default()))
            .collect();
        let confidence = probs.get(&label).copied().unwrap_or_default();
        let known_tokens = self.classifier.count_tokens(query)?;

        debug!(
            "Classified {:?} as {} (p={:.3}, {} known tokens)",
            query, label, confidence, known_tokens
        );

        Ok(IntentPrediction { label, confidence, scores, known_tokens })
    }

    /// Returns the most probable intent for `query`.
    ///
    /// Always one of the four intents for non-empty input, however unrelated
    /// the query is.
    pub fn classify(&self, query: &str) -> Result<Intent, ClassifierError> {
        let prediction = self.predict(query)?;
        prediction.intent().ok_or_else(|| {
            ClassifierError::PredictionError(format!("Unknown intent label '{}'", prediction.label))
        })
    }
}
