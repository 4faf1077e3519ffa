use std::sync::Arc;
use std::collections::HashMap;

use super::error::ClassifierError;
use super::model::LogisticModel;
use super::utils::argmax;
use super::vectorizer::{TextVectorizer, Vocabulary};

/// A bag-of-words text classifier backed by a multinomial logistic model.
///
/// The classifier is immutable once built. Every prediction is scored
/// independently, so a single instance can serve any number of queries,
/// and it can be shared across threads behind an `Arc`.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use attendance_insights::{Classifier, ClassDefinition};
///
/// let classifier = Classifier::builder()
///     .add_class(
///         ClassDefinition::new("department", "Attendance per department")
///             .with_examples(vec!["attendance by department", "department wise attendance"])
///     )?
///     .add_class(
///         ClassDefinition::new("overall", "Overall summary")
///             .with_examples(vec!["attendance overview", "describe the data"])
///     )?
///     .build()?;
///
/// let (label, scores) = classifier.predict("which department is best?")?;
/// assert_eq!(label, "department");
/// assert_eq!(scores.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    class_labels: Arc<Vec<String>>,
    class_descriptions: Arc<HashMap<String, String>>,
    vocabulary: Arc<Vocabulary>,
    model: Arc<LogisticModel>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl TextVectorizer for Classifier {
    fn vocabulary(&self) -> Option<&Vocabulary> {
        Some(self.vocabulary.as_ref())
    }
}

impl Classifier {
    pub(crate) fn new(
        class_labels: Arc<Vec<String>>,
        class_descriptions: Arc<HashMap<String, String>>,
        vocabulary: Arc<Vocabulary>,
        model: Arc<LogisticModel>,
    ) -> Self {
        Self { class_labels, class_descriptions, vocabulary, model }
    }

    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.class_labels.len(),
            class_labels: self.class_labels.as_ref().clone(),
            class_descriptions: self.class_descriptions.as_ref().clone(),
            vocabulary_size: self.vocabulary.len(),
            training_iterations: self.model.iterations(),
            converged: self.model.converged(),
        }
    }

    /// Class labels in training order.
    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Probability of every class for `text`, in training order.
    ///
    /// # Errors
    /// - `ValidationError` if the text is empty or only whitespace
    pub fn probabilities(&self, text: &str) -> Result<Vec<(String, f64)>, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let input_vector = self.vectorize(text)?;
        let probs = self.model.predict_proba(input_vector.view())?;

        Ok(self.class_labels
            .iter()
            .cloned()
            .zip(probs.iter().copied())
            .collect())
    }

    /// Makes a prediction for the given text
    ///
    /// Returns the most probable label together with the probability of
    /// every label. There is no rejection class: any non-empty text maps to
    /// one of the trained labels, even when none of its words are known.
    pub fn predict(&self, text: &str) -> Result<(String, HashMap<String, f64>), ClassifierError> {
        let scored = self.probabilities(text)?;
        let probs: ndarray::Array1<f64> = scored.iter().map(|(_, p)| *p).collect();

        let best = argmax(probs.view())
            .ok_or_else(|| ClassifierError::PredictionError("Model produced no scores".into()))?;
        let best_class = scored[best].0.clone();

        Ok((best_class, scored.into_iter().collect()))
    }
}
