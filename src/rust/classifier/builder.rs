use std::collections::HashMap;
use std::sync::Arc;
use ndarray::Array2;
use log::{debug, info};

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::model::LogisticModel;
use super::vectorizer::{TextVectorizer, Vocabulary};
use crate::config::TrainingConfig;

/// Represents a class definition with required label, description and optional examples
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The unique identifier for the class
    pub label: String,
    /// A short description of what this class represents.
    pub description: String,
    /// Example texts that belong to this class. Every class needs at least
    /// one example; they are the only training signal the model sees.
    pub examples: Option<Vec<String>>,
}

impl ClassDefinition {
    /// Creates a new class definition with required label and description
    ///
    /// # Example
    /// ```
    /// use attendance_insights::ClassDefinition;
    ///
    /// let class = ClassDefinition::new(
    ///     "department_attendance",
    ///     "Average attendance per department"
    /// );
    /// ```
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            examples: None,
        }
    }

    /// Adds examples to the class definition
    ///
    /// # Example
    /// ```
    /// use attendance_insights::ClassDefinition;
    ///
    /// let class = ClassDefinition::new(
    ///     "department_attendance",
    ///     "Average attendance per department"
    /// ).with_examples(vec![
    ///     "Attendance in each department?",
    ///     "Show department wise attendance"
    /// ]);
    /// ```
    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples = Some(examples.into_iter().map(Into::into).collect());
        self
    }
}

/// A builder for constructing a Classifier with a fluent interface.
///
/// Classes keep the order in which they are added. That order fixes the
/// class indices of the trained model and decides ties between equally
/// likely classes.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    class_labels: Vec<String>,
    class_examples: HashMap<String, Vec<String>>,
    class_descriptions: HashMap<String, String>,
    training_config: TrainingConfig,
    vocabulary: Option<Vocabulary>,
}

impl TextVectorizer for ClassifierBuilder {
    /// Returns the vocabulary once `build` has fitted it
    fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use attendance_insights::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the optimizer configuration used by `build`
    ///
    /// # Example
    /// ```
    /// use attendance_insights::{ClassifierBuilder, TrainingConfig};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_training_config(TrainingConfig::default().with_max_iterations(500));
    /// ```
    pub fn with_training_config(mut self, config: TrainingConfig) -> Self {
        self.training_config = config;
        self
    }

    /// Validates class data according to the following rules:
    /// - Label must not be empty
    /// - Description must not be empty and must not exceed 1000 characters
    /// - Must have at least one example
    /// - No example text can be empty
    fn validate_class_data(
        label: &str,
        description: &str,
        examples: &[impl AsRef<str>]
    ) -> Result<(), ClassifierError> {
        const MAX_DESCRIPTION_LENGTH: usize = 1000;

        if label.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Class label cannot be empty".into()));
        }
        if description.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Class description cannot be empty".into()));
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ClassifierError::ValidationError(
                format!("Class description is too long ({} chars, max is {})",
                    description.chars().count(), MAX_DESCRIPTION_LENGTH)
            ));
        }
        if examples.is_empty() {
            return Err(ClassifierError::ValidationError(
                format!("Class '{}' must have at least one example", label)
            ));
        }
        if let Some(pos) = examples.iter().position(|e| e.as_ref().trim().is_empty()) {
            return Err(ClassifierError::ValidationError(
                format!("Example {} of class '{}' cannot be empty", pos + 1, label)
            ));
        }
        Ok(())
    }

    /// Adds a class to the classifier
    ///
    /// # Errors
    /// - `ValidationError` if the label is empty or already added
    /// - `ValidationError` if the description is empty or too long
    /// - `ValidationError` if no examples are provided or any example is empty
    /// - `ValidationError` if the maximum number of classes (100) is exceeded
    ///
    /// # Example
    /// ```
    /// use attendance_insights::{ClassifierBuilder, ClassDefinition};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .add_class(
    ///         ClassDefinition::new("overall_attendance", "Summary statistics")
    ///             .with_examples(vec!["Attendance overview"])
    ///     );
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, ClassifierError> {
        const MAX_CLASSES: usize = 100;

        let examples = class.examples.unwrap_or_default();

        Self::validate_class_data(&class.label, &class.description, &examples)?;

        if self.class_examples.contains_key(&class.label) {
            return Err(ClassifierError::ValidationError(
                format!("Class '{}' was already added", class.label)
            ));
        }
        if self.class_labels.len() >= MAX_CLASSES {
            return Err(ClassifierError::ValidationError(
                format!("Maximum number of classes ({}) exceeded", MAX_CLASSES)
            ));
        }

        self.class_labels.push(class.label.clone());
        self.class_examples.insert(class.label.clone(), examples);
        self.class_descriptions.insert(class.label, class.description);

        Ok(self)
    }

    /// Fits the vocabulary and the logistic model and returns the final Classifier
    ///
    /// # Errors
    /// - `BuildError` if fewer than two classes have been added
    /// - `VocabularyError` if the examples contain no usable words
    /// - `ValidationError` / `TrainingError` from the optimizer
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use attendance_insights::{ClassifierBuilder, ClassDefinition};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .add_class(
    ///         ClassDefinition::new("role", "Attendance per job role")
    ///             .with_examples(vec!["attendance by job role"])
    ///     )?
    ///     .add_class(
    ///         ClassDefinition::new("overall", "Summary statistics")
    ///             .with_examples(vec!["attendance overview"])
    ///     )?
    ///     .build()?;
    /// let (label, _) = classifier.predict("job role")?;
    /// assert_eq!(label, "role");
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(mut self) -> Result<Classifier, ClassifierError> {
        if self.class_labels.len() < 2 {
            return Err(ClassifierError::BuildError(
                format!("At least two classes must be added, got {}", self.class_labels.len())
            ));
        }

        let vocabulary = Vocabulary::fit(
            self.class_labels
                .iter()
                .flat_map(|label| self.class_examples[label].iter())
        )?;
        info!(
            "Fitted vocabulary of {} terms from {} classes",
            vocabulary.len(),
            self.class_labels.len()
        );
        self.vocabulary = Some(vocabulary);

        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for (class_index, label) in self.class_labels.iter().enumerate() {
            let examples = &self.class_examples[label];
            debug!("Processing class '{}' ({} examples)", label, examples.len());
            for example in examples {
                rows.push(self.vectorize(example)?);
                targets.push(class_index);
            }
        }

        let vocabulary = self.vocabulary
            .take()
            .ok_or_else(|| ClassifierError::BuildError("Vocabulary not fitted".into()))?;

        let flat: Vec<f64> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        let features = Array2::from_shape_vec((rows.len(), vocabulary.len()), flat)?;

        let silent = rows.iter().filter(|row| row.sum() == 0.0).count();
        if silent > 0 {
            debug!("{} examples share no words with the vocabulary", silent);
        }

        let model = LogisticModel::fit(
            features.view(),
            &targets,
            self.class_labels.len(),
            &self.training_config,
        )?;
        info!(
            "Trained logistic model on {} examples in {} iterations",
            targets.len(),
            model.iterations()
        );

        Ok(Classifier::new(
            Arc::new(self.class_labels),
            Arc::new(self.class_descriptions),
            Arc::new(vocabulary),
            Arc::new(model),
        ))
    }
}
