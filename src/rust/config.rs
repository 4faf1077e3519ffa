use crate::classifier::ClassifierError;

/// Hyperparameters for fitting the logistic model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Step size for full-batch gradient descent
    pub learning_rate: f64,
    /// Hard cap on gradient descent iterations
    pub max_iterations: usize,
    /// Stop once every gradient component is below this magnitude
    pub tolerance: f64,
    /// Inverse L2 regularization strength; smaller values regularize harder
    pub inverse_regularization: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            max_iterations: 1000,
            tolerance: 1e-4,
            inverse_regularization: 1.0,
        }
    }
}

impl TrainingConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_inverse_regularization(mut self, c: f64) -> Self {
        self.inverse_regularization = c;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ClassifierError::ValidationError(
                format!("Learning rate must be a positive number, got {}", self.learning_rate)
            ));
        }
        if self.max_iterations == 0 {
            return Err(ClassifierError::ValidationError("Max iterations must be at least 1".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ClassifierError::ValidationError(
                format!("Tolerance must be a non-negative number, got {}", self.tolerance)
            ));
        }
        if !(self.inverse_regularization.is_finite() && self.inverse_regularization > 0.0) {
            return Err(ClassifierError::ValidationError(
                format!("Inverse regularization must be a positive number, got {}", self.inverse_regularization)
            ));
        }
        Ok(())
    }
}

/// Controls when the query router gives up on a question.
///
/// The classifier always picks one of its intents. These rules decide when
/// that pick is too weak to act on and the user should be told the question
/// was not understood instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    /// Reject predictions whose top probability falls below this value.
    /// `None` accepts every prediction.
    pub min_confidence: Option<f64>,
    /// Reject queries that share no word with the training vocabulary.
    pub reject_unknown_vocabulary: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            min_confidence: None,
            reject_unknown_vocabulary: true,
        }
    }
}

impl RouterConfig {
    pub fn with_min_confidence(mut self, min_confidence: Option<f64>) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_reject_unknown_vocabulary(mut self, reject: bool) -> Self {
        self.reject_unknown_vocabulary = reject;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        if let Some(p) = self.min_confidence {
            if !(0.0..=1.0).contains(&p) {
                return Err(ClassifierError::ValidationError(
                    format!("Minimum confidence must be within [0, 1], got {}", p)
                ));
            }
        }
        Ok(())
    }
}
