use std::collections::HashMap;

mod error;
mod model;
mod utils;
mod vectorizer;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;

pub use error::ClassifierError;
pub use model::LogisticModel;
pub use vectorizer::{tokenize, TextVectorizer, Vocabulary};
pub use classifier::Classifier;
pub use builder::{ClassifierBuilder, ClassDefinition};

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of classes the classifier is trained on
    pub num_classes: usize,
    /// Labels of the classes, in training order
    pub class_labels: Vec<String>,
    /// Descriptions of the classes
    pub class_descriptions: HashMap<String, String>,
    /// Number of distinct terms in the bag-of-words vocabulary
    pub vocabulary_size: usize,
    /// Gradient descent iterations used to fit the model
    pub training_iterations: usize,
    /// Whether training stopped below the gradient tolerance
    pub converged: bool,
}
