use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use log::{debug, warn};

use super::error::ClassifierError;
use super::utils::softmax;
use crate::config::TrainingConfig;

/// Multinomial logistic regression over dense feature vectors.
///
/// One weight row and one intercept per class. Scores are turned into
/// probabilities with a softmax over the classes.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Array2<f64>,
    bias: Array1<f64>,
    iterations: usize,
    converged: bool,
}

impl LogisticModel {
    /// Fits the model with full-batch gradient descent.
    ///
    /// Minimizes the mean cross-entropy plus an L2 penalty on the weights
    /// (`||W||² / (2·C·n)`, intercepts unpenalized). All parameters start at
    /// zero, so the same data and configuration always yield the same model.
    ///
    /// # Arguments
    /// * `features` - One row per training example
    /// * `targets` - Class index of each row
    /// * `n_classes` - Total number of classes
    /// * `config` - Optimizer settings
    ///
    /// # Errors
    /// - `ValidationError` for an invalid configuration
    /// - `TrainingError` if the inputs are inconsistent or the optimizer diverges
    pub fn fit(
        features: ArrayView2<f64>,
        targets: &[usize],
        n_classes: usize,
        config: &TrainingConfig,
    ) -> Result<Self, ClassifierError> {
        config.validate()?;

        let (n_samples, n_features) = features.dim();
        if n_samples == 0 {
            return Err(ClassifierError::TrainingError("No training examples".into()));
        }
        if targets.len() != n_samples {
            return Err(ClassifierError::TrainingError(format!(
                "Got {} targets for {} training examples",
                targets.len(),
                n_samples
            )));
        }
        if n_classes < 2 {
            return Err(ClassifierError::TrainingError(
                format!("Need at least 2 classes, got {}", n_classes)
            ));
        }
        if let Some(&bad) = targets.iter().find(|&&t| t >= n_classes) {
            return Err(ClassifierError::TrainingError(
                format!("Target class {} out of range for {} classes", bad, n_classes)
            ));
        }

        let mut one_hot = Array2::<f64>::zeros((n_samples, n_classes));
        for (row, &class) in targets.iter().enumerate() {
            one_hot[[row, class]] = 1.0;
        }

        let n = n_samples as f64;
        let penalty = 1.0 / (config.inverse_regularization * n);
        let mut weights = Array2::<f64>::zeros((n_classes, n_features));
        let mut bias = Array1::<f64>::zeros(n_classes);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < config.max_iterations {
            iterations += 1;

            let mut residual = features.dot(&weights.t()) + &bias;
            for mut row in residual.rows_mut() {
                let probs = softmax(row.view());
                row.assign(&probs);
            }
            residual -= &one_hot;

            let grad_weights = residual.t().dot(&features) / n + &weights * penalty;
            let grad_bias = residual.sum_axis(Axis(0)) / n;

            let max_gradient = grad_weights
                .iter()
                .chain(grad_bias.iter())
                .fold(0.0_f64, |acc, g| acc.max(g.abs()));
            if !max_gradient.is_finite() {
                return Err(ClassifierError::TrainingError(format!(
                    "Gradient diverged after {} iterations; try a smaller learning rate",
                    iterations
                )));
            }

            weights.scaled_add(-config.learning_rate, &grad_weights);
            bias.scaled_add(-config.learning_rate, &grad_bias);

            if max_gradient < config.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!("Logistic model converged after {} iterations", iterations);
        } else {
            warn!(
                "Logistic model stopped at the iteration limit ({}) before converging",
                iterations
            );
        }

        Ok(Self { weights, bias, iterations, converged })
    }

    /// Class probabilities for one feature vector.
    ///
    /// # Errors
    /// - `PredictionError` if the vector dimension does not match the model
    pub fn predict_proba(&self, features: ArrayView1<f64>) -> Result<Array1<f64>, ClassifierError> {
        if features.len() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }
        let logits = self.weights.dot(&features) + &self.bias;
        Ok(softmax(logits.view()))
    }

    pub fn n_classes(&self) -> usize {
        self.weights.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::utils::argmax;
    use ndarray::array;

    fn toy_features() -> Array2<f64> {
        array![
            [2.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 2.0],
            [0.0, 0.0, 1.0],
        ]
    }

    #[test]
    fn test_fit_separates_classes() -> Result<(), ClassifierError> {
        let features = toy_features();
        let targets = [0, 0, 1, 1, 2, 2];
        let model = LogisticModel::fit(features.view(), &targets, 3, &TrainingConfig::default())?;

        assert_eq!(model.n_classes(), 3);
        assert_eq!(model.n_features(), 3);
        for (row, &target) in features.rows().into_iter().zip(targets.iter()) {
            let probs = model.predict_proba(row)?;
            assert!((probs.sum() - 1.0).abs() < 1e-9);
            assert_eq!(argmax(probs.view()), Some(target));
        }
        Ok(())
    }

    #[test]
    fn test_fit_is_deterministic() -> Result<(), ClassifierError> {
        let features = toy_features();
        let targets = [0, 0, 1, 1, 2, 2];
        let config = TrainingConfig::default();
        let first = LogisticModel::fit(features.view(), &targets, 3, &config)?;
        let second = LogisticModel::fit(features.view(), &targets, 3, &config)?;
        assert_eq!(first.weights(), second.weights());
        assert_eq!(first.bias(), second.bias());
        assert_eq!(first.iterations(), second.iterations());
        Ok(())
    }

    #[test]
    fn test_iteration_limit_is_respected() -> Result<(), ClassifierError> {
        let features = toy_features();
        let config = TrainingConfig::default().with_max_iterations(3).with_tolerance(0.0);
        let model = LogisticModel::fit(features.view(), &[0, 0, 1, 1, 2, 2], 3, &config)?;
        assert_eq!(model.iterations(), 3);
        assert!(!model.converged());
        Ok(())
    }

    #[test]
    fn test_fit_rejects_inconsistent_inputs() {
        let features = toy_features();
        let config = TrainingConfig::default();
        assert!(LogisticModel::fit(features.view(), &[0, 1], 3, &config).is_err());
        assert!(LogisticModel::fit(features.view(), &[0, 0, 1, 1, 2, 5], 3, &config).is_err());
        assert!(LogisticModel::fit(features.view(), &[0; 6], 1, &config).is_err());
    }

    #[test]
    fn test_predict_rejects_wrong_dimension() -> Result<(), ClassifierError> {
        let model = LogisticModel::fit(toy_features().view(), &[0, 0, 1, 1, 2, 2], 3, &TrainingConfig::default())?;
        let result = model.predict_proba(array![1.0, 0.0].view());
        assert!(matches!(result, Err(ClassifierError::PredictionError(_))));
        Ok(())
    }
}
