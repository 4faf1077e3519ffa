use ndarray::{Array1, ArrayView1};

/// Numerically stable softmax: exp(x_i - max) / sum(exp(x_j - max))
pub(crate) fn softmax(logits: ArrayView1<f64>) -> Array1<f64> {
    let max = logits.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let exp = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    if sum > 0.0 && sum.is_finite() {
        exp / sum
    } else {
        Array1::from_elem(logits.len(), 1.0 / logits.len().max(1) as f64)
    }
}

/// Index of the largest value. Ties resolve to the lowest index.
pub(crate) fn argmax(values: ArrayView1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
