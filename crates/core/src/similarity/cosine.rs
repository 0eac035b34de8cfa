use std::collections::BTreeMap;

/// Sparse numeric vector keyed by symbol or sector id. Absent keys are 0.
///
/// Ordered so every reduction over it sums in key order, which keeps
/// `cosine_similarity(a, b)` and `cosine_similarity(b, a)` bit-identical.
pub type WeightVector = BTreeMap<String, f64>;

/// Dot product over the keys of `a`; keys missing from `b` contribute 0.
pub fn dot(a: &WeightVector, b: &WeightVector) -> f64 {
    let (outer, inner) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    outer
        .iter()
        .filter_map(|(key, x)| inner.get(key).map(|y| x * y))
        .sum()
}

/// Euclidean norm.
pub fn magnitude(v: &WeightVector) -> f64 {
    v.values().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity in `[-1, 1]`; 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &WeightVector, b: &WeightVector) -> f64 {
    let norm_a = magnitude(a);
    let norm_b = magnitude(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
