#[cfg(test)]
mod tests {
    use crate::similarity::{cosine_similarity, dot, magnitude, WeightVector};

    fn vector(entries: &[(&str, f64)]) -> WeightVector {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_identical_vectors_have_similarity_one() {
        let a = vector(&[("AAPL", 10.0), ("MSFT", 5.0), ("XOM", 2.5)]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal_vectors_have_similarity_zero() {
        let a = vector(&[("AAPL", 3.0)]);
        let b = vector(&[("MSFT", 4.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_zero_vector_yields_zero() {
        let zero = vector(&[("AAPL", 0.0), ("MSFT", 0.0)]);
        let other = vector(&[("AAPL", 1.0)]);
        assert_eq!(cosine_similarity(&zero, &other), 0.0);
        assert_eq!(cosine_similarity(&other, &zero), 0.0);
        assert_eq!(cosine_similarity(&WeightVector::new(), &other), 0.0);
    }

    #[test]
    fn test_missing_keys_count_as_zero() {
        // b has an extra key a lacks; it must still contribute to b's norm.
        let a = vector(&[("x", 3.0)]);
        let b = vector(&[("x", 3.0), ("y", 4.0)]);
        let expected = 9.0 / (3.0 * 5.0);
        assert!((cosine_similarity(&a, &b) - expected).abs() < 1e-12);
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_opposite_vectors_have_similarity_minus_one() {
        let a = vector(&[("x", 1.0), ("y", 2.0)]);
        let b = vector(&[("x", -1.0), ("y", -2.0)]);
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dot_and_magnitude() {
        let a = vector(&[("x", 3.0), ("y", 4.0)]);
        let b = vector(&[("y", 2.0), ("z", 9.0)]);
        assert_eq!(dot(&a, &b), 8.0);
        assert_eq!(magnitude(&a), 5.0);
    }
}
