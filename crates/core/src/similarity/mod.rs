//! Similarity engine - cosine similarity between sparse vectors.

mod cosine;

pub use cosine::{cosine_similarity, dot, magnitude, WeightVector};

#[cfg(test)]
mod similarity_tests;
