//! Leave-one-out nearest-neighbor label agreement.
//!
//! For every vector `i`, find the other vector `j` with the highest cosine
//! similarity
//!
//! ```text
//! cos(i, j) = ⟨xᵢ, xⱼ⟩ / (‖xᵢ‖ ‖xⱼ‖)
//! ```
//!
//! and check whether both carry the same ground-truth label. The count of
//! disagreements is 0 when the embedding is self-consistent. This ignores the
//! tree entirely; it measures how well labels are separated by angle alone.
//!
//! Cost is O(n²·C).

use crate::embedding::EmbeddingSet;
use ndarray::ArrayView1;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl EmbeddingSet {
    /// Index of each vector's most cosine-similar other vector.
    ///
    /// The first maximum wins. `None` when no other vector has a defined
    /// similarity (a singleton set, or zero-norm vectors whose similarity is NaN).
    pub fn nearest_neighbors(&self) -> Vec<Option<usize>> {
        let features = self.features();
        let norms: Vec<f64> = features.outer_iter().map(|r| r.dot(&r).sqrt()).collect();
        let n = self.len();

        let nearest = |i: usize| -> Option<usize> {
            let x = features.row(i);
            let mut best: Option<(f64, usize)> = None;
            for j in (0..n).filter(|&j| j != i) {
                let similarity = cosine(x, features.row(j), norms[i], norms[j]);
                if similarity.is_nan() {
                    continue;
                }
                if best.map_or(true, |(s, _)| similarity > s) {
                    best = Some((similarity, j));
                }
            }
            best.map(|(_, j)| j)
        };

        #[cfg(feature = "parallel")]
        return (0..n).into_par_iter().map(nearest).collect();

        #[cfg(not(feature = "parallel"))]
        (0..n).map(nearest).collect()
    }

    /// Number of vectors whose nearest neighbor has a different label.
    ///
    /// Labels are compared by category index (see [`EmbeddingSet::categories`]).
    /// The result is in `[0, n]`.
    pub fn consistency(&self) -> usize {
        let categories = self.categories();
        let category = |i: usize| categories.get_index_of(self.labels()[i].as_str());

        let mismatches = self
            .nearest_neighbors()
            .into_iter()
            .enumerate()
            .filter(|&(i, nn)| nn.is_some_and(|j| category(i) != category(j)))
            .count();

        debug!(rows = self.len(), mismatches, "nearest-neighbor consistency");
        mismatches
    }
}

#[inline]
fn cosine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, norm_a: f64, norm_b: f64) -> f64 {
    a.dot(&b) / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use crate::embedding::{Embedding, EmbeddingSet};

    fn set(rows: &[(&str, [f64; 2])]) -> EmbeddingSet {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (l, f))| Embedding::new(*l, i, f.to_vec()))
            .collect();
        EmbeddingSet::new(2, records).unwrap()
    }

    #[test]
    fn test_separated_directions_are_consistent() {
        let data = set(&[
            ("a", [1.0, 0.0]),
            ("a", [0.9, 0.1]),
            ("b", [0.0, 1.0]),
            ("b", [0.1, 0.9]),
        ]);
        assert_eq!(data.nearest_neighbors(), vec![Some(1), Some(0), Some(3), Some(2)]);
        assert_eq!(data.consistency(), 0);
    }

    #[test]
    fn test_interleaved_labels_disagree() {
        let data = set(&[
            ("a", [1.0, 0.0]),
            ("b", [0.95, 0.05]),
            ("a", [0.0, 1.0]),
            ("b", [0.05, 0.95]),
        ]);
        assert_eq!(data.consistency(), 4);
    }

    #[test]
    fn test_single_label_is_always_consistent() {
        let data = set(&[
            ("a", [1.0, 0.0]),
            ("a", [-3.0, 0.5]),
            ("a", [0.2, 7.0]),
        ]);
        assert_eq!(data.consistency(), 0);
    }

    #[test]
    fn test_opposite_vectors_still_match() {
        let data = set(&[("a", [1.0, 0.0]), ("b", [-1.0, 0.0])]);
        assert_eq!(data.nearest_neighbors(), vec![Some(1), Some(0)]);
        assert_eq!(data.consistency(), 2);
    }

    #[test]
    fn test_zero_vector_has_no_neighbor() {
        let data = set(&[("a", [0.0, 0.0]), ("b", [1.0, 0.0]), ("b", [2.0, 0.1])]);
        let nn = data.nearest_neighbors();
        assert_eq!(nn[0], None);
        assert_eq!(nn[1], Some(2));
        assert_eq!(data.consistency(), 0);
    }

    #[test]
    fn test_singleton_and_empty() {
        assert_eq!(set(&[("a", [1.0, 2.0])]).consistency(), 0);
        assert_eq!(EmbeddingSet::new(2, vec![]).unwrap().consistency(), 0);
    }
}
