//! Greedy variance-reduction tree induction.
//!
//! At every node the builder tries each column `k` and each value `p` that
//! occurs in that column as a pivot, scoring the split by
//!
//! ```text
//! gain(k, p) = Var(k) - (Var(k | x ≤ p) + Var(k | x > p))
//! ```
//!
//! and keeps the strictly greatest gain. Ties go to the first candidate in
//! column-major, then row order. The scan is exhaustive: O(n²·C) per node.
//!
//! If no candidate has a positive gain (for example, every row is identical)
//! the node still splits on column 0 at pivot 0.0. That can send every row to
//! one side; the empty side is pruned to `None`.

use super::config::ReductionConfig;
use super::node::{ReductionNode, ReductionTree};
use crate::embedding::EmbeddingSet;
use crate::error::Result;
use tracing::{debug, debug_span, info, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A candidate split and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    /// Column tested.
    pub column: usize,
    /// Values `> pivot` go right.
    pub pivot: f64,
    /// Variance reduction.
    pub gain: f64,
}

impl Default for Split {
    fn default() -> Self {
        Self {
            column: 0,
            pivot: 0.0,
            gain: 0.0,
        }
    }
}

/// Builds [`ReductionTree`]s from embedding sets.
#[derive(Debug, Clone, Default)]
pub struct VarianceReduction {
    config: ReductionConfig,
}

impl VarianceReduction {
    /// Create a builder that grows `max_depth` split levels.
    pub fn new(max_depth: usize) -> Self {
        Self {
            config: ReductionConfig::new().with_max_depth(max_depth),
        }
    }

    /// Create a builder from a full configuration.
    pub fn with_config(config: ReductionConfig) -> Self {
        Self { config }
    }

    /// Set the evaluation gain cutoff stored on the built tree.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.config.cutoff = cutoff;
        self
    }

    /// Set the root label and the bit its right branch sets.
    pub fn with_seed(mut self, label: u64, depth: u32) -> Self {
        self.config.seed_label = label;
        self.config.seed_depth = depth;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Grow a tree over `embeddings`.
    ///
    /// An empty set produces an empty tree.
    ///
    /// # Errors
    ///
    /// Returns the error from [`ReductionConfig::validate`].
    pub fn build(&self, embeddings: EmbeddingSet) -> Result<ReductionTree> {
        self.config.validate()?;

        let _span = debug_span!(
            "variance_reduction",
            rows = embeddings.len(),
            columns = embeddings.columns(),
            max_depth = self.config.max_depth
        )
        .entered();

        let root = grow(
            embeddings,
            self.config.max_depth,
            self.config.seed_label,
            self.config.seed_depth,
        );
        let tree = ReductionTree {
            root,
            config: self.config.clone(),
        };

        info!(
            nodes = tree.len(),
            leaves = tree.leaves().len(),
            height = tree.height(),
            "variance reduction tree built"
        );
        Ok(tree)
    }
}

impl ReductionTree {
    /// Build a tree with the given configuration.
    ///
    /// Shorthand for `VarianceReduction::with_config(config).build(embeddings)`.
    pub fn build(embeddings: EmbeddingSet, config: ReductionConfig) -> Result<Self> {
        VarianceReduction::with_config(config).build(embeddings)
    }
}

fn grow(
    embeddings: EmbeddingSet,
    remaining: usize,
    label: u64,
    depth: u32,
) -> Option<ReductionNode> {
    if embeddings.is_empty() {
        trace!(depth, label, "no vectors reached branch");
        return None;
    }

    if remaining == 0 {
        return Some(ReductionNode::leaf(embeddings, label, depth));
    }

    let split = best_split(&embeddings);
    debug!(
        depth,
        label,
        rows = embeddings.len(),
        column = split.column,
        pivot = split.pivot,
        gain = split.gain,
        "split"
    );

    let (left, right) = embeddings.partition(split.column, split.pivot);
    let left = grow(left, remaining - 1, label, depth + 1);
    let right = grow(right, remaining - 1, label | (1u64 << depth), depth + 1);

    Some(ReductionNode {
        embeddings,
        label,
        depth,
        column: split.column,
        pivot: split.pivot,
        gain: split.gain,
        left: left.map(Box::new),
        right: right.map(Box::new),
    })
}

/// Best split over all columns of `embeddings`.
///
/// Returns `Split::default()` (column 0, pivot 0.0, gain 0.0) when no
/// candidate has a positive gain.
pub fn best_split(embeddings: &EmbeddingSet) -> Split {
    #[cfg(feature = "parallel")]
    let per_column: Vec<Split> = (0..embeddings.columns())
        .into_par_iter()
        .map(|k| best_split_in_column(embeddings, k))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_column: Vec<Split> = (0..embeddings.columns())
        .map(|k| best_split_in_column(embeddings, k))
        .collect();

    // Strict comparison in column order keeps the earliest column on ties.
    per_column
        .into_iter()
        .fold(Split::default(), |best, s| if s.gain > best.gain { s } else { best })
}

fn best_split_in_column(embeddings: &EmbeddingSet, column: usize) -> Split {
    let total = embeddings.variance(column);
    let mut best = Split {
        column,
        pivot: 0.0,
        gain: 0.0,
    };

    for &pivot in embeddings.features().column(column) {
        let (left, right) = embeddings.pivot_variance(column, pivot);
        let gain = total - (left + right);
        if gain > best.gain {
            best = Split { column, pivot, gain };
        }
    }
    best
}
