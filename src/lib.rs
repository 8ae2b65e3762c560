//! # vartree
//!
//! Variance-reduction trees for interpreting embeddings.
//!
//! Given labeled feature vectors (for example, the hidden layer of a trained
//! network), `vartree` greedily splits them on the column and threshold that
//! most reduce within-group variance, assigns each vector a bit-encoded
//! cluster label from its path, and scores that clustering against the
//! ground-truth labels.
//!
//! ```text
//! records → EmbeddingSet → VarianceReduction → ReductionTree
//!                                                 ├─ mislabeled / label_matching
//!                                                 ├─ pseudocode / leaf_table / report
//!                                                 └─ health_check
//! EmbeddingSet → consistency (nearest-neighbor, no tree)
//! ```
//!
//! Enable the `parallel` feature to scan columns on rayon, and `serde` to
//! serialize configs, records, and report rows.

pub mod embedding;
/// Error types used across `vartree`.
pub mod error;
pub mod evaluate;
pub mod reduction;
pub mod report;
pub mod validate;

pub use embedding::{Embedding, EmbeddingRef, EmbeddingSet};
pub use error::{Error, Result};
pub use evaluate::LabelMatching;
pub use reduction::{
    best_split, ReductionConfig, ReductionNode, ReductionTree, Split, VarianceReduction,
};
pub use report::{LeafRow, LeafTable, Pseudocode, Report};
pub use validate::{HealthCheck, HealthReport, Severity, ValidationIssue, ValidationReport};
