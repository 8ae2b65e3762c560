//! Variance-reduction trees.
//!
//! # The Idea
//!
//! Take a set of embedding vectors with no cluster structure imposed on them.
//! Find the single column and threshold that most reduces the total
//! within-group variance when the set is cut in two, then repeat inside each
//! half. The result is a binary tree whose root-to-leaf paths act as cluster
//! identifiers:
//!
//! ```text
//! depth 0:            [all rows]            label 0b00
//!                    /          \
//! depth 1:   x[k] ≤ p           x[k] > p     sets bit 0
//!              /    \            /    \
//! depth 2:  0b00   0b10       0b01   0b11    sets bit 1
//! ```
//!
//! Reading the labels of the leaves back against ground-truth classes tells
//! you whether the embedding places classes along a few axis-aligned
//! directions.
//!
//! # Usage
//!
//! ```rust
//! use vartree::{Embedding, EmbeddingSet, VarianceReduction};
//!
//! let records = vec![
//!     Embedding::new("a", 0, vec![0.0]),
//!     Embedding::new("a", 1, vec![0.0]),
//!     Embedding::new("b", 2, vec![10.0]),
//!     Embedding::new("b", 3, vec![10.0]),
//! ];
//! let set = EmbeddingSet::from_records(records).unwrap();
//! let tree = VarianceReduction::new(1).build(set).unwrap();
//!
//! let root = tree.root().unwrap();
//! assert_eq!((root.column(), root.pivot()), (0, 0.0));
//! assert_eq!(tree.mislabeled(0.0), 0);
//! ```

mod builder;
mod config;
mod node;

pub use builder::{best_split, Split, VarianceReduction};
pub use config::{ReductionConfig, LABEL_BITS};
pub use node::{ReductionNode, ReductionTree};
