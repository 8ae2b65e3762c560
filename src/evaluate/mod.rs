//! Agreement diagnostics between embeddings, trees, and ground truth.
//!
//! Two independent measures, each reported as a count of disagreeing
//! vectors (0 is best):
//!
//! | Measure | Needs tree | Question answered |
//! |---------|------------|-------------------|
//! | [`ReductionTree::mislabeled`] | yes | Do tree clusters line up with classes? |
//! | [`EmbeddingSet::consistency`] | no | Is each vector's nearest neighbor in its class? |
//!
//! The first scores the axis-aligned structure the tree found; the second
//! scores the angular structure of the embedding itself. An embedding can do
//! well on one and badly on the other.
//!
//! [`ReductionTree::mislabeled`]: crate::ReductionTree::mislabeled
//! [`EmbeddingSet::consistency`]: crate::EmbeddingSet::consistency

mod consistency;
mod mislabel;

pub use mislabel::LabelMatching;
