//! Mislabel counting through greedy label → cluster matching.
//!
//! Cluster labels produced by a tree have no built-in correspondence with
//! ground-truth classes. We build one from the contingency counts
//! `counts[class][cluster]` of the decision leaves:
//!
//! 1. list every `(class, cluster, count)` triple, largest count first;
//! 2. walk the list, pairing a class with a cluster whenever both are free.
//!
//! Every vector whose class is unpaired, or paired with a cluster other than
//! its own, is mislabeled. The greedy pairing approximates a maximum-weight
//! bipartite matching; it is not guaranteed optimal.
//!
//! # Tie-break
//!
//! Triples with equal counts keep the order of the contingency table, which
//! is ordered by class name, then by ascending cluster label. Results are
//! therefore reproducible for a given tree and cutoff.

use crate::reduction::ReductionTree;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// One-to-one pairing of ground-truth labels with cluster labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelMatching {
    pairs: BTreeMap<String, u64>,
}

impl LabelMatching {
    /// Cluster paired with `label`, if any.
    pub fn get(&self, label: &str) -> Option<u64> {
        self.pairs.get(label).copied()
    }

    /// Number of paired labels.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no label was paired.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs ordered by ground-truth label.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.pairs.iter().map(|(l, &c)| (l.as_str(), c))
    }
}

type Contingency = BTreeMap<String, BTreeMap<u64, usize>>;

impl ReductionTree {
    /// Count vectors per (ground-truth label, cluster label) over the decision leaves.
    fn contingency(&self, cutoff: f64) -> Contingency {
        let mut counts = Contingency::new();
        for node in self.decision_leaves(cutoff) {
            for label in node.embeddings().labels() {
                *counts
                    .entry(label.clone())
                    .or_default()
                    .entry(node.label())
                    .or_insert(0) += 1;
            }
        }
        counts
    }

    /// Greedy pairing of ground-truth labels with clusters at `cutoff`.
    pub fn label_matching(&self, cutoff: f64) -> LabelMatching {
        let counts = self.contingency(cutoff);

        let mut triples: Vec<(&str, u64, usize)> = counts
            .iter()
            .flat_map(|(label, row)| row.iter().map(move |(&c, &n)| (label.as_str(), c, n)))
            .collect();
        // Stable: equal counts keep contingency order.
        triples.sort_by(|a, b| b.2.cmp(&a.2));

        let mut pairs: BTreeMap<String, u64> = BTreeMap::new();
        let mut used: HashSet<u64> = HashSet::new();
        for (label, cluster, _) in triples {
            if pairs.contains_key(label) || used.contains(&cluster) {
                continue;
            }
            pairs.insert(label.to_string(), cluster);
            used.insert(cluster);
        }

        LabelMatching { pairs }
    }

    /// Number of vectors whose cluster disagrees with their matched label.
    ///
    /// A node is a decision leaf when it has no children or its gain is below
    /// `cutoff`. The result is in `[0, n]`.
    ///
    /// The root is a candidate too. A depth-0 tree, or one whose root gain is
    /// below `cutoff`, scores every vector as a single cluster rather than
    /// reporting zero.
    pub fn mislabeled(&self, cutoff: f64) -> usize {
        let matching = self.label_matching(cutoff);

        let mislabeled: usize = self
            .decision_leaves(cutoff)
            .into_iter()
            .map(|node| {
                node.embeddings()
                    .labels()
                    .iter()
                    .filter(|l| matching.get(l) != Some(node.label()))
                    .count()
            })
            .sum();

        debug!(cutoff, matched = matching.len(), mislabeled, "mislabel count");
        mislabeled
    }
}

#[cfg(test)]
mod tests {
    use crate::embedding::{Embedding, EmbeddingSet};
    use crate::reduction::{ReductionTree, VarianceReduction};

    fn tree(values: &[f64], labels: &[&str], depth: usize) -> ReductionTree {
        let records = values
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (&v, &l))| Embedding::new(l, i, vec![v]))
            .collect();
        let set = EmbeddingSet::new(1, records).unwrap();
        VarianceReduction::new(depth).build(set).unwrap()
    }

    #[test]
    fn test_perfect_split_has_no_mislabels() {
        let t = tree(&[0.0, 0.0, 10.0, 10.0], &["a", "a", "b", "b"], 1);
        assert_eq!(t.mislabeled(0.0), 0);

        let m = t.label_matching(0.0);
        assert_eq!(m.get("a"), Some(0));
        assert_eq!(m.get("b"), Some(1));
    }

    #[test]
    fn test_cutoff_above_gain_collapses_to_root() {
        // Root gain is 25; a cutoff of 30 makes the root a decision leaf,
        // so both classes compete for cluster 0.
        let t = tree(&[0.0, 0.0, 10.0, 10.0], &["a", "a", "b", "b"], 1);
        assert_eq!(t.decision_leaves(30.0).len(), 1);
        assert_eq!(t.mislabeled(30.0), 2);
    }

    #[test]
    fn test_tie_break_is_lexicographic() {
        // Everything lands in one cluster with equal counts for "a" and "b":
        // "a" comes first in the table and wins the cluster.
        let t = tree(&[1.0, 1.0, 1.0, 1.0], &["b", "a", "b", "a"], 0);
        let m = t.label_matching(0.0);
        assert_eq!(m.get("a"), Some(0));
        assert_eq!(m.get("b"), None);
        assert_eq!(t.mislabeled(0.0), 2);
    }

    #[test]
    fn test_mixed_leaf_counts_minority() {
        let t = tree(
            &[0.0, 0.1, 0.2, 9.8, 9.9, 10.0],
            &["a", "a", "b", "b", "b", "b"],
            1,
        );
        // Left leaf {a, a, b}, right leaf {b, b, b}: b takes the right
        // cluster (count 3), a takes the left (count 2), the stray b is wrong.
        assert_eq!(t.mislabeled(0.0), 1);
    }

    #[test]
    fn test_more_labels_than_clusters() {
        let t = tree(&[0.0, 0.0, 5.0, 5.0, 5.0], &["a", "a", "b", "c", "c"], 1);
        // Two clusters, three classes: one class must go unmatched.
        let m = t.label_matching(0.0);
        assert_eq!(m.len(), 2);
        assert_eq!(t.mislabeled(0.0), 1);
    }

    #[test]
    fn test_leaf_root_is_scored() {
        let t = tree(&[0.0, 10.0], &["a", "b"], 0);
        assert_eq!(t.decision_leaves(0.0).len(), 1);
        assert_eq!(t.mislabeled(0.0), 1);
        assert_eq!(t.leaf_table(0.0).len(), 2);
    }

    #[test]
    fn test_empty_tree() {
        let set = EmbeddingSet::new(1, vec![]).unwrap();
        let t = VarianceReduction::new(2).build(set).unwrap();
        assert!(t.label_matching(0.0).is_empty());
        assert_eq!(t.mislabeled(0.0), 0);
    }
}
