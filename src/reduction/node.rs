//! Tree nodes and the tree handle returned by a build.

use super::config::ReductionConfig;
use crate::embedding::EmbeddingSet;

/// One node of a variance-reduction tree.
///
/// Every node owns the subset of vectors that reached it. Internal nodes also
/// record the split applied to that subset; a child is `None` when no vector
/// reached that branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionNode {
    pub(crate) embeddings: EmbeddingSet,
    pub(crate) label: u64,
    pub(crate) depth: u32,
    pub(crate) column: usize,
    pub(crate) pivot: f64,
    pub(crate) gain: f64,
    pub(crate) left: Option<Box<ReductionNode>>,
    pub(crate) right: Option<Box<ReductionNode>>,
}

impl ReductionNode {
    /// Create a childless node.
    pub(crate) fn leaf(embeddings: EmbeddingSet, label: u64, depth: u32) -> Self {
        Self {
            embeddings,
            label,
            depth,
            column: 0,
            pivot: 0.0,
            gain: 0.0,
            left: None,
            right: None,
        }
    }

    /// Vectors that reached this node.
    pub fn embeddings(&self) -> &EmbeddingSet {
        &self.embeddings
    }

    /// Cluster label: the bit-encoded path from the root.
    pub fn label(&self) -> u64 {
        self.label
    }

    /// Bit position this node's right branch sets.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Split column (0 at leaves).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Split pivot: values `> pivot` go right (0 at leaves).
    pub fn pivot(&self) -> f64 {
        self.pivot
    }

    /// Variance reduction achieved by the split (0 at leaves).
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Left (`≤ pivot`) child.
    pub fn left(&self) -> Option<&ReductionNode> {
        self.left.as_deref()
    }

    /// Right (`> pivot`) child.
    pub fn right(&self) -> Option<&ReductionNode> {
        self.right.as_deref()
    }

    /// Iterate over the children that exist, left first.
    pub fn children(&self) -> impl Iterator<Item = &ReductionNode> {
        self.left().into_iter().chain(self.right())
    }

    /// Check if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// A node below which evaluation applies no further split.
    pub fn is_decision_leaf(&self, cutoff: f64) -> bool {
        self.is_leaf() || self.gain < cutoff
    }
}

/// A built variance-reduction tree.
///
/// The root is `None` only when the tree was built from an empty set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionTree {
    pub(crate) root: Option<ReductionNode>,
    pub(crate) config: ReductionConfig,
}

impl ReductionTree {
    /// Root node, if any vector was supplied.
    pub fn root(&self) -> Option<&ReductionNode> {
        self.root.as_ref()
    }

    /// Configuration used to build the tree.
    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Check if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The full input set (the root's subset).
    pub fn embeddings(&self) -> Option<&EmbeddingSet> {
        self.root().map(ReductionNode::embeddings)
    }

    /// All nodes in pre-order, left before right.
    pub fn nodes(&self) -> Vec<&ReductionNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&ReductionNode> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.right());
            stack.extend(node.left());
        }
        out
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    /// Structural leaves, left to right.
    pub fn leaves(&self) -> Vec<&ReductionNode> {
        self.nodes().into_iter().filter(|n| n.is_leaf()).collect()
    }

    /// Nodes where evaluation stops at `cutoff`, left to right.
    ///
    /// Every vector of the input appears in exactly one of them.
    pub fn decision_leaves(&self, cutoff: f64) -> Vec<&ReductionNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&ReductionNode> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            if node.is_decision_leaf(cutoff) {
                out.push(node);
                continue;
            }
            stack.extend(node.right());
            stack.extend(node.left());
        }
        out
    }

    /// Greatest number of split levels on any root-to-leaf path.
    pub fn height(&self) -> usize {
        fn walk(node: &ReductionNode) -> usize {
            node.children().map(|c| 1 + walk(c)).max().unwrap_or(0)
        }
        self.root().map(walk).unwrap_or(0)
    }
}
