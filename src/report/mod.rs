//! Human-readable output for built trees.
//!
//! - [`Pseudocode`]: the tree as nested `if feature[k] > p` blocks.
//! - [`LeafTable`]: one row per vector at a decision leaf.
//! - [`Report`]: both of the above plus the agreement counts, as markdown.
//!
//! Everything renders to strings; writing them anywhere is left to the caller.

mod pseudocode;
mod table;

pub use pseudocode::Pseudocode;
pub use table::{LeafRow, LeafTable};

use crate::reduction::ReductionTree;
use core::fmt;

/// Markdown summary of a tree and its agreement with ground truth.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    tree: &'a ReductionTree,
    cutoff: f64,
}

impl<'a> Report<'a> {
    /// Report on `tree` using the cutoff it was configured with.
    pub fn new(tree: &'a ReductionTree) -> Self {
        Self {
            tree,
            cutoff: tree.config().cutoff,
        }
    }

    /// Override the evaluation cutoff.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Render the report.
    pub fn markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.tree.embeddings().map_or(0, |e| e.len());
        let consistency = self.tree.embeddings().map_or(0, |e| e.consistency());

        writeln!(f, "# Decision tree")?;
        writeln!(f, "```text")?;
        writeln!(f, "{}", self.tree.pseudocode())?;
        writeln!(f, "```")?;
        writeln!(f)?;

        writeln!(f, "# Leaf assignments")?;
        write!(f, "{}", self.tree.leaf_table(self.cutoff))?;
        writeln!(f)?;

        writeln!(f, "# Agreement")?;
        writeln!(
            f,
            "- mislabeled (cutoff {}): {} / {}",
            self.cutoff,
            self.tree.mislabeled(self.cutoff),
            n
        )?;
        writeln!(f, "- nearest-neighbor mismatches: {consistency} / {n}")
    }
}

impl ReductionTree {
    /// Markdown report at the configured cutoff.
    pub fn report(&self) -> Report<'_> {
        Report::new(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::embedding::{Embedding, EmbeddingSet};
    use crate::reduction::{ReductionConfig, ReductionTree};

    #[test]
    fn test_report_sections() {
        let records = vec![
            Embedding::new("a", 0, vec![0.0, 1.0]),
            Embedding::new("a", 1, vec![0.0, 1.1]),
            Embedding::new("b", 2, vec![10.0, 0.0]),
            Embedding::new("b", 3, vec![10.0, 0.1]),
        ];
        let set = EmbeddingSet::from_records(records).unwrap();
        let tree = ReductionTree::build(set, ReductionConfig::new().with_max_depth(1)).unwrap();
        let md = tree.report().markdown();

        assert!(md.starts_with("# Decision tree\n```text\n// variance reduction:"));
        assert!(md.contains("# Leaf assignments\n| label | cluster | 0 | 1 |"));
        assert!(md.contains("- mislabeled (cutoff 0): 0 / 4"));
        assert!(md.contains("- nearest-neighbor mismatches: 0 / 4"));
    }

    #[test]
    fn test_report_cutoff_override() {
        let records = (0..4)
            .map(|i| {
                let label = if i < 2 { "a" } else { "b" };
                Embedding::new(label, i, vec![(i / 2) as f64 * 10.0])
            })
            .collect();
        let tree = ReductionTree::build(
            EmbeddingSet::new(1, records).unwrap(),
            ReductionConfig::new().with_max_depth(1),
        )
        .unwrap();
        let md = tree.report().with_cutoff(50.0).markdown();
        assert!(md.contains("- mislabeled (cutoff 50): 2 / 4"));
    }
}
