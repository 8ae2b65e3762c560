//! Flat per-vector table of decision-leaf assignments.

use crate::reduction::ReductionTree;
use core::fmt;

/// One vector at a decision leaf.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafRow {
    /// Ground-truth label.
    pub label: String,
    /// Cluster label of the decision leaf.
    pub cluster: u64,
    /// Provenance tag of the vector.
    pub source: usize,
    /// Raw feature values.
    pub features: Vec<f64>,
}

/// All decision-leaf rows of a tree, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafTable {
    columns: usize,
    rows: Vec<LeafRow>,
}

impl LeafTable {
    /// Column headers: `label`, `cluster`, then one per feature index.
    pub fn headers(&self) -> Vec<String> {
        ["label".to_string(), "cluster".to_string()]
            .into_iter()
            .chain((0..self.columns).map(|i| i.to_string()))
            .collect()
    }

    /// Rows in leaf order.
    pub fn rows(&self) -> &[LeafRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a markdown pipe table.
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

/// Markdown rendering; features use six decimals.
impl fmt::Display for LeafTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.headers();
        writeln!(f, "| {} |", headers.join(" | "))?;
        writeln!(f, "|{}", " --- |".repeat(headers.len()))?;
        for row in &self.rows {
            write!(f, "| {} | {} |", row.label, row.cluster)?;
            for value in &row.features {
                write!(f, " {value:.6} |")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl ReductionTree {
    /// Table of every vector at a decision leaf for `cutoff`.
    pub fn leaf_table(&self, cutoff: f64) -> LeafTable {
        let columns = self.embeddings().map_or(0, |e| e.columns());
        let rows = self
            .decision_leaves(cutoff)
            .into_iter()
            .flat_map(|node| {
                node.embeddings().iter().map(move |e| LeafRow {
                    label: e.label.to_string(),
                    cluster: node.label(),
                    source: e.source,
                    features: e.features.to_vec(),
                })
            })
            .collect();
        LeafTable { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use crate::embedding::{Embedding, EmbeddingSet};
    use crate::reduction::VarianceReduction;

    #[test]
    fn test_leaf_table_rows_and_markdown() {
        let records = vec![
            Embedding::new("b", 0, vec![10.0, 1.0]),
            Embedding::new("a", 1, vec![0.0, 2.0]),
            Embedding::new("b", 2, vec![10.0, 3.0]),
            Embedding::new("a", 3, vec![0.0, 4.0]),
        ];
        let set = EmbeddingSet::from_records(records).unwrap();
        let tree = VarianceReduction::new(1).build(set).unwrap();
        let table = tree.leaf_table(0.0);

        assert_eq!(table.headers(), ["label", "cluster", "0", "1"]);
        assert_eq!(table.len(), 4);

        let clusters: Vec<u64> = table.rows().iter().map(|r| r.cluster).collect();
        let sources: Vec<usize> = table.rows().iter().map(|r| r.source).collect();
        assert_eq!(clusters, vec![0, 0, 1, 1]);
        assert_eq!(sources, vec![1, 3, 0, 2]);

        let md = table.to_markdown();
        let mut lines = md.lines();
        assert_eq!(lines.next(), Some("| label | cluster | 0 | 1 |"));
        assert_eq!(lines.next(), Some("| --- | --- | --- | --- |"));
        assert_eq!(lines.next(), Some("| a | 0 | 0.000000 | 2.000000 |"));
        assert_eq!(md.lines().count(), 6);
    }

    #[test]
    fn test_leaf_table_respects_cutoff() {
        let records = (0..4)
            .map(|i| Embedding::new("x", i, vec![if i < 2 { 0.0 } else { 10.0 }]))
            .collect();
        let tree = VarianceReduction::new(1)
            .build(EmbeddingSet::new(1, records).unwrap())
            .unwrap();
        let table = tree.leaf_table(100.0);
        assert!(table.rows().iter().all(|r| r.cluster == 0));
        assert_eq!(table.len(), 4);
    }
}
