//! Nested-conditional rendering of a tree.
//!
//! ```text
//! // variance reduction: 25.000000
//! if feature[0] > 0.000000 {
//!  label := 1
//! } else {
//!  label := 0
//! }
//! ```
//!
//! Branches whose child has further splits nest one space deeper; branches
//! ending in a leaf (or pruned) become a direct label assignment.

use crate::reduction::{ReductionNode, ReductionTree};
use core::fmt;

/// Display adapter rendering a tree as pseudocode.
#[derive(Debug, Clone, Copy)]
pub struct Pseudocode<'a> {
    tree: &'a ReductionTree,
}

impl<'a> Pseudocode<'a> {
    /// Wrap a tree.
    pub fn new(tree: &'a ReductionTree) -> Self {
        Self { tree }
    }
}

impl fmt::Display for Pseudocode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree.root() {
            None => Ok(()),
            Some(root) if root.is_leaf() => write!(f, "label := {}", root.label()),
            Some(root) => write_node(f, root, 0),
        }
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &ReductionNode, indent: usize) -> fmt::Result {
    let pad = " ".repeat(indent);
    writeln!(f, "{pad}// variance reduction: {:.6}", node.gain())?;
    writeln!(f, "{pad}if feature[{}] > {:.6} {{", node.column(), node.pivot())?;

    match node.right().filter(|c| !c.is_leaf()) {
        Some(child) => {
            write_node(f, child, indent + 1)?;
            writeln!(f)?;
        }
        None => writeln!(f, "{pad} label := {}", node.label() | (1u64 << node.depth()))?,
    }

    writeln!(f, "{pad}}} else {{")?;

    match node.left().filter(|c| !c.is_leaf()) {
        Some(child) => {
            write_node(f, child, indent + 1)?;
            writeln!(f)?;
        }
        None => writeln!(f, "{pad} label := {}", node.label())?,
    }

    write!(f, "{pad}}}")
}

impl ReductionTree {
    /// Render the tree as nested conditional pseudocode.
    pub fn pseudocode(&self) -> String {
        Pseudocode::new(self).to_string()
    }
}

impl fmt::Display for ReductionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Pseudocode::new(self), f)
    }
}

#[cfg(test)]
mod tests {
    use crate::embedding::{Embedding, EmbeddingSet};
    use crate::reduction::{ReductionTree, VarianceReduction};

    fn tree(values: &[f64], depth: usize) -> ReductionTree {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Embedding::new("x", i, vec![v]))
            .collect();
        VarianceReduction::new(depth)
            .build(EmbeddingSet::new(1, records).unwrap())
            .unwrap()
    }

    #[test]
    fn test_single_split() {
        let t = tree(&[0.0, 0.0, 10.0, 10.0], 1);
        let expected = "\
// variance reduction: 25.000000
if feature[0] > 0.000000 {
 label := 1
} else {
 label := 0
}";
        assert_eq!(t.pseudocode(), expected);
        assert_eq!(t.to_string(), expected);
    }

    #[test]
    fn test_nested_split() {
        let t = tree(&[0.0, 1.0, 10.0, 11.0, 100.0, 101.0, 110.0, 111.0], 2);
        let code = t.pseudocode();

        assert!(code.starts_with("// variance reduction:"));
        assert!(code.contains("if feature[0] > 11.000000 {"));
        assert!(code.contains(" if feature[0] > 101.000000 {"));
        assert!(code.contains(" if feature[0] > 1.000000 {"));
        for label in 0..4 {
            assert!(code.contains(&format!("  label := {label}\n")), "{code}");
        }
        assert_eq!(code.matches('{').count(), code.matches('}').count());
    }

    #[test]
    fn test_leaf_root_and_empty() {
        assert_eq!(tree(&[1.0, 2.0], 0).pseudocode(), "label := 0");

        let empty = VarianceReduction::new(2)
            .build(EmbeddingSet::new(1, vec![]).unwrap())
            .unwrap();
        assert_eq!(empty.pseudocode(), "");
    }

    #[test]
    fn test_pruned_branch_renders_label() {
        // Identical rows: everything goes right, left is pruned but still
        // gets its label in the pseudocode.
        let t = tree(&[3.0, 3.0], 1);
        assert!(t.root().unwrap().left().is_none());
        assert!(t.pseudocode().contains("} else {\n label := 0\n}"));
    }
}
