//! Tree validation and health checking.
//!
//! A built [`ReductionTree`] should satisfy, at every internal node:
//! - its children's subsets add up to its own (no vector lost or duplicated)
//! - every subset keeps the root's column count
//! - a child's depth is its parent's depth + 1, and its label is the parent's
//!   label with the parent's depth bit cleared (left) or set (right)
//!
//! and, across the tree, leaf labels are distinct.
//!
//! # Example
//!
//! ```rust
//! use vartree::{Embedding, EmbeddingSet, HealthCheck, VarianceReduction};
//!
//! let records = (0..8)
//!     .map(|i| Embedding::new(if i < 4 { "a" } else { "b" }, i, vec![i as f64]))
//!     .collect();
//! let tree = VarianceReduction::new(2)
//!     .build(EmbeddingSet::from_records(records).unwrap())
//!     .unwrap();
//!
//! let report = tree.health_check();
//! assert!(report.is_healthy(), "{}", report);
//! ```

use std::collections::{HashMap, HashSet};

use crate::reduction::{ReductionNode, ReductionTree};

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational, not a problem.
    Info,
    /// Something unusual but not necessarily wrong.
    Warning,
    /// A problem that should be fixed.
    Error,
    /// A critical issue: the tree does not describe a partition.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single validation issue found during health check.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Cluster label of the node involved, if any.
    pub node_label: Option<u64>,
    /// Optional additional context.
    pub context: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            node_label: None,
            context: None,
        }
    }

    /// Attach the node this issue concerns.
    pub fn with_node(mut self, node: &ReductionNode) -> Self {
        self.node_label = Some(node.label());
        self.context = Some(format!("depth {}", node.depth()));
        self
    }

    /// Add context to this issue.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let Some(label) = self.node_label {
            write!(f, " (node label {:#b})", label)?;
        }
        if let Some(ctx) = &self.context {
            write!(f, " - {}", ctx)?;
        }
        Ok(())
    }
}

/// Report from a validation/health check.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// All issues found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Add an info-level issue.
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(ValidationIssue::new(Severity::Info, message));
    }

    /// Check if the report contains no errors or critical issues.
    pub fn is_healthy(&self) -> bool {
        !self.issues.iter().any(|i| i.severity >= Severity::Error)
    }

    /// Check if there are any issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Count issues by severity.
    pub fn counts(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity).or_default() += 1;
        }
        counts
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "Validation passed: no issues found");
        }

        let counts = self.counts();
        write!(f, "Validation report: ")?;

        let parts: Vec<String> = [
            (Severity::Critical, "critical"),
            (Severity::Error, "errors"),
            (Severity::Warning, "warnings"),
            (Severity::Info, "info"),
        ]
        .iter()
        .filter_map(|(sev, name)| counts.get(sev).map(|c| format!("{} {}", c, name)))
        .collect();

        writeln!(f, "{}", parts.join(", "))?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// Health report with tree statistics.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Validation issues.
    pub validation: ValidationReport,
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of structural leaves.
    pub leaf_count: usize,
    /// Number of branches pruned because no vector reached them.
    pub pruned_count: usize,
    /// Longest root-to-leaf path, in splits.
    pub height: usize,
}

impl HealthReport {
    /// Check if the tree is healthy (no errors or critical issues).
    pub fn is_healthy(&self) -> bool {
        self.validation.is_healthy()
    }
}

impl std::fmt::Display for HealthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tree Health Report")?;
        writeln!(f, "==================")?;
        writeln!(
            f,
            "Nodes: {} ({} leaves, {} pruned branches)",
            self.node_count, self.leaf_count, self.pruned_count
        )?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f)?;
        write!(f, "{}", self.validation)
    }
}

/// Trait for types that can be health-checked.
pub trait HealthCheck {
    /// Perform a health check and return a report.
    fn health_check(&self) -> HealthReport;
}

impl HealthCheck for ReductionTree {
    fn health_check(&self) -> HealthReport {
        let mut validation = ValidationReport::new();
        let nodes = self.nodes();
        let columns = self.embeddings().map(|e| e.columns());
        let mut pruned_count = 0;

        if nodes.is_empty() {
            validation.info("empty tree");
        }

        for node in &nodes {
            if Some(node.embeddings().columns()) != columns {
                validation.add(
                    ValidationIssue::new(Severity::Critical, "column count differs from root")
                        .with_node(node),
                );
            }
            if node.is_leaf() {
                continue;
            }

            let child_rows: usize = node.children().map(|c| c.embeddings().len()).sum();
            if child_rows != node.embeddings().len() {
                validation.add(
                    ValidationIssue::new(Severity::Critical, "children do not partition parent")
                        .with_node(node)
                        .with_context(format!(
                            "parent has {} rows, children {}",
                            node.embeddings().len(),
                            child_rows
                        )),
                );
            }

            let bit = 1u64 << node.depth();
            for (child, expected) in [
                (node.left(), node.label() & !bit),
                (node.right(), node.label() | bit),
            ] {
                let Some(child) = child else {
                    pruned_count += 1;
                    continue;
                };
                if child.depth() != node.depth() + 1 {
                    validation.add(
                        ValidationIssue::new(Severity::Error, "child depth is not parent depth + 1")
                            .with_node(child),
                    );
                }
                if child.label() != expected {
                    validation.add(
                        ValidationIssue::new(
                            Severity::Error,
                            "child label does not extend parent path",
                        )
                        .with_node(child)
                        .with_context(format!("expected {expected:#b}")),
                    );
                }
            }

            if node.gain() < 0.0 {
                validation.add(
                    ValidationIssue::new(Severity::Warning, "negative variance reduction")
                        .with_node(node),
                );
            }
        }

        let leaves = self.leaves();
        let mut seen = HashSet::new();
        for leaf in &leaves {
            if !seen.insert(leaf.label()) {
                validation.add(
                    ValidationIssue::new(Severity::Error, "duplicate leaf label").with_node(leaf),
                );
            }
        }

        if pruned_count > 0 {
            validation.info(format!("{pruned_count} branches received no vectors"));
        }

        HealthReport {
            validation,
            node_count: nodes.len(),
            leaf_count: leaves.len(),
            pruned_count,
            height: self.height(),
        }
    }
}
