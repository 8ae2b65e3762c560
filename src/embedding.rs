//! Labeled embedding sets and their per-column variance primitives.
//!
//! An [`EmbeddingSet`] is the unit every split works on: a fixed-width matrix
//! of feature vectors (one row per vector) paired with a ground-truth label and
//! a provenance tag per row.
//!
//! # Variance
//!
//! All variances are **population** variances of a single column:
//!
//! ```text
//! Var(k) = (1/n) Σᵢ (xᵢₖ - μₖ)²
//! ```
//!
//! A pivot `p` on column `k` splits the rows into `left = {x : xₖ ≤ p}` and
//! `right = {x : xₖ > p}`; each side's variance uses that side's own mean.
//! Empty groups have variance 0 rather than NaN.

use crate::error::{Error, Result};
use indexmap::IndexSet;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// A single feature vector with its ground-truth label and provenance tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Embedding {
    /// Ground-truth label.
    pub label: String,
    /// Index of the record this vector was produced from.
    pub source: usize,
    /// Feature values.
    pub features: Vec<f64>,
}

impl Embedding {
    /// Create a new embedding record.
    pub fn new(label: impl Into<String>, source: usize, features: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            source,
            features,
        }
    }
}

/// Borrowed view of one row of an [`EmbeddingSet`].
#[derive(Debug, Clone, Copy)]
pub struct EmbeddingRef<'a> {
    /// Ground-truth label.
    pub label: &'a str,
    /// Provenance tag.
    pub source: usize,
    /// Feature values.
    pub features: ArrayView1<'a, f64>,
}

/// An ordered collection of fixed-width feature vectors with labels.
///
/// The column count is fixed at construction and carried by every subset
/// produced from the set, including empty ones.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSet {
    features: Array2<f64>,
    labels: Vec<String>,
    sources: Vec<usize>,
}

impl EmbeddingSet {
    /// Build a set with an explicit column count.
    ///
    /// An empty `records` list yields a valid, empty set.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `columns == 0`.
    /// - [`Error::DimensionMismatch`] if any record has a different length.
    pub fn new(columns: usize, records: Vec<Embedding>) -> Result<Self> {
        if columns == 0 {
            return Err(Error::InvalidParameter {
                name: "columns",
                message: "must be at least 1",
            });
        }

        let n = records.len();
        let mut flat = Vec::with_capacity(n * columns);
        let mut labels = Vec::with_capacity(n);
        let mut sources = Vec::with_capacity(n);

        for (index, record) in records.into_iter().enumerate() {
            if record.features.len() != columns {
                return Err(Error::DimensionMismatch {
                    expected: columns,
                    found: record.features.len(),
                    index,
                });
            }
            flat.extend(record.features);
            labels.push(record.label);
            sources.push(record.source);
        }

        let features =
            Array2::from_shape_vec((n, columns), flat).map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            features,
            labels,
            sources,
        })
    }

    /// Build a set, taking the column count from the first record.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] when `records` is empty, otherwise as [`EmbeddingSet::new`].
    pub fn from_records(records: Vec<Embedding>) -> Result<Self> {
        let columns = records
            .first()
            .map(|r| r.features.len())
            .ok_or(Error::EmptyInput)?;
        Self::new(columns, records)
    }

    /// Number of vectors.
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    /// Check if the set holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column count shared by every vector.
    pub fn columns(&self) -> usize {
        self.features.ncols()
    }

    /// Raw feature matrix (rows = vectors), e.g. for projection or plotting.
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Ground-truth labels in row order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Row `i`, if present.
    pub fn get(&self, i: usize) -> Option<EmbeddingRef<'_>> {
        if i >= self.len() {
            return None;
        }
        Some(EmbeddingRef {
            label: &self.labels[i],
            source: self.sources[i],
            features: self.features.row(i),
        })
    }

    /// Iterate over rows in order.
    pub fn iter(&self) -> impl Iterator<Item = EmbeddingRef<'_>> {
        self.features
            .outer_iter()
            .zip(self.labels.iter())
            .zip(self.sources.iter())
            .map(|((features, label), &source)| EmbeddingRef {
                label,
                source,
                features,
            })
    }

    /// Copy the rows back out as owned records.
    pub fn to_records(&self) -> Vec<Embedding> {
        self.iter()
            .map(|e| Embedding::new(e.label, e.source, e.features.to_vec()))
            .collect()
    }

    /// Distinct ground-truth labels in first-appearance order.
    ///
    /// The position of a label in the returned set is its category index.
    pub fn categories(&self) -> IndexSet<&str> {
        self.labels.iter().map(String::as_str).collect()
    }

    /// Population variance of `column`; 0 for an empty set.
    ///
    /// # Panics
    ///
    /// If `column >= self.columns()`.
    pub fn variance(&self, column: usize) -> f64 {
        let values = self.features.column(column);
        let n = values.len();
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        let mean = values.iter().sum::<f64>() / n;
        values
            .iter()
            .map(|&v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / n
    }

    /// Variances of the `≤ pivot` and `> pivot` groups of `column`.
    ///
    /// Returns `(left, right)`. Each side uses its own mean; an empty side is 0.
    ///
    /// # Panics
    ///
    /// If `column >= self.columns()`.
    pub fn pivot_variance(&self, column: usize, pivot: f64) -> (f64, f64) {
        let values = self.features.column(column);

        let (mut n_left, mut n_right) = (0usize, 0usize);
        let (mut sum_left, mut sum_right) = (0.0, 0.0);
        for &v in values.iter() {
            if v > pivot {
                n_right += 1;
                sum_right += v;
            } else {
                n_left += 1;
                sum_left += v;
            }
        }

        let mean_left = if n_left > 0 { sum_left / n_left as f64 } else { 0.0 };
        let mean_right = if n_right > 0 { sum_right / n_right as f64 } else { 0.0 };

        let (mut left, mut right) = (0.0, 0.0);
        for &v in values.iter() {
            if v > pivot {
                let d = v - mean_right;
                right += d * d;
            } else {
                let d = v - mean_left;
                left += d * d;
            }
        }

        if n_left > 0 {
            left /= n_left as f64;
        }
        if n_right > 0 {
            right /= n_right as f64;
        }
        (left, right)
    }

    /// Split into `(≤ pivot, > pivot)` subsets on `column`, keeping row order.
    ///
    /// # Panics
    ///
    /// If `column >= self.columns()`.
    pub fn partition(&self, column: usize, pivot: f64) -> (EmbeddingSet, EmbeddingSet) {
        let (right, left): (Vec<usize>, Vec<usize>) =
            (0..self.len()).partition(|&i| self.features[[i, column]] > pivot);
        (self.select(&left), self.select(&right))
    }

    /// Subset of the given rows, in the given order.
    fn select(&self, rows: &[usize]) -> EmbeddingSet {
        EmbeddingSet {
            features: self.features.select(Axis(0), rows),
            labels: rows.iter().map(|&i| self.labels[i].clone()).collect(),
            sources: rows.iter().map(|&i| self.sources[i]).collect(),
        }
    }
}
