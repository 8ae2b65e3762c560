//! Build and evaluation parameters for variance-reduction trees.

use crate::error::{Error, Result};

/// Width of a cluster label in bits. Each split level consumes one bit.
pub const LABEL_BITS: usize = u64::BITS as usize;

/// Configuration for building and evaluating a [`ReductionTree`](super::ReductionTree).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReductionConfig {
    /// Number of split levels below the root.
    pub max_depth: usize,
    /// Gain below which a node is treated as a decision leaf during evaluation.
    ///
    /// Does not affect the build; the tree is always grown to `max_depth`.
    pub cutoff: f64,
    /// Cluster label assigned to the root.
    pub seed_label: u64,
    /// Bit position set by the root's right branch.
    pub seed_depth: u32,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            cutoff: 0.0,
            seed_label: 0,
            seed_depth: 0,
        }
    }
}

impl ReductionConfig {
    /// Create a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the evaluation gain cutoff.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the root label and the bit its right branch sets.
    pub fn with_seed(mut self, label: u64, depth: u32) -> Self {
        self.seed_label = label;
        self.seed_depth = depth;
        self
    }

    /// Check that the parameters describe a buildable tree.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the deepest split would set a bit past
    /// [`LABEL_BITS`], or if `cutoff` is negative or NaN.
    pub fn validate(&self) -> Result<()> {
        let deepest = (self.seed_depth as usize).checked_add(self.max_depth);
        if deepest.map_or(true, |d| d > LABEL_BITS) {
            return Err(Error::InvalidParameter {
                name: "max_depth",
                message: "seed_depth + max_depth must not exceed 64 label bits",
            });
        }
        if !(self.cutoff >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "cutoff",
                message: "must be a non-negative number",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ReductionConfig::default();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.cutoff, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_label_bits_exhausted() {
        assert!(ReductionConfig::new().with_max_depth(64).validate().is_ok());
        assert!(ReductionConfig::new().with_max_depth(65).validate().is_err());
        assert!(ReductionConfig::new()
            .with_max_depth(60)
            .with_seed(0, 5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_depth_overflow_rejected() {
        let config = ReductionConfig::new()
            .with_max_depth(usize::MAX)
            .with_seed(0, 1);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidParameter {
                name: "max_depth",
                ..
            })
        ));
        assert!(ReductionConfig::new()
            .with_max_depth(usize::MAX)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_bad_cutoff() {
        assert!(ReductionConfig::new().with_cutoff(-0.5).validate().is_err());
        assert!(ReductionConfig::new().with_cutoff(f64::NAN).validate().is_err());
        assert!(ReductionConfig::new()
            .with_cutoff(f64::INFINITY)
            .validate()
            .is_ok());
    }
}
