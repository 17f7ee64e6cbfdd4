//! Bundling parameters.
//!
//! Contains BundleParams for controlling cluster and bundle sizes, and
//! BundleMode for choosing how clusters are split into bundles.

use std::fmt;
use std::str::FromStr;

use crate::error::{BundleError, Result};

/// Default number of geographic clusters in multi-cluster mode.
pub const DEFAULT_CLUSTER_COUNT: usize = 5;
/// Default maximum number of points per bundle.
pub const DEFAULT_BUNDLE_SIZE: usize = 20;
/// Default size below which a bundle is folded into another.
pub const DEFAULT_MIN_BUNDLE_SIZE: usize = 5;

/// Parameters for a clustering and bundling run.
///
/// Passed explicitly into the engine; there is no process-wide default
/// project to fall back on.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleParams {
    /// Number of geographic clusters to create. `None` treats the whole
    /// point set as a single cluster and skips geographic clustering.
    /// Clamped to the number of points at run time.
    pub cluster_count: Option<usize>,

    /// Maximum number of points in a final bundle.
    pub bundle_size: usize,

    /// Bundles with fewer points than this are merged into a bundle with
    /// spare capacity when one exists. Must be strictly less than
    /// `bundle_size`.
    pub min_bundle_size: usize,

    /// Seed for k-means++ initialisation. Equal seeds give equal output.
    pub seed: u64,

    /// Upper bound on Lloyd iterations per k-means run.
    pub max_iterations: usize,

    /// Convergence threshold on total squared centroid movement, relative
    /// to the mean per-axis variance of the input.
    pub tolerance: f64,

    /// Number of independently seeded k-means runs; the run with the lowest
    /// inertia wins.
    pub restarts: usize,
}

impl Default for BundleParams {
    fn default() -> Self {
        Self {
            cluster_count: Some(DEFAULT_CLUSTER_COUNT),
            bundle_size: DEFAULT_BUNDLE_SIZE,
            min_bundle_size: DEFAULT_MIN_BUNDLE_SIZE,
            seed: 0,
            max_iterations: 300,
            tolerance: 1e-4,
            restarts: 1,
        }
    }
}

impl BundleParams {
    /// Creates validated parameters with default clustering tunables.
    pub fn new(
        cluster_count: Option<usize>,
        bundle_size: usize,
        min_bundle_size: usize,
    ) -> Result<Self> {
        let params = Self {
            cluster_count,
            bundle_size,
            min_bundle_size,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Parameters for single-pass mode: every point lands in cluster "1".
    pub fn single_cluster(bundle_size: usize, min_bundle_size: usize) -> Result<Self> {
        Self::new(None, bundle_size, min_bundle_size)
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_count == Some(0) {
            return Err(BundleError::InvalidConfig(
                "cluster_count must be at least 1".to_string(),
            ));
        }
        if self.bundle_size == 0 {
            return Err(BundleError::InvalidConfig(
                "bundle_size must be greater than 0".to_string(),
            ));
        }
        if self.min_bundle_size == 0 {
            return Err(BundleError::InvalidConfig(
                "min_bundle_size must be greater than 0".to_string(),
            ));
        }
        if self.min_bundle_size >= self.bundle_size {
            return Err(BundleError::InvalidConfig(format!(
                "min_bundle_size ({}) must be less than bundle_size ({})",
                self.min_bundle_size, self.bundle_size
            )));
        }
        if self.max_iterations == 0 || self.restarts == 0 {
            return Err(BundleError::InvalidConfig(
                "max_iterations and restarts must be at least 1".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(BundleError::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// How each geographic cluster is split into bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BundleMode {
    /// Sort by street and cut into evenly sized contiguous bundles.
    Street,
    /// Secondary k-means inside the cluster, oversized groups cut
    /// sequentially.
    #[default]
    KMeans,
}

impl BundleMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Street => "STREET",
            Self::KMeans => "KMEANS",
        }
    }
}

impl FromStr for BundleMode {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STREET" => Ok(Self::Street),
            "KMEANS" => Ok(Self::KMeans),
            _ => Err(BundleError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for BundleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
