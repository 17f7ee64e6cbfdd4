//! Error types for the address-bundler engine.

use thiserror::Error;

/// Primary error type for clustering and bundling runs.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("bundle mode must be 'STREET' or 'KMEANS', got {0:?}")]
    InvalidMode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("point not found in store: {0}")]
    UnknownPoint(u64),

    #[error("duplicate point id: {0}")]
    DuplicatePoint(u64),

    #[error("store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BundleError {
    /// Returns true for errors raised while validating configuration,
    /// before any clustering work starts.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidMode(_) | Self::InvalidConfig(_))
    }
}

/// Convenience Result type alias for BundleError.
pub type Result<T> = std::result::Result<T, BundleError>;
