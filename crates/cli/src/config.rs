//! Project configuration file.
//!
//! A TOML file with any of `cluster_count`, `bundle_size`,
//! `min_bundle_size`, `seed` and `mode`. Values sit between the built-in
//! defaults and command line flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// `0` selects single-cluster mode.
    pub cluster_count: Option<usize>,
    pub bundle_size: Option<usize>,
    pub min_bundle_size: Option<usize>,
    pub seed: Option<u64>,
    pub mode: Option<String>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file as TOML")
    }
}
