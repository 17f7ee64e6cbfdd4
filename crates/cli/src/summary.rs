//! Screen summary of a point file.

use address_bundler_core::{ClusterSummary, StoredPoint, summarize_assignments};
use itertools::Itertools;

pub const MAX_TOWN_ROWS: usize = 10;
const DIVIDER: &str = "----------------------------------------";
const UNKNOWN_TOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub total: usize,
    pub geocoded: usize,
    pub bundled: usize,
    /// Town counts, most common first, then by name.
    pub towns: Vec<(String, usize)>,
    pub clusters: Vec<ClusterSummary>,
}

impl ProjectSummary {
    pub fn from_records(records: &[StoredPoint]) -> Self {
        let towns = records
            .iter()
            .map(|r| town_of(&r.address))
            .counts()
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .collect();

        let clusters = summarize_assignments(records.iter().filter_map(|r| {
            Some((r.cluster_key.as_deref()?, r.bundle_key.as_deref()?))
        }));

        Self {
            total: records.len(),
            geocoded: records.iter().filter(|r| r.is_located()).count(),
            bundled: clusters.iter().map(|c| c.size).sum(),
            towns,
            clusters,
        }
    }

    pub fn lines(&self, max_town_rows: usize) -> Vec<String> {
        let mut lines = vec![
            DIVIDER.to_string(),
            "PROJECT SUMMARY".to_string(),
            DIVIDER.to_string(),
            format!("Total addresses: {}", self.total),
            String::new(),
            "Towns in addresses:".to_string(),
        ];
        if self.towns.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (town, count) in self.towns.iter().take(max_town_rows) {
            lines.push(format!("  {}: {}", town, count));
        }
        if self.towns.len() > max_town_rows {
            lines.push(format!(
                "  ... ({} more towns)",
                self.towns.len() - max_town_rows
            ));
        }
        lines.push(String::new());
        lines.push(format!("Addresses geocoded: {} / {}", self.geocoded, self.total));
        lines.push(format!(
            "Clustering run: {}",
            if self.bundled > 0 { "Yes" } else { "No" }
        ));
        for cluster in &self.clusters {
            lines.push(format!("Cluster {}: {} points", cluster.key, cluster.size));
            for bundle in &cluster.bundles {
                lines.push(format!("  Bundle {}: {} points", bundle.key, bundle.size));
            }
        }
        lines.push(DIVIDER.to_string());
        lines
    }
}

/// Town part of an address: the segment after the first comma, with any
/// trailing state and postal code dropped.
pub fn town_of(address: &str) -> String {
    let Some(rest) = address.split(',').nth(1) else {
        return UNKNOWN_TOWN.to_string();
    };
    let town: Vec<&str> = rest
        .split_whitespace()
        .take_while(|word| !is_state_or_zip(word))
        .collect();
    if town.is_empty() {
        return UNKNOWN_TOWN.to_string();
    }
    town.iter().map(|w| capitalize(w)).collect::<Vec<_>>().join(" ")
}

fn is_state_or_zip(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        || (word.len() == 2 && word.chars().all(|c| c.is_ascii_uppercase()))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
