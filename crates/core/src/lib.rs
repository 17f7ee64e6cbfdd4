//! address-bundler - groups geocoded addresses into clusters and bundles.
//!
//! Points are partitioned into geographic clusters with seeded k-means,
//! then each cluster is split into bundles of bounded size keyed
//! `{cluster}-{letters}` (`3-A`, `3-B`, ..., `3-AA`).

pub mod bundle;
pub mod cluster;
pub mod engine;
pub mod error;
pub mod label;
pub mod model;
pub mod params;
pub mod report;
pub mod store;
pub mod street;

pub use engine::{BundleEngine, RunOutcome, run};
pub use error::{BundleError, Result};
pub use label::{bundle_key, decode_label, encode_label};
pub use model::{Assignment, GeoPoint, Point, PointId};
pub use params::{BundleMode, BundleParams};
pub use report::{BundleReport, BundleSummary, ClusterSummary, summarize_assignments};
pub use store::{MemoryStore, PointStore, StoredPoint};
pub use street::street_key;
