//! Data model types for bundling runs.
//!
//! - `point` - Points, coordinates and the assignments written back to a store

pub mod point;

// Re-export main types for convenience
pub use point::{Assignment, GeoPoint, Point, PointId};
