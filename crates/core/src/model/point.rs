//! Point records flowing through a bundling run.

/// Stable identity of a point, assigned by the store.
pub type PointId = u64;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Coordinates as a plane point for the clustering code.
    #[inline]
    pub const fn as_array(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// A geocoded entity to be clustered and bundled.
///
/// Only `cluster_key` and `bundle_key` are written by the engine; the rest is
/// read-only input. Names are used as ordering tie-breaks only.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub location: GeoPoint,
    pub address: String,
    pub family_name: String,
    pub given_name: String,
    pub cluster_key: Option<String>,
    pub bundle_key: Option<String>,
}

impl Point {
    /// Creates an unassigned point with no address or names.
    pub fn new(id: PointId, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            location: GeoPoint::new(latitude, longitude),
            address: String::new(),
            family_name: String::new(),
            given_name: String::new(),
            cluster_key: None,
            bundle_key: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_name(mut self, given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        self.given_name = given_name.into();
        self.family_name = family_name.into();
        self
    }

    /// The final assignment, if both keys are set.
    pub fn assignment(&self) -> Option<Assignment> {
        Some(Assignment {
            id: self.id,
            cluster_key: self.cluster_key.clone()?,
            bundle_key: self.bundle_key.clone()?,
        })
    }
}

/// The keys handed back to the store for one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: PointId,
    pub cluster_key: String,
    pub bundle_key: String,
}
