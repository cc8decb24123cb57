//! Neighborhood table: static named reference points for labelling spot centroids.

use serde::{Deserialize, Serialize};

use crate::types::GeoPoint;

/// A named location that spot centroids are matched against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ReferencePoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Lookup table of reference points.
#[derive(Debug, Clone, Default)]
pub struct NeighborhoodTable {
    points: Vec<ReferencePoint>,
}

impl NeighborhoodTable {
    /// Create a new, empty table.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a table from a list of reference points.
    pub fn from_points(points: Vec<ReferencePoint>) -> Self {
        Self { points }
    }

    /// Built-in table of Conakry districts.
    pub fn builtin() -> Self {
        Self::from_points(builtin_points())
    }

    /// Index of the nearest point within `radius`. Earlier points win ties.
    ///
    /// A non-finite location is never within range of anything.
    pub fn nearest_within(&self, location: &GeoPoint, radius: f64) -> Option<usize> {
        if !location.is_finite() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, point) in self.points.iter().enumerate() {
            let d = location.distance_to(&point.location());
            if d.is_nan() || d >= radius {
                continue;
            }
            match best {
                Some((_, best_d)) if best_d <= d => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Resolve a label for `location`, falling back when nothing is in range.
    pub fn resolve(&self, location: &GeoPoint, radius: f64, fallback: &str) -> String {
        match self.nearest_within(location, radius) {
            Some(i) => self.points[i].name.clone(),
            None => fallback.to_string(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ReferencePoint> {
        self.points.get(index)
    }

    /// Add a point to the end of the table.
    pub fn push(&mut self, point: ReferencePoint) {
        self.points.push(point);
    }

    /// Number of reference points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }
}

/// Default reference points.
pub fn builtin_points() -> Vec<ReferencePoint> {
    vec![
        ReferencePoint::new("Kaloum", 9.509, -13.712),
        ReferencePoint::new("Dixinn", 9.547, -13.677),
        ReferencePoint::new("Matam", 9.535, -13.653),
        ReferencePoint::new("Ratoma", 9.618, -13.640),
        ReferencePoint::new("Matoto", 9.586, -13.608),
        ReferencePoint::new("Kipé", 9.594, -13.658),
        ReferencePoint::new("Taouyah", 9.563, -13.673),
    ]
}
