use serde::{Deserialize, Serialize};

/// Cardinality of the landmark mesh produced by the source detector.
/// Informational only; `LandmarkSet` does not enforce it.
pub const LANDMARK_POINTS: usize = 468;

/// One facial landmark. `x` and `y` are normalized to [0, 1] relative to
/// the image width/height; `z` is the detector's relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Ordered, immutable set of facial landmarks for one detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        LandmarkSet { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// get returns the landmark at `idx`, or `None` when the index is out
    /// of range for this set.
    pub fn get(&self, idx: usize) -> Option<&Landmark> {
        self.points.get(idx)
    }
}
