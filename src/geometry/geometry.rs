use std::collections::HashMap;

use tracing::debug;

use crate::mapping::mapping::VertexDef;
use crate::utils::coordinate::LandmarkSet;

/// Closed pixel-space outline for one muscle unit: the first point is
/// repeated at the end, so a non-empty polygon always has >= 2 points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<(i32, i32)>,
}

impl Polygon {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// build_polygon realizes the vertex definitions of one muscle unit into
/// pixel coordinates over the full-resolution landmark set.
///
/// Each vertex is the weighted sum of its referenced landmarks, rounded
/// per pair. Out-of-range landmark indices skip the pair only, so a
/// vertex can still be realized from the remaining pairs. A vertex whose
/// sum lands exactly on (0, 0) is dropped; a muscle unit with no geometry
/// entry or no surviving vertex yields `None`, which means "nothing to
/// draw", not an error.
///
/// # Arguments
/// * `mu_code` - muscle-unit code keying the geometry index
/// * `landmarks` - normalized landmarks of the detected face
/// * `geometry` - geometry index from the mapping document
/// * `img_width` - base image width in pixels
/// * `img_height` - base image height in pixels
///
/// # Returns
/// * `Option<Polygon>`
pub fn build_polygon(
    mu_code: &str,
    landmarks: &LandmarkSet,
    geometry: &HashMap<String, Vec<VertexDef>>,
    img_width: i32,
    img_height: i32,
) -> Option<Polygon> {
    let Some(defs) = geometry.get(mu_code) else {
        debug!(mu_code, "no geometry defined for muscle unit");
        return None;
    };

    let mut points: Vec<(i32, i32)> = Vec::with_capacity(defs.len() + 1);
    for def in defs {
        let mut sum_x = 0i32;
        let mut sum_y = 0i32;
        for (&idx, &weight) in def.indices.iter().zip(def.weights.iter()) {
            let Some(lm) = landmarks.get(idx) else {
                debug!(mu_code, idx, "landmark index out of range, pair skipped");
                continue;
            };
            // z would be weighted the same way but has no use in 2-d drawing
            sum_x += (lm.x * img_width as f32 * weight).round() as i32;
            sum_y += (lm.y * img_height as f32 * weight).round() as i32;
        }
        if (sum_x, sum_y) != (0, 0) {
            points.push((sum_x, sum_y));
        }
    }

    // close the outline by repeating the first accepted vertex
    let first = *points.first()?;
    points.push(first);
    Some(Polygon { points })
}
