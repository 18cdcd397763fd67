use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc::{line, LINE_8};
use tracing::warn;

use crate::error::Result;
use crate::geometry::geometry::Polygon;

const LINE_THICKNESS: i32 = 2;

/// RGB fallback when a muscle color is missing or unparseable.
pub const FALLBACK_COLOR: (u8, u8, u8) = (255, 255, 255);

/// parse_color decodes a "#RRGGBB" string into (r, g, b) channel bytes.
pub fn parse_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

/// format_color re-encodes channel bytes as a "#rrggbb" string.
pub fn format_color((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// render_overlay draws every polygon outline onto a copy of the base
/// image and returns the annotated copy; the caller's Mat is untouched.
///
/// Segments connect consecutive polygon points with a fixed stroke width.
/// Colors decode from "#RRGGBB" and are reordered to the Mat's native BGR
/// channel order; unparseable colors fall back to white. Polygons with
/// fewer than 2 points are skipped.
///
/// # Arguments
/// * `base` - full-resolution BGR image (never the classifier-resized copy)
/// * `overlays` - polygons paired with their resolved "#RRGGBB" colors
///
/// # Returns
/// * `Result<Mat>`
pub fn render_overlay(base: &Mat, overlays: &[(Polygon, String)]) -> Result<Mat> {
    let mut annotated = base.clone();

    for (polygon, color) in overlays {
        if polygon.len() < 2 {
            continue;
        }
        let (r, g, b) = parse_color(color).unwrap_or_else(|| {
            warn!(%color, "unparseable muscle color, using fallback");
            FALLBACK_COLOR
        });
        let stroke = Scalar::new(b as f64, g as f64, r as f64, 0.0);

        for segment in polygon.points.windows(2) {
            line(
                &mut annotated,
                Point::new(segment[0].0, segment[0].1),
                Point::new(segment[1].0, segment[1].1),
                stroke,
                LINE_THICKNESS,
                LINE_8,
                0,
            )?;
        }
    }

    Ok(annotated)
}
