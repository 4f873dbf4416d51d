//! Path construction and filling for dot shapes.

use resvg::tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

use crate::color::Argb;
use crate::layout::DotGeometry;
use crate::style::DotShape;

/// Cubic Bézier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Builds the outline of `geometry` centered on `(cx, cy)`.
///
/// Returns `None` for degenerate (empty) shapes.
pub fn dot_path(geometry: &DotGeometry, cx: f32, cy: f32) -> Option<Path> {
    match geometry.shape {
        DotShape::Circle => PathBuilder::from_circle(cx, cy, geometry.width / 2.0),
        _ => rounded_rect_path(
            cx - geometry.width / 2.0,
            cy - geometry.height / 2.0,
            geometry.width,
            geometry.height,
            geometry.corner_radius,
        ),
    }
}

/// Builds a rounded rectangle. The corner radius is clamped to half the
/// shorter side, so a radius of `height / 2` yields a stadium.
pub fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    let r = radius.clamp(0.0, width.min(height) / 2.0);
    let k = r * KAPPA;
    let (right, bottom) = (x + width, y + height);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Fills `geometry` centered on `(cx, cy)` with an anti-aliased solid color.
pub fn fill_dot(pixmap: &mut Pixmap, geometry: &DotGeometry, cx: f32, cy: f32, color: Argb) {
    let Some(path) = dot_path(geometry, cx, cy) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}
