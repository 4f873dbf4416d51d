//! Small live preview of a style.
//!
//! The preview is a simplified echo of the wallpaper for settings screens: a
//! 15×15 grid with a fixed "today" marker, drawn with the same colors and
//! shape as the real wallpaper but with its own sizing rules. It is not
//! expected to match [`generate`](crate::generate) pixel for pixel.

use image::RgbaImage;
use resvg::tiny_skia::{FillRule, Paint, Transform};

use crate::error::RenderError;
use crate::layout::DotGeometry;
use crate::render::dots::DayState;
use crate::render::shape::{fill_dot, rounded_rect_path};
use crate::render::{allocate_canvas, pixmap_to_rgba_image};
use crate::style::{DotDensity, DotShape, StyleConfig};

pub const PREVIEW_COLUMNS: u32 = 15;
pub const PREVIEW_ROWS: u32 = 15;
/// Synthetic current day, roughly the middle of the preview grid.
pub const PREVIEW_TODAY: u32 = 113;

// Layout in abstract units: 15 cells of 21 units plus 16 units of padding
// on each side.
const CELL_UNITS: f32 = 21.0;
const PADDING_UNITS: f32 = 16.0;
const CORNER_UNITS: f32 = 12.0;
const TOTAL_UNITS: f32 = CELL_UNITS * PREVIEW_COLUMNS as f32 + 2.0 * PADDING_UNITS;

/// Dot size in units for each density.
fn dot_units(density: DotDensity) -> f32 {
    match density {
        DotDensity::Tiny => 9.0,
        DotDensity::Small => 12.0,
        DotDensity::Medium => 15.0,
        DotDensity::Large => 18.0,
    }
}

/// Preview dot geometry for a dot of `size` pixels.
fn preview_geometry(shape: DotShape, size: f32) -> DotGeometry {
    match shape {
        DotShape::Circle => DotGeometry { shape, width: size, height: size, corner_radius: size / 2.0 },
        DotShape::Rounded => DotGeometry { shape, width: size, height: size, corner_radius: size * 0.30 },
        DotShape::Square => DotGeometry { shape, width: size, height: size, corner_radius: size * 0.15 },
        DotShape::Pill => {
            let height = size * 0.9;
            DotGeometry { shape, width: size * 1.8, height, corner_radius: height / 2.0 }
        }
    }
}

/// Renders a `size` x `size` preview of `style`.
///
/// The background is a rounded card; pixels outside it stay transparent.
pub fn render_preview(size: u32, style: &StyleConfig) -> Result<RgbaImage, RenderError> {
    let mut pixmap = allocate_canvas(size, size)?;
    let scale = size as f32 / TOTAL_UNITS;

    if let Some(card) = rounded_rect_path(0.0, 0.0, size as f32, size as f32, CORNER_UNITS * scale) {
        let mut paint = Paint::default();
        paint.set_color(style.background_color.to_skia());
        paint.anti_alias = true;
        pixmap.fill_path(&card, &paint, FillRule::Winding, Transform::identity(), None);
    }

    let geometry = preview_geometry(style.dot_shape, dot_units(style.dot_density) * scale);
    let cell = CELL_UNITS * scale;
    let origin = PADDING_UNITS * scale;

    for row in 0..PREVIEW_ROWS {
        for col in 0..PREVIEW_COLUMNS {
            let day = row * PREVIEW_COLUMNS + col + 1;
            let color = DayState::classify(day, PREVIEW_TODAY).color(style);
            let cx = origin + (col as f32 + 0.5) * cell;
            let cy = origin + (row as f32 + 0.5) * cell;
            fill_dot(&mut pixmap, &geometry, cx, cy, color);
        }
    }

    Ok(pixmap_to_rgba_image(&pixmap))
}
