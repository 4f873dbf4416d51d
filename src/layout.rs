//! Grid geometry for the year-progress wallpaper.
//!
//! The grid always models a 365-cell year laid out in 15 columns and 25 rows.
//! In a leap year day 366 has no cell of its own; on Dec 31 of a leap year
//! every drawn cell is in the past.

use crate::style::{DotDensity, DotShape};

/// Number of cells drawn, independent of the actual year length.
pub const CELL_COUNT: u32 = 365;
pub const COLUMNS: u32 = 15;
pub const ROWS: u32 = CELL_COUNT.div_ceil(COLUMNS);

/// Fraction of the height reserved above the grid for the system clock.
pub const TOP_MARGIN: f32 = 0.28;
pub const BOTTOM_MARGIN: f32 = 0.12;
/// Fraction of the width reserved on each side.
pub const SIDE_MARGIN: f32 = 0.08;

/// Base dot radius as a fraction of the cell size, before density scaling.
pub const DOT_RADIUS_RATIO: f32 = 0.28;
/// Glow halo radius relative to the dot radius.
pub const GLOW_SCALE: f32 = 1.25;

// ============================================================================
// GridLayout
// ============================================================================

/// Placement of the 365-cell grid within a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell_size: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub grid_width: f32,
    pub grid_height: f32,
}

impl GridLayout {
    /// Computes the grid placement for a `width` x `height` canvas.
    ///
    /// The grid is centered horizontally between the side margins and
    /// vertically in the band between the top and bottom margins.
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);

        let side = w * SIDE_MARGIN;
        let top = h * TOP_MARGIN;
        let available_width = w - 2.0 * side;
        let available_height = h - top - h * BOTTOM_MARGIN;

        let cell_size =
            (available_width / COLUMNS as f32).min(available_height / ROWS as f32);
        let grid_width = cell_size * COLUMNS as f32;
        let grid_height = cell_size * ROWS as f32;

        Self {
            cell_size,
            start_x: side + (available_width - grid_width) / 2.0,
            start_y: top + (available_height - grid_height) / 2.0,
            grid_width,
            grid_height,
        }
    }

    /// Center of the cell for a 1-based `day`, or `None` if the day has no cell.
    pub fn cell_center(&self, day: u32) -> Option<(f32, f32)> {
        if day == 0 || day > CELL_COUNT {
            return None;
        }
        let col = (day - 1) % COLUMNS;
        let row = (day - 1) / COLUMNS;
        let half = self.cell_size / 2.0;
        Some((
            self.start_x + col as f32 * self.cell_size + half,
            self.start_y + row as f32 * self.cell_size + half,
        ))
    }

    /// Iterates `(day, center_x, center_y)` for every drawn cell.
    pub fn cells(&self) -> impl Iterator<Item = (u32, f32, f32)> + '_ {
        (1..=CELL_COUNT).filter_map(move |day| {
            self.cell_center(day).map(|(x, y)| (day, x, y))
        })
    }

    /// Dot radius for the given density.
    pub fn dot_radius(&self, density: DotDensity) -> f32 {
        self.cell_size * DOT_RADIUS_RATIO * density.multiplier()
    }
}

// ============================================================================
// DotGeometry
// ============================================================================

/// Size of one dot, computed once per render and shared by every cell.
///
/// Circles use `width / 2` as their radius; every other shape is a rounded
/// rectangle centered on the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotGeometry {
    pub shape: DotShape,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl DotGeometry {
    /// Solid dot geometry for a base `radius`.
    pub fn solid(shape: DotShape, radius: f32) -> Self {
        let diameter = radius * 2.0;
        match shape {
            DotShape::Circle => Self::square_with_corner(shape, diameter, 0.5),
            DotShape::Square => Self::square_with_corner(shape, diameter, 0.05),
            DotShape::Rounded => Self::square_with_corner(shape, diameter, 0.35),
            DotShape::Pill => Self::stadium(diameter * 1.1, diameter * 0.6),
        }
    }

    /// Glow halo geometry: the same shape scaled up around the base `radius`.
    pub fn glow(shape: DotShape, radius: f32) -> Self {
        match shape {
            DotShape::Pill => {
                let diameter = radius * 2.0;
                Self::stadium(diameter * 1.2, diameter * 0.7)
            }
            _ => Self::solid(shape, radius * GLOW_SCALE),
        }
    }

    fn square_with_corner(shape: DotShape, side: f32, corner_ratio: f32) -> Self {
        Self {
            shape,
            width: side,
            height: side,
            corner_radius: side * corner_ratio,
        }
    }

    fn stadium(width: f32, height: f32) -> Self {
        Self {
            shape: DotShape::Pill,
            width,
            height,
            corner_radius: height / 2.0,
        }
    }

    /// Radius of the smallest circle enclosing the shape.
    pub fn extent(&self) -> f32 {
        self.width.max(self.height) / 2.0
    }
}
