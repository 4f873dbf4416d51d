//! Draw-pass infrastructure for the wallpaper generator.
//!
//! A render is a fixed sequence of [`DrawPass`]es applied to a
//! [`RenderContext`]:
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌───────────┐
//! │ Background │──►│   Dots   │──►│  Caption  │
//! └────────────┘   └──────────┘   └───────────┘
//!                   past/today/     "N days • P% Complete"
//!                   future + glow
//! ```
//!
//! Every pass reads only the immutable inputs held by the context and writes
//! only to the context's own pixmap, so renders share no state.

pub mod background;
pub mod caption;
pub mod dots;
pub mod shape;

pub use background::BackgroundPass;
pub use caption::CaptionPass;
pub use dots::DotsPass;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{IntSize, Pixmap};

use crate::calendar::YearProgress;
use crate::error::RenderError;
use crate::layout::GridLayout;
use crate::style::StyleConfig;

// ============================================================================
// Render Context
// ============================================================================

/// State flowing through the draw passes of a single render.
pub struct RenderContext<'a> {
    /// The canvas being drawn on (premultiplied RGBA).
    pub pixmap: Pixmap,

    pub style: &'a StyleConfig,
    pub progress: YearProgress,
    pub layout: GridLayout,
}

impl<'a> RenderContext<'a> {
    /// Allocates a transparent canvas and computes the grid layout for it.
    pub fn new(
        width: u32,
        height: u32,
        style: &'a StyleConfig,
        progress: YearProgress,
    ) -> Result<Self, RenderError> {
        let pixmap = allocate_canvas(width, height)?;
        Ok(Self {
            pixmap,
            style,
            progress,
            layout: GridLayout::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Runs `passes` in order.
    pub fn run(&mut self, passes: &[&dyn DrawPass]) {
        for pass in passes {
            tracing::trace!(pass = pass.name(), "running draw pass");
            pass.draw(self);
        }
    }

    /// Finishes the render, converting the canvas to straight-alpha RGBA.
    pub fn into_image(self) -> RgbaImage {
        pixmap_to_rgba_image(&self.pixmap)
    }
}

// ============================================================================
// DrawPass
// ============================================================================

/// One stage of the wallpaper render.
pub trait DrawPass {
    /// Short name used in trace output.
    fn name(&self) -> &'static str;

    /// Draws onto `ctx.pixmap`.
    fn draw(&self, ctx: &mut RenderContext<'_>);
}

// ============================================================================
// Canvas allocation and conversion
// ============================================================================

/// Allocates a zeroed `width` x `height` pixmap without aborting on failure.
///
/// The size limits mirror tiny-skia's own: a row must fit in an `i32` byte
/// count and the whole buffer in an `isize`.
pub fn allocate_canvas(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    let too_big = RenderError::Allocation { width, height };

    let row_bytes = (width as u64).checked_mul(4).ok_or(too_big)?;
    if row_bytes > i32::MAX as u64 {
        return Err(too_big);
    }
    let len = row_bytes.checked_mul(height as u64).ok_or(too_big)?;
    if len > isize::MAX as u64 {
        return Err(too_big);
    }
    let len = usize::try_from(len).map_err(|_| too_big)?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| too_big)?;
    data.resize(len, 0);

    let size = IntSize::from_wh(width, height).ok_or(too_big)?;
    Pixmap::from_vec(data, size).ok_or(too_big)
}

/// Converts a premultiplied tiny-skia pixmap to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            allocate_canvas(0, 10).unwrap_err(),
            RenderError::InvalidDimensions { width: 0, height: 10 }
        );
        assert_eq!(
            allocate_canvas(10, 0).unwrap_err(),
            RenderError::InvalidDimensions { width: 10, height: 0 }
        );
    }

    #[test]
    fn oversized_rows_fail_without_allocating() {
        let err = allocate_canvas(600_000_000, 1).unwrap_err();
        assert_eq!(err, RenderError::Allocation { width: 600_000_000, height: 1 });
    }

    #[test]
    fn allocated_canvas_is_transparent() {
        let pixmap = allocate_canvas(7, 3).unwrap();
        assert_eq!(pixmap.width(), 7);
        assert_eq!(pixmap.height(), 3);
        assert!(pixmap.data().iter().all(|b| *b == 0));
    }

    #[test]
    fn conversion_demultiplies() {
        let mut pixmap = allocate_canvas(1, 1).unwrap();
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(200, 100, 50, 128));
        let img = pixmap_to_rgba_image(&pixmap);
        let p = img.get_pixel(0, 0);
        assert_eq!(p[3], 128);
        assert!((p[0] as i32 - 200).abs() <= 2);
        assert!((p[1] as i32 - 100).abs() <= 2);
    }
}
