//! The wallpaper generator.
//!
//! [`generate`] is a pure function of its inputs: no clock, no shared state,
//! no I/O beyond loading system fonts once for the caption. It can be called
//! from any thread, including several at once.

use std::io::Cursor;

use chrono::NaiveDate;
use image::{ImageFormat, RgbaImage};

use crate::calendar::YearProgress;
use crate::error::RenderError;
use crate::render::{BackgroundPass, CaptionPass, DotsPass, DrawPass, RenderContext};
use crate::style::StyleConfig;

// ============================================================================
// WallpaperImage
// ============================================================================

/// A rendered wallpaper, owned exclusively by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperImage {
    /// Straight-alpha RGBA pixels; every pixel is opaque.
    pub data: RgbaImage,

    /// Day accounting the image was rendered for.
    pub progress: YearProgress,
}

impl WallpaperImage {
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Encodes the image as PNG, the lossless form handed to wallpaper sinks.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut bytes = Vec::new();
        self.data.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Releases the pixel buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw()
    }
}

// ============================================================================
// generate
// ============================================================================

/// Renders the year-progress wallpaper for `reference_date` at
/// `width` x `height` pixels.
///
/// # Errors
///
/// - [`RenderError::InvalidDimensions`] if either dimension is zero.
/// - [`RenderError::Allocation`] if the pixel buffer cannot be created at the
///   requested size. The generator never downscales.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use onedot_renderer::{generate, StyleConfig};
///
/// let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
/// let wallpaper = generate(360, 640, &StyleConfig::default(), date).unwrap();
///
/// assert_eq!((wallpaper.width(), wallpaper.height()), (360, 640));
/// assert_eq!(wallpaper.progress.caption(), "333 days • 9% Complete");
/// ```
pub fn generate(
    width: u32,
    height: u32,
    style: &StyleConfig,
    reference_date: NaiveDate,
) -> Result<WallpaperImage, RenderError> {
    let progress = YearProgress::for_date(reference_date);
    tracing::debug!(
        width,
        height,
        day_of_year = progress.day_of_year,
        days_in_year = progress.days_in_year,
        shape = style.dot_shape.name(),
        density = style.dot_density.index(),
        "generating wallpaper"
    );

    let mut ctx = RenderContext::new(width, height, style, progress)?;
    let passes: [&dyn DrawPass; 3] = [&BackgroundPass, &DotsPass, &CaptionPass];
    ctx.run(&passes);

    Ok(WallpaperImage {
        data: ctx.into_image(),
        progress,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Argb;
    use crate::layout::GridLayout;
    use crate::render::caption::{CAPTION_FONT_RATIO, CAPTION_Y};
    use crate::style::{DotDensity, DotShape};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_style() -> StyleConfig {
        StyleConfig {
            past_color: Argb(0xFFD1D5DB),
            today_color: Argb(0xFFF97316),
            future_color: Argb(0xFF262626),
            background_color: Argb(0xFF050505),
            dot_shape: DotShape::Circle,
            dot_density: DotDensity::Small,
        }
    }

    fn pixel_at_cell(img: &WallpaperImage, layout: &GridLayout, day: u32) -> [u8; 4] {
        let (x, y) = layout.cell_center(day).unwrap();
        img.data.get_pixel(x as u32, y as u32).0
    }

    #[test]
    fn output_matches_requested_dimensions() {
        for (w, h) in [(100, 100), (1080, 1920), (1000, 1000), (4096, 4096)] {
            let img = generate(w, h, &scenario_style(), date(2026, 2, 1)).unwrap();
            assert_eq!(img.width(), w);
            assert_eq!(img.height(), h);
        }
    }

    #[test]
    fn output_is_opaque_and_not_blank() {
        let img = generate(1080, 1920, &scenario_style(), date(2026, 2, 1)).unwrap();
        assert!(img.data.pixels().any(|p| p.0 != [0, 0, 0, 0]));
        assert!(img.data.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn rendering_is_deterministic() {
        let style = scenario_style();
        let a = generate(500, 500, &style, date(2026, 7, 4)).unwrap();
        let b = generate(500, 500, &style, date(2026, 7, 4)).unwrap();
        assert_eq!(a.data.as_raw(), b.data.as_raw());
    }

    #[test]
    fn every_shape_and_density_renders() {
        for shape in DotShape::ALL {
            for density in DotDensity::ALL {
                let style = scenario_style().with_shape(shape).with_density(density);
                let img = generate(1080, 1920, &style, date(2026, 2, 1))
                    .unwrap_or_else(|e| panic!("{shape:?}/{density:?} failed: {e}"));
                assert_eq!((img.width(), img.height()), (1080, 1920));
            }
        }
    }

    #[test]
    fn february_first_colors_each_state() {
        let style = scenario_style();
        let img = generate(1080, 1920, &style, date(2026, 2, 1)).unwrap();
        let layout = GridLayout::new(1080, 1920);

        assert_eq!(img.progress.day_of_year, 32);
        assert_eq!(img.progress.caption(), "333 days • 9% Complete");

        for day in [1, 15, 31] {
            assert_eq!(pixel_at_cell(&img, &layout, day), [0xD1, 0xD5, 0xDB, 255], "day {day}");
        }
        assert_eq!(pixel_at_cell(&img, &layout, 32), [0xF9, 0x73, 0x16, 255]);
        for day in [33, 200, 365] {
            assert_eq!(pixel_at_cell(&img, &layout, day), [0x26, 0x26, 0x26, 255], "day {day}");
        }
    }

    #[test]
    fn caption_is_drawn_centered_below_grid() {
        let (w, h) = (1080u32, 1920u32);
        let img = generate(w, h, &scenario_style(), date(2026, 2, 1)).unwrap();

        let top = h as f32 * CAPTION_Y;
        let font_size = w as f32 * CAPTION_FONT_RATIO;

        // Caption pixels are the only neutral greys brighter than the future dots.
        let caption: Vec<(u32, u32)> = img
            .data
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] == p[1] && p[1] == p[2] && p[0] > 60)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!caption.is_empty(), "caption should be rendered");

        let min_y = caption.iter().map(|p| p.1).min().unwrap();
        let max_y = caption.iter().map(|p| p.1).max().unwrap();
        assert!(min_y as f32 >= top.floor() - 2.0, "caption starts above its band at y={min_y}");
        assert!((max_y as f32) < top + font_size * 1.5, "caption extends to y={max_y}");

        let min_x = caption.iter().map(|p| p.0).min().unwrap();
        let max_x = caption.iter().map(|p| p.0).max().unwrap();
        let center = (min_x + max_x) as f32 / 2.0;
        assert!((center - w as f32 / 2.0).abs() <= 4.0, "caption centered at {center}");
    }

    #[test]
    fn today_glow_tints_the_gap_around_it() {
        let style = scenario_style();
        let img = generate(1080, 1920, &style, date(2026, 2, 1)).unwrap();
        let layout = GridLayout::new(1080, 1920);
        let radius = layout.dot_radius(style.dot_density);

        // Gap to the right of today's dot vs. the same gap next to a future dot.
        let (tx, ty) = layout.cell_center(32).unwrap();
        let (fx, fy) = layout.cell_center(40).unwrap();
        let offset = radius + 1.5;
        let near_today = img.data.get_pixel((tx + offset) as u32, ty as u32);
        let near_future = img.data.get_pixel((fx + offset) as u32, fy as u32);

        assert!(near_today[0] > near_future[0], "glow should brighten the red channel");
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = generate(0, 1920, &scenario_style(), date(2026, 2, 1)).unwrap_err();
        assert_eq!(err, RenderError::InvalidDimensions { width: 0, height: 1920 });
    }

    #[test]
    fn oversized_canvas_is_an_allocation_error() {
        let err = generate(600_000_000, 2, &scenario_style(), date(2026, 2, 1)).unwrap_err();
        assert!(matches!(err, RenderError::Allocation { .. }));
    }

    #[test]
    fn leap_year_end_keeps_365_cells() {
        let style = scenario_style();
        let img = generate(1080, 1920, &style, date(2024, 12, 31)).unwrap();
        let layout = GridLayout::new(1080, 1920);

        assert_eq!(img.progress.day_of_year, 366);
        assert_eq!(layout.cells().count(), 365);
        assert!(layout.cell_center(366).is_none());
        // Every drawn cell is in the past.
        assert_eq!(pixel_at_cell(&img, &layout, 365), [0xD1, 0xD5, 0xDB, 255]);
        assert_eq!(img.progress.caption(), "0 days • 100% Complete");
    }

    #[test]
    fn png_encoding_round_trips_dimensions() {
        let img = generate(120, 200, &scenario_style(), date(2026, 2, 1)).unwrap();
        let png = img.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 200));
    }

    #[test]
    fn into_raw_yields_rgba_rows() {
        let img = generate(120, 200, &scenario_style(), date(2026, 2, 1)).unwrap();
        let first = img.data.get_pixel(0, 0).0;

        let raw = img.into_raw();
        assert_eq!(raw.len(), 120 * 200 * 4);
        assert_eq!(&raw[..4], &first);
        assert_eq!(&raw[..4], &[0x05, 0x05, 0x05, 0xFF]);
    }

    #[test]
    fn concurrent_renders_agree() {
        let style = scenario_style();
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || generate(300, 500, &style, date(2026, 3, 3)).unwrap()))
            .collect();
        let images: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(images.windows(2).all(|w| w[0].data == w[1].data));
    }
}
