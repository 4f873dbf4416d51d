//! The 365-dot grid, including the glow halo behind today's dot.

use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, PixmapPaint, Transform};

use super::shape::fill_dot;
use super::{DrawPass, RenderContext};
use crate::color::Argb;
use crate::layout::DotGeometry;
use crate::style::StyleConfig;

/// Opacity of the glow halo relative to the today color.
pub const GLOW_OPACITY: f32 = 0.6;
/// Gaussian sigma of the glow blur, relative to the dot radius.
pub const GLOW_BLUR_RATIO: f32 = 0.25;

/// Where a day sits relative to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Past,
    Today,
    Future,
}

impl DayState {
    pub fn classify(day: u32, day_of_year: u32) -> Self {
        match day.cmp(&day_of_year) {
            std::cmp::Ordering::Less => Self::Past,
            std::cmp::Ordering::Equal => Self::Today,
            std::cmp::Ordering::Greater => Self::Future,
        }
    }

    pub fn color(self, style: &StyleConfig) -> Argb {
        match self {
            Self::Past => style.past_color,
            Self::Today => style.today_color,
            Self::Future => style.future_color,
        }
    }
}

/// Draws one filled dot per grid cell, colored by [`DayState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DotsPass;

impl DrawPass for DotsPass {
    fn name(&self) -> &'static str {
        "dots"
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let style = ctx.style;
        let radius = ctx.layout.dot_radius(style.dot_density);
        let solid = DotGeometry::solid(style.dot_shape, radius);
        let glow = DotGeometry::glow(style.dot_shape, radius);
        let today = ctx.progress.day_of_year;

        let cells: Vec<_> = ctx.layout.cells().collect();
        for (day, cx, cy) in cells {
            let state = DayState::classify(day, today);
            let color = state.color(style);
            if state == DayState::Today {
                draw_glow(&mut ctx.pixmap, &glow, cx, cy, radius, color);
            }
            fill_dot(&mut ctx.pixmap, &solid, cx, cy, color);
        }
    }
}

/// Draws a blurred, translucent copy of `geometry` centered on `(cx, cy)`.
///
/// The halo is rendered into a scratch pixmap padded by three sigmas,
/// Gaussian-blurred, and composited onto `canvas`.
fn draw_glow(canvas: &mut Pixmap, geometry: &DotGeometry, cx: f32, cy: f32, radius: f32, color: Argb) {
    let sigma = (radius * GLOW_BLUR_RATIO).max(0.5);
    let half = geometry.extent() + 3.0 * sigma;
    let size = (half * 2.0).ceil() as u32 + 2;

    let Some(mut scratch) = Pixmap::new(size, size) else {
        return;
    };

    let origin_x = (cx - size as f32 / 2.0).floor();
    let origin_y = (cy - size as f32 / 2.0).floor();
    fill_dot(
        &mut scratch,
        geometry,
        cx - origin_x,
        cy - origin_y,
        color.with_alpha_scaled(GLOW_OPACITY),
    );

    blur_premultiplied(&mut scratch, sigma);

    canvas.draw_pixmap(
        origin_x as i32,
        origin_y as i32,
        scratch.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// Gaussian-blurs a premultiplied pixmap in place.
///
/// Blurring is linear, so it is applied directly to premultiplied channels.
/// Color channels are clamped to alpha afterwards to keep the data valid.
fn blur_premultiplied(pixmap: &mut Pixmap, sigma: f32) {
    let (w, h) = (pixmap.width(), pixmap.height());
    let Some(img) = RgbaImage::from_raw(w, h, pixmap.data().to_vec()) else {
        return;
    };
    let blurred = image::imageops::blur(&img, sigma);

    for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(blurred.pixels()) {
        let [r, g, b, a] = src.0;
        dst[0] = r.min(a);
        dst[1] = g.min(a);
        dst[2] = b.min(a);
        dst[3] = a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::YearProgress;
    use crate::render::BackgroundPass;
    use crate::style::DotShape;
    use chrono::NaiveDate;

    #[test]
    fn classify_days() {
        assert_eq!(DayState::classify(1, 32), DayState::Past);
        assert_eq!(DayState::classify(31, 32), DayState::Past);
        assert_eq!(DayState::classify(32, 32), DayState::Today);
        assert_eq!(DayState::classify(33, 32), DayState::Future);
        assert_eq!(DayState::classify(365, 366), DayState::Past);
    }

    #[test]
    fn glow_spills_past_the_solid_dot() {
        let style = StyleConfig {
            background_color: Argb::BLACK,
            today_color: Argb(0xFFFF0000),
            past_color: Argb::BLACK,
            future_color: Argb::BLACK,
            dot_shape: DotShape::Circle,
            ..StyleConfig::default()
        };
        let progress = YearProgress::for_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let mut ctx = RenderContext::new(1080, 1920, &style, progress).unwrap();
        ctx.run(&[&BackgroundPass, &DotsPass]);

        let (cx, cy) = ctx.layout.cell_center(1).unwrap();
        let radius = ctx.layout.dot_radius(style.dot_density);
        let img = ctx.into_image();

        let center = img.get_pixel(cx as u32, cy as u32);
        assert_eq!(center.0, [255, 0, 0, 255]);

        // Just outside the solid disc the halo tints the background red.
        let halo = img.get_pixel((cx + radius + 1.5) as u32, cy as u32);
        assert!(halo[0] > 0, "glow should reach beyond the dot edge");
        assert_eq!(halo[1], 0);
    }

    #[test]
    fn blur_keeps_premultiplied_invariant() {
        let mut pixmap = Pixmap::new(16, 16).unwrap();
        let geom = DotGeometry::solid(DotShape::Square, 3.0);
        fill_dot(&mut pixmap, &geom, 8.0, 8.0, Argb(0x80FF8040));
        blur_premultiplied(&mut pixmap, 2.0);

        for px in pixmap.data().chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
        }
        assert!(pixmap.pixel(0, 8).unwrap().alpha() < pixmap.pixel(8, 8).unwrap().alpha());
    }
}
