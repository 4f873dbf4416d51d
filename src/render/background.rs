//! Solid background fill.

use super::{DrawPass, RenderContext};

/// Fills the whole canvas with the style's background color.
///
/// The background is forced opaque so the finished wallpaper never contains
/// transparent pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundPass;

impl DrawPass for BackgroundPass {
    fn name(&self) -> &'static str {
        "background"
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let [r, g, b, _] = ctx.style.background_color.to_rgba_bytes();
        ctx.pixmap
            .fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255));
    }
}
