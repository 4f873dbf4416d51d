//! Footer caption ("N days • P% Complete") rendered through usvg's text engine.

use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::Transform;
use resvg::usvg::{Options, Tree, fontdb};

use super::{DrawPass, RenderContext};
use crate::color::Argb;

/// Light grey used for the caption.
pub const CAPTION_COLOR: Argb = Argb(0xFFB4_B4B4);
/// Top of the caption as a fraction of the canvas height.
pub const CAPTION_Y: f32 = 0.88;
/// Font size as a fraction of the canvas width.
pub const CAPTION_FONT_RATIO: f32 = 0.03;

const FONT_FAMILIES: &str = "Roboto, 'Noto Sans', 'DejaVu Sans', 'Helvetica Neue', Arial, sans-serif";

/// System fonts, loaded once per process.
static SYSTEM_FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

fn system_fonts() -> Arc<fontdb::Database> {
    SYSTEM_FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Draws the year-progress caption centered horizontally below the grid.
///
/// If no system font can be resolved the caption is silently skipped; the
/// grid itself never depends on fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptionPass;

impl DrawPass for CaptionPass {
    fn name(&self) -> &'static str {
        "caption"
    }

    fn draw(&self, ctx: &mut RenderContext<'_>) {
        let svg = caption_svg(ctx.width(), ctx.height(), &ctx.progress.caption());

        let mut opts = Options::default();
        opts.fontdb = system_fonts();

        let tree = match Tree::from_str(&svg, &opts) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!(error = %err, "failed to lay out caption");
                return;
            }
        };
        resvg::render(&tree, Transform::identity(), &mut ctx.pixmap.as_mut());
    }
}

/// Builds a full-canvas SVG document holding only the caption text.
pub fn caption_svg(width: u32, height: u32, text: &str) -> String {
    let font_size = (width as f32 * CAPTION_FONT_RATIO).max(1.0);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="hanging" font-family="{FONT_FAMILIES}" font-size="{font_size}" fill="{fill}">{text}</text></svg>"#,
        x = width as f32 / 2.0,
        y = height as f32 * CAPTION_Y,
        fill = CAPTION_COLOR.to_css_rgb(),
        text = escape_xml(text),
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
