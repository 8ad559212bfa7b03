use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use cosmic_text::{
    fontdb::Database, Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache,
};
use geochart_common::Color;
use lazy_static::lazy_static;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

lazy_static! {
    static ref FONT_SYSTEM: Mutex<FontSystem> = Mutex::new(build_font_system());
    static ref SWASH_CACHE: Mutex<SwashCache> = Mutex::new(SwashCache::new());
}

fn build_font_system() -> FontSystem {
    let mut font_system = FontSystem::new();
    let fontdb = font_system.db_mut();
    if fontdb.is_empty() {
        tracing::warn!("No system fonts found, labels will not be rendered");
    }
    setup_default_fonts(fontdb);
    font_system
}

fn setup_default_fonts(fontdb: &mut Database) {
    let families: HashSet<String> = fontdb
        .faces()
        .flat_map(|face| face.families.iter().map(|(fam, _lang)| fam.clone()))
        .collect();

    for family in ["Helvetica", "Arial", "Liberation Sans", "DejaVu Sans"] {
        if families.contains(family) {
            fontdb.set_sans_serif_family(family);
            break;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether any font face was loaded
pub fn fonts_available() -> bool {
    !lock(&FONT_SYSTEM).db().is_empty()
}

/// Extents of a shaped single line of text, in the units of its font size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
    pub descent: f64,
    pub line_height: f64,
}

impl TextBounds {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Shape `text` with the default sans serif family and measure it
pub fn measure_text(text: &str, font_size: f64) -> TextBounds {
    if text.is_empty() || !(font_size > 0.0) {
        return TextBounds::empty();
    }
    let mut font_system = lock(&FONT_SYSTEM);
    let buffer = make_text_buffer(text, font_size as f32, &mut font_system);
    measure_text_buffer(&buffer)
}

fn make_text_buffer(text: &str, font_size: f32, font_system: &mut FontSystem) -> Buffer {
    let metrics = Metrics::new(font_size, font_size);
    let mut buffer = Buffer::new(font_system, metrics);
    buffer.set_text(
        font_system,
        text,
        Attrs::new().family(Family::SansSerif),
        Shaping::Advanced,
    );
    buffer.set_size(font_system, Some(font_size * 100.0), Some(font_size * 4.0));
    buffer.shape_until_scroll(font_system, false);
    buffer
}

fn measure_text_buffer(buffer: &Buffer) -> TextBounds {
    let mut max_ascent: f32 = 0.0;
    let mut max_descent: f32 = 0.0;
    let mut max_line_height: f32 = 0.0;
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut runs = 0;

    for run in buffer.layout_runs() {
        runs += 1;
        let ascent = run.line_y - run.line_top;
        let descent = run.line_height - ascent;
        max_ascent = max_ascent.max(ascent);
        max_descent = max_descent.max(descent);
        max_line_height = max_line_height.max(run.line_height);
        for glyph in run.glyphs {
            min_x = min_x.min(glyph.x);
            max_x = max_x.max(glyph.x + glyph.w);
        }
    }

    if runs == 0 {
        return TextBounds::empty();
    }
    let width = if min_x == f32::MAX { 0.0 } else { max_x - min_x };
    TextBounds {
        width: width as f64,
        height: (max_ascent + max_descent) as f64,
        ascent: max_ascent as f64,
        descent: max_descent as f64,
        line_height: max_line_height as f64,
    }
}

/// A label rasterized at physical resolution
pub(crate) struct RasterizedText {
    pub pixmap: Pixmap,
    /// Physical bounds of the shaped line
    pub bounds: TextBounds,
    /// Empty physical pixels around the line on every side
    pub padding: u32,
}

/// Rasterize `text` at `font_size` physical pixels. Returns None when
/// nothing would be painted.
pub(crate) fn rasterize_text(text: &str, font_size: f64, color: Color) -> Option<RasterizedText> {
    if text.is_empty() || !(font_size > 0.0) || color.is_transparent() {
        return None;
    }
    let mut font_system = lock(&FONT_SYSTEM);
    let mut swash_cache = lock(&SWASH_CACHE);

    let buffer = make_text_buffer(text, font_size as f32, &mut font_system);
    let bounds = measure_text_buffer(&buffer);
    if bounds.width <= 0.0 || bounds.line_height <= 0.0 {
        return None;
    }

    // glyph bearings may reach outside the advance box
    let padding = (font_size * 0.5).ceil() as u32;
    let width = bounds.width.ceil() as u32 + 2 * padding;
    let height = bounds.line_height.max(bounds.height).ceil() as u32 + 2 * padding;
    let mut pixmap = Pixmap::new(width, height)?;

    let [r, g, b] = color.to_rgb8();
    let a = (color.alpha().clamp(0.0, 1.0) * 255.0).round() as u8;
    let text_color = cosmic_text::Color::rgba(r, g, b, a);

    let mut paint = Paint::default();
    paint.anti_alias = false;
    let offset = padding as i32;
    buffer.draw(
        &mut font_system,
        &mut swash_cache,
        text_color,
        |x, y, w, h, c| {
            if c.a() == 0 {
                return;
            }
            let Some(rect) = Rect::from_xywh(
                (x + offset) as f32,
                (y + offset) as f32,
                w as f32,
                h as f32,
            ) else {
                return;
            };
            paint.set_color_rgba8(c.r(), c.g(), c.b(), c.a());
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        },
    );

    Some(RasterizedText {
        pixmap,
        bounds,
        padding,
    })
}
