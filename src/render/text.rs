use std::path::PathBuf;

use anyhow::{anyhow, Result};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::Font;
use image::RgbaImage;

use super::colors::CloudColor;

/// Rasterizes caption text with fontdue and blits it into the CPU pixel
/// buffer. One font is enough for captions; the loader walks a list of
/// common system font locations and takes the first that parses.
pub struct TextRenderer {
    font: Option<Font>,
    layout: Layout,
}

/// One rasterized glyph: coverage bitmap plus its offset within the line.
struct TextGlyph {
    x: f32,
    y: f32,
    width: usize,
    height: usize,
    coverage: Vec<u8>,
}

/// A laid-out line of text ready to blit.
pub struct TextLine {
    glyphs: Vec<TextGlyph>,
    pub width: u32,
    pub height: u32,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            font: None,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Load a caption font from well-known system locations. Failure is
    /// tolerated by callers (captions are skipped), but reported so the
    /// log shows why labels are missing.
    pub fn load_system_font(&mut self) -> Result<()> {
        let mut candidates: Vec<PathBuf> = vec![
            PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"),
            PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"),
            PathBuf::from("/System/Library/Fonts/Helvetica.ttc"),
            PathBuf::from("C:\\Windows\\Fonts\\segoeui.ttf"),
            PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"),
        ];

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.insert(0, PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
        }

        for path in candidates {
            let Ok(font_data) = std::fs::read(&path) else {
                continue;
            };
            if let Ok(font) = Font::from_bytes(font_data, fontdue::FontSettings::default()) {
                tracing::info!("Loaded caption font from {}", path.display());
                self.font = Some(font);
                return Ok(());
            }
        }

        Err(anyhow!("unable to load a caption font from known locations"))
    }

    /// Load a caption font from explicit TTF/OTF bytes (tests, bundled fonts).
    pub fn load_font_bytes(&mut self, data: Vec<u8>) -> Result<()> {
        let font = Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("font parse failed: {e}"))?;
        self.font = Some(font);
        Ok(())
    }

    /// Lay out and rasterize one line. Returns None when no font is
    /// loaded or the text produces no visible glyphs.
    pub fn render_line(
        &mut self,
        text: &str,
        font_size: f32,
        max_width: Option<f32>,
    ) -> Option<TextLine> {
        let font = self.font.as_ref()?;

        self.layout.reset(&LayoutSettings {
            max_width,
            ..Default::default()
        });
        self.layout.append(&[font], &TextStyle::new(text, font_size, 0));

        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for glyph in self.layout.glyphs() {
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }

            width = width.max(glyph.x + metrics.width as f32);
            height = height.max(glyph.y + metrics.height as f32);
            glyphs.push(TextGlyph {
                x: glyph.x,
                y: glyph.y,
                width: metrics.width,
                height: metrics.height,
                coverage,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextLine {
            glyphs,
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        })
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Alpha-blend a rasterized line into the canvas at `(origin_x, origin_y)`.
/// Pixels falling outside the canvas are dropped.
pub fn blit_line(canvas: &mut RgbaImage, line: &TextLine, origin_x: i32, origin_y: i32, color: CloudColor) {
    let [cr, cg, cb, _] = color.to_rgba8();
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);

    for glyph in &line.glyphs {
        for gy in 0..glyph.height {
            let py = origin_y + glyph.y as i32 + gy as i32;
            if py < 0 || py >= h {
                continue;
            }
            for gx in 0..glyph.width {
                let px = origin_x + glyph.x as i32 + gx as i32;
                if px < 0 || px >= w {
                    continue;
                }
                let alpha = glyph.coverage[gy * glyph.width + gx] as u32;
                if alpha == 0 {
                    continue;
                }
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                for (dst, &src) in pixel.0.iter_mut().take(3).zip([cr, cg, cb].iter()) {
                    let blended = (src as u32 * alpha + *dst as u32 * (255 - alpha)) / 255;
                    *dst = blended as u8;
                }
            }
        }
    }
}

/// Shorten `text` with an ellipsis so it plausibly fits `max_width` px at
/// `font_size`. Character-count heuristic, same as the treeline labels it
/// replaces; exact fitting is not worth a second layout pass.
pub fn truncate_label(text: &str, max_width: f32, font_size: f32) -> String {
    let approx_char_w = font_size * 0.55;
    let max_chars = (max_width / approx_char_w).floor() as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 1 {
        return String::new();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}
