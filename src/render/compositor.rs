use image::RgbaImage;

use crate::layout::{Canvas, PlacedCircle};

use super::colors::{self, CloudColor};
use super::text::{self, TextRenderer};

/// Visual styling for the composited cloud.
#[derive(Debug, Clone)]
pub struct CloudStyle {
    /// Canvas backdrop
    pub background: CloudColor,
    /// Rank ring thickness (px)
    pub ring_width: f32,
    /// Caption font size for the contact name (px)
    pub label_font_size: f32,
    /// Draw name + share captions beneath each circle
    pub show_labels: bool,
}

impl Default for CloudStyle {
    fn default() -> Self {
        Self {
            // dark neutral, same register as the rest of the dark UI
            background: CloudColor::new(0.078, 0.086, 0.11),
            ring_width: 6.0,
            label_font_size: 16.0,
            show_labels: true,
        }
    }
}

/// One fully prepared item: placed, ranked, avatar decoded.
pub struct CloudItem {
    pub name: String,
    /// Percentage share of the batch's total affinity
    pub share: f32,
    /// 0 = closest contact
    pub rank: usize,
    pub circle: PlacedCircle,
    pub avatar: RgbaImage,
}

/// CPU-rasterize the finished layout into an RGBA image.
///
/// Items are drawn in rank order. Each circle clips its avatar to a disc
/// with an antialiased rim, strokes a rank-colored ring just inside the
/// rim, and (font permitting) draws the name and share in the caption
/// band reserved below the circle. Positions may overlap when the packer
/// degraded to its corner fallback; later items simply draw over earlier
/// ones in that case.
pub fn compose(
    canvas: Canvas,
    items: &[CloudItem],
    style: &CloudStyle,
    text_renderer: &mut TextRenderer,
) -> RgbaImage {
    let width = canvas.width.ceil() as u32;
    let height = canvas.height.ceil() as u32;
    let mut out = RgbaImage::from_pixel(width, height, image::Rgba(style.background.to_rgba8()));

    tracing::info!(
        "Compositing {} circles into {}x{} canvas",
        items.len(),
        width,
        height
    );

    for item in items {
        draw_disc(&mut out, item, style, items.len());
        if style.show_labels {
            draw_caption(&mut out, item, style, text_renderer);
        }
    }

    out
}

fn draw_disc(out: &mut RgbaImage, item: &CloudItem, style: &CloudStyle, total: usize) {
    let r = item.circle.radius;
    let (cx, cy) = item.circle.center();
    let diameter = 2.0 * r;
    let ring = colors::rank_ring_color(item.rank, total);
    let (aw, ah) = (item.avatar.width(), item.avatar.height());
    if aw == 0 || ah == 0 {
        tracing::warn!("Empty avatar bitmap for '{}', skipping disc", item.name);
        return;
    }

    // Pixel bounds (clamped to buffer)
    let px0 = (item.circle.x.floor().max(0.0)) as u32;
    let py0 = (item.circle.y.floor().max(0.0)) as u32;
    let px1 = ((item.circle.x + diameter).ceil() as u32).min(out.width());
    let py1 = ((item.circle.y + diameter).ceil() as u32).min(out.height());

    for py in py0..py1 {
        let fy = py as f32 + 0.5;
        for px in px0..px1 {
            let fx = px as f32 + 0.5;
            let dist = (fx - cx).hypot(fy - cy);

            // coverage fades over the outermost pixel of the rim
            let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            // 0 inside the avatar area, rising to 1 across the ring edge
            let ring_mix = (dist - (r - style.ring_width) + 0.5).clamp(0.0, 1.0);

            let (sr, sg, sb, sa) = if ring_mix >= 1.0 {
                (ring.r, ring.g, ring.b, 1.0)
            } else {
                // sample the avatar, scaled onto the disc's bounding box
                let u = ((fx - item.circle.x) / diameter * aw as f32) as u32;
                let v = ((fy - item.circle.y) / diameter * ah as f32) as u32;
                let p = item.avatar.get_pixel(u.min(aw - 1), v.min(ah - 1));
                let a = p.0[3] as f32 / 255.0;
                let (ar, ag, ab) = (
                    p.0[0] as f32 / 255.0,
                    p.0[1] as f32 / 255.0,
                    p.0[2] as f32 / 255.0,
                );
                (
                    ar + (ring.r - ar) * ring_mix,
                    ag + (ring.g - ag) * ring_mix,
                    ab + (ring.b - ab) * ring_mix,
                    a + (1.0 - a) * ring_mix,
                )
            };

            blend_pixel(out, px, py, sr, sg, sb, sa * coverage);
        }
    }
}

fn draw_caption(
    out: &mut RgbaImage,
    item: &CloudItem,
    style: &CloudStyle,
    text_renderer: &mut TextRenderer,
) {
    if !text_renderer.has_font() {
        return;
    }

    let diameter = 2.0 * item.circle.radius;
    // captions may spill slightly past narrow circles
    let max_width = (diameter * 1.4).max(60.0);
    let (cx, _) = item.circle.center();
    let mut baseline = (item.circle.y + diameter + 4.0) as i32;

    let name = text::truncate_label(&item.name, max_width, style.label_font_size);
    if !name.is_empty() {
        if let Some(line) = text_renderer.render_line(&name, style.label_font_size, Some(max_width))
        {
            let x = cx as i32 - line.width as i32 / 2;
            text::blit_line(out, &line, x, baseline, CloudColor::new(0.92, 0.93, 0.95));
            baseline += line.height as i32 + 2;
        }
    }

    let share = format!("{:.1}%", item.share);
    if let Some(line) =
        text_renderer.render_line(&share, style.label_font_size * 0.85, Some(max_width))
    {
        let x = cx as i32 - line.width as i32 / 2;
        text::blit_line(out, &line, x, baseline, CloudColor::new(0.62, 0.65, 0.72));
    }
}

/// Source-over blend of one premultiplied-coverage sample.
fn blend_pixel(out: &mut RgbaImage, px: u32, py: u32, r: f32, g: f32, b: f32, alpha: f32) {
    let pixel = out.get_pixel_mut(px, py);
    let a = alpha.clamp(0.0, 1.0);
    let inv = 1.0 - a;
    pixel.0[0] = ((r * a + pixel.0[0] as f32 / 255.0 * inv) * 255.0) as u8;
    pixel.0[1] = ((g * a + pixel.0[1] as f32 / 255.0 * inv) * 255.0) as u8;
    pixel.0[2] = ((b * a + pixel.0[2] as f32 / 255.0 * inv) * 255.0) as u8;
    pixel.0[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_avatar(size: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(size, size, image::Rgba(rgba))
    }

    fn centered_item(canvas: Canvas, radius: f32) -> CloudItem {
        CloudItem {
            name: "test".into(),
            share: 100.0,
            rank: 0,
            circle: PlacedCircle {
                x: canvas.width / 2.0 - radius,
                y: canvas.height / 2.0 - radius,
                radius,
            },
            avatar: solid_avatar(64, [200, 30, 30, 255]),
        }
    }

    #[test]
    fn disc_interior_shows_the_avatar() {
        let canvas = Canvas { width: 300.0, height: 300.0 };
        let item = centered_item(canvas, 60.0);
        let out = compose(canvas, &[item], &CloudStyle::default(), &mut TextRenderer::new());

        let center = out.get_pixel(150, 150);
        assert!(center.0[0] > 150, "center should be avatar red, got {:?}", center);
        assert!(center.0[1] < 80);
    }

    #[test]
    fn outside_the_disc_stays_background() {
        let canvas = Canvas { width: 300.0, height: 300.0 };
        let style = CloudStyle::default();
        let item = centered_item(canvas, 60.0);
        let out = compose(canvas, &[item], &style, &mut TextRenderer::new());

        assert_eq!(out.get_pixel(5, 5).0, style.background.to_rgba8());
        // just past the rim along +x: center (150,150), radius 60
        assert_eq!(out.get_pixel(215, 150).0, style.background.to_rgba8());
    }

    #[test]
    fn rim_band_is_ring_colored_not_avatar_colored() {
        let canvas = Canvas { width: 300.0, height: 300.0 };
        let item = centered_item(canvas, 60.0);
        let ring = colors::rank_ring_color(0, 1).to_rgba8();
        let out = compose(canvas, &[item], &CloudStyle::default(), &mut TextRenderer::new());

        // middle of the 6px ring band on the +x axis
        let p = out.get_pixel(150 + 57, 150);
        assert!((p.0[0] as i32 - ring[0] as i32).abs() < 12, "{:?} vs {:?}", p, ring);
        assert!((p.0[1] as i32 - ring[1] as i32).abs() < 12);
        assert!((p.0[2] as i32 - ring[2] as i32).abs() < 12);
    }

    #[test]
    fn offscreen_fallback_placements_do_not_panic() {
        let canvas = Canvas { width: 200.0, height: 200.0 };
        let item = CloudItem {
            name: "big".into(),
            share: 50.0,
            rank: 1,
            circle: PlacedCircle { x: 10.0, y: 10.0, radius: 400.0 },
            avatar: solid_avatar(16, [10, 200, 10, 255]),
        };
        let out = compose(canvas, &[item], &CloudStyle::default(), &mut TextRenderer::new());
        assert_eq!(out.dimensions(), (200, 200));
    }
}
