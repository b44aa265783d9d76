pub mod packer;
pub mod sizer;

pub use packer::place;
pub use sizer::size_canvas;

/// Bounded working area for one layout pass. Owns no circles, merely
/// bounds them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

/// A circle committed to the canvas. `(x, y)` is the TOP-LEFT corner of
/// the bounding box, not the center; center = `(x + radius, y + radius)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl PlacedCircle {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.radius, self.y + self.radius)
    }
}

/// Configuration for canvas sizing and disk packing.
///
/// Defaults reproduce the reference rendering exactly; all fields are
/// caller-tunable.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Margin kept clear along every canvas edge (px)
    pub edge_padding: f32,
    /// Vertical strip reserved below each circle for its caption (px).
    /// Excluded from the placeable area, not just from visual overlap.
    pub caption_band: f32,
    /// Minimum-separation factor applied to the incoming circle's radius
    pub spacing_factor: f32,
    /// Tier-2: how many placed circles are drawn as cluster anchors
    pub max_anchor_tries: usize,
    /// Tier-2: candidate positions sampled around each anchor
    pub candidates_per_anchor: usize,
    /// Tier-3: uniform rejection-sampling attempts over the whole canvas
    pub uniform_tries: usize,
    /// Sizer: widens the grid toward landscape output (1.0 = square grid)
    pub aspect_bias: f32,
    /// Sizer: horizontal slack added around each grid cell (px)
    pub pad_h: f32,
    /// Sizer: vertical slack added around each grid cell (px)
    pub pad_v: f32,
    /// Minimum canvas width (px)
    pub min_width: f32,
    /// Minimum canvas height (px)
    pub min_height: f32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            edge_padding: 10.0,
            caption_band: 60.0,
            spacing_factor: 1.5,
            max_anchor_tries: 30,
            candidates_per_anchor: 30,
            uniform_tries: 100,
            aspect_bias: 1.6,
            pad_h: 10.0,
            pad_v: 10.0,
            min_width: 1000.0,
            min_height: 700.0,
        }
    }
}
