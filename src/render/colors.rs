/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl CloudColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert to packed 8-bit RGBA for the pixel buffer.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0) as u8,
            (self.g.clamp(0.0, 1.0) * 255.0) as u8,
            (self.b.clamp(0.0, 1.0) * 255.0) as u8,
            (self.a.clamp(0.0, 1.0) * 255.0) as u8,
        ]
    }

    /// Create a lighter version (for ring highlights).
    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }

    /// Create a darker version (for the canvas backdrop).
    pub fn darken(self, amount: f32) -> Self {
        Self {
            r: (self.r - amount).max(0.0),
            g: (self.g - amount).max(0.0),
            b: (self.b - amount).max(0.0),
            a: self.a,
        }
    }
}

/// Ring color for a circle by rank. Rank 0 (closest contact) gets a warm
/// gold; the ramp cools toward blue for the tail of the batch.
pub fn rank_ring_color(rank: usize, total: usize) -> CloudColor {
    let t = if total <= 1 {
        0.0
    } else {
        rank as f32 / (total - 1) as f32
    };
    // hue 46° (gold) -> 215° (blue)
    let hue = (46.0 + t * 169.0) / 360.0;
    hsv_to_rgb(hue, 0.72, 0.92)
}

/// Placeholder avatars are colored by a hash of the contact's name, so a
/// contact keeps its color across renders without any stored state.
pub fn name_color(name: &str) -> CloudColor {
    let h = hash01(name);
    hsv_to_rgb(h, 0.55, 0.78)
}

pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> CloudColor {
    let h6 = (h * 6.0).rem_euclid(6.0);
    let i = h6.floor() as i32;
    let f = h6 - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    CloudColor { r, g, b, a: 1.0 }
}

fn hash01(s: &str) -> f32 {
    let mut h: u32 = 2166136261;
    for &b in s.as_bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(16777619);
    }
    ((h >> 8) as f32) / ((u32::MAX >> 8) as f32)
}
