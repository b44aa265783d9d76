use std::f32::consts::TAU;

use rand::Rng;

use super::{Canvas, PackConfig, PlacedCircle};

/// Find a spot for one new circle of `radius` against the already-placed
/// history. Returns the TOP-LEFT corner of the new circle's bounding box.
///
/// Three strategies are tried in turn, each returning the first candidate
/// it can validate:
///
/// 1. empty history: dead center of the canvas;
/// 2. neighbor-seeded sampling: candidates thrown around randomly chosen
///    existing circles, which is what makes the output cluster instead of
///    scattering uniformly;
/// 3. uniform rejection sampling over the whole placeable rectangle.
///
/// If everything fails the top-left of the placeable rectangle is
/// returned even though it may overlap: the packer never fails and never
/// panics, dense canvases simply degrade.
///
/// `history` is never touched; the caller appends the returned placement
/// before the next call.
pub fn place<R: Rng + ?Sized>(
    rng: &mut R,
    history: &[PlacedCircle],
    canvas: Canvas,
    radius: f32,
    config: &PackConfig,
) -> (f32, f32) {
    if history.is_empty() {
        return (
            canvas.width / 2.0 - radius,
            canvas.height / 2.0 - radius,
        );
    }

    seeded_candidate(rng, history, canvas, radius, config)
        .or_else(|| uniform_candidate(rng, history, canvas, radius, config))
        .unwrap_or_else(|| {
            tracing::warn!(
                "No valid spot for r={:.1} circle among {} placed; falling back to corner",
                radius,
                history.len()
            );
            (config.edge_padding, config.edge_padding)
        })
}

/// Tier 2: throw candidates around randomly chosen existing circles.
fn seeded_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    history: &[PlacedCircle],
    canvas: Canvas,
    radius: f32,
    config: &PackConfig,
) -> Option<(f32, f32)> {
    let min_dist = radius * config.spacing_factor;

    for _ in 0..config.max_anchor_tries {
        let base = &history[rng.random_range(0..history.len())];
        let (bx, by) = base.center();

        for _ in 0..config.candidates_per_anchor {
            let angle = rng.random_range(0.0..TAU);
            let dist = sample_range(rng, min_dist, 2.0 * min_dist);
            let cx = bx + angle.cos() * dist;
            let cy = by + angle.sin() * dist;

            if is_valid_center(cx, cy, radius, history, canvas, config) {
                return Some((cx - radius, cy - radius));
            }
        }
    }

    None
}

/// Tier 3: uniform rejection sampling over the placeable rectangle.
fn uniform_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    history: &[PlacedCircle],
    canvas: Canvas,
    radius: f32,
    config: &PackConfig,
) -> Option<(f32, f32)> {
    let (x_min, x_max, y_min, y_max) = center_bounds(radius, canvas, config);
    if x_min > x_max || y_min > y_max {
        // circle does not fit the canvas at all
        return None;
    }

    for _ in 0..config.uniform_tries {
        let cx = sample_range(rng, x_min, x_max);
        let cy = sample_range(rng, y_min, y_max);
        if is_valid_center(cx, cy, radius, history, canvas, config) {
            return Some((cx - radius, cy - radius));
        }
    }

    None
}

/// Valid range for a new circle's CENTER: the edge margin on all sides
/// plus the caption band along the bottom.
fn center_bounds(radius: f32, canvas: Canvas, config: &PackConfig) -> (f32, f32, f32, f32) {
    (
        config.edge_padding + radius,
        canvas.width - config.edge_padding - radius,
        config.edge_padding + radius,
        canvas.height - config.caption_band - config.edge_padding - radius,
    )
}

/// Validity of a candidate center: inside the placeable rectangle, and at
/// least `(c.radius + radius) + (min_dist - radius)` away from every
/// placed circle's center. The margin scales with the NEW circle's radius
/// only; existing circles contribute their bare radius. Asymmetric, but
/// the visible inter-avatar gaps depend on it, so it is kept exactly.
fn is_valid_center(
    cx: f32,
    cy: f32,
    radius: f32,
    history: &[PlacedCircle],
    canvas: Canvas,
    config: &PackConfig,
) -> bool {
    let (x_min, x_max, y_min, y_max) = center_bounds(radius, canvas, config);
    if cx < x_min || cx > x_max || cy < y_min || cy > y_max {
        return false;
    }

    let min_dist = radius * config.spacing_factor;
    history.iter().all(|c| {
        let (ox, oy) = c.center();
        let min_allowed = (c.radius + radius) + (min_dist - radius);
        (cx - ox).hypot(cy - oy) >= min_allowed
    })
}

/// `random_range` panics on an empty range; degenerate intervals collapse
/// to their start instead.
fn sample_range<R: Rng + ?Sized>(rng: &mut R, start: f32, end: f32) -> f32 {
    if end - start <= f32::EPSILON {
        start
    } else {
        rng.random_range(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn default_canvas() -> Canvas {
        Canvas {
            width: 1200.0,
            height: 800.0,
        }
    }

    fn place_batch(radii: &[f32], canvas: Canvas, seed: u64) -> Vec<PlacedCircle> {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = PackConfig::default();
        let mut placed = Vec::with_capacity(radii.len());
        for &radius in radii {
            let (x, y) = place(&mut rng, &placed, canvas, radius, &config);
            placed.push(PlacedCircle { x, y, radius });
        }
        placed
    }

    fn is_corner_fallback(c: &PlacedCircle, config: &PackConfig) -> bool {
        c.x == config.edge_padding && c.y == config.edge_padding
    }

    #[test]
    fn empty_history_places_dead_center() {
        let mut rng = StdRng::seed_from_u64(7);
        let canvas = default_canvas();
        let (x, y) = place(&mut rng, &[], canvas, 75.0, &PackConfig::default());
        assert_eq!((x, y), (1200.0 / 2.0 - 75.0, 800.0 / 2.0 - 75.0));
    }

    #[test]
    fn placements_stay_inside_the_placeable_rectangle() {
        let config = PackConfig::default();
        let canvas = default_canvas();
        let radii = [100.0, 90.0, 80.0, 75.0, 70.0, 65.0, 60.0, 55.0, 50.0, 50.0];

        for seed in 0..8u64 {
            for c in place_batch(&radii, canvas, seed) {
                if is_corner_fallback(&c, &config) {
                    continue;
                }
                let (cx, cy) = c.center();
                assert!(cx >= config.edge_padding + c.radius);
                assert!(cx <= canvas.width - config.edge_padding - c.radius);
                assert!(cy >= config.edge_padding + c.radius);
                assert!(
                    cy <= canvas.height - config.caption_band - config.edge_padding - c.radius,
                    "caption band must stay clear (cy={:.1}, r={:.1})",
                    cy,
                    c.radius
                );
            }
        }
    }

    #[test]
    fn pairwise_separation_honors_the_margin_rule() {
        let config = PackConfig::default();
        let canvas = default_canvas();
        let radii = [100.0, 90.0, 80.0, 70.0, 65.0, 60.0, 55.0, 50.0];

        for seed in 0..8u64 {
            let placed = place_batch(&radii, canvas, seed);
            for later in 1..placed.len() {
                let b = placed[later];
                if is_corner_fallback(&b, &config) {
                    continue;
                }
                for a in &placed[..later] {
                    let (ax, ay) = a.center();
                    let (bx, by) = b.center();
                    // b was placed later, so the inflation uses b's radius
                    let min_allowed =
                        (a.radius + b.radius) + (b.radius * config.spacing_factor - b.radius);
                    let dist = (ax - bx).hypot(ay - by);
                    assert!(
                        dist >= min_allowed - 1e-3,
                        "seed {}: circles {:.1} apart, need {:.1}",
                        seed,
                        dist,
                        min_allowed
                    );
                }
            }
        }
    }

    #[test]
    fn history_is_never_mutated() {
        let mut rng = StdRng::seed_from_u64(3);
        let canvas = default_canvas();
        let history = vec![PlacedCircle {
            x: 500.0,
            y: 300.0,
            radius: 80.0,
        }];
        let snapshot = history.clone();
        let _ = place(&mut rng, &history, canvas, 60.0, &PackConfig::default());
        assert_eq!(history, snapshot);
    }

    #[test]
    fn saturated_canvas_degrades_to_the_corner_without_panicking() {
        let config = PackConfig::default();
        // canvas sized for ~25 circles, flooded with 200
        let canvas = crate::layout::size_canvas(25, 120.0, &config);
        let radii = vec![60.0f32; 200];
        let placed = place_batch(&radii, canvas, 11);

        assert_eq!(placed.len(), 200);
        assert!(placed.iter().all(|c| c.x.is_finite() && c.y.is_finite()));
        // the flood must eventually exhaust tiers 2-3
        assert!(placed.iter().any(|c| is_corner_fallback(c, &config)));
    }

    #[test]
    fn oversized_circle_falls_back_instead_of_panicking() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PackConfig::default();
        let canvas = Canvas {
            width: 300.0,
            height: 300.0,
        };
        let history = vec![PlacedCircle {
            x: 50.0,
            y: 50.0,
            radius: 40.0,
        }];
        // radius larger than the placeable rectangle on every axis
        let (x, y) = place(&mut rng, &history, canvas, 400.0, &config);
        assert_eq!((x, y), (config.edge_padding, config.edge_padding));
    }
}
