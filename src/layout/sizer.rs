use super::{Canvas, PackConfig};

/// Derive a working area large enough to plausibly hold `item_count`
/// circles of roughly `average_diameter` px each.
///
/// The item grid is widened by `aspect_bias` so the output leans
/// landscape. Each grid row reserves the caption band below its circles
/// in addition to the vertical padding. Pure and failure-free; degenerate
/// inputs clamp to a 1-item grid and the configured floors.
pub fn size_canvas(item_count: usize, average_diameter: f32, config: &PackConfig) -> Canvas {
    let count = item_count.max(1) as f32;
    let avg = if average_diameter.is_finite() && average_diameter > 0.0 {
        average_diameter
    } else {
        1.0
    };

    let cols = (count * config.aspect_bias).sqrt().ceil().max(1.0);
    let rows = (count / cols).ceil().max(1.0);

    let width = (cols * (avg + config.pad_h) + config.pad_h).max(config.min_width);
    let height =
        (rows * (avg + config.caption_band + config.pad_v) + config.pad_v).max(config.min_height);

    tracing::debug!(
        "Canvas sized for {} items (avg {:.0}px): {}x{} grid -> {:.0}x{:.0}px",
        item_count,
        avg,
        cols,
        rows,
        width,
        height
    );

    Canvas { width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_item_respects_floors() {
        let canvas = size_canvas(1, 150.0, &PackConfig::default());
        assert!(canvas.width >= 1000.0);
        assert!(canvas.height >= 700.0);
    }

    #[test]
    fn grid_always_covers_item_count() {
        let config = PackConfig::default();
        for count in 1..=400usize {
            let c = count as f32;
            let cols = (c * config.aspect_bias).sqrt().ceil().max(1.0);
            let rows = (c / cols).ceil().max(1.0);
            assert!(
                cols * rows >= c,
                "{} items split into {}x{} grid",
                count,
                cols,
                rows
            );
        }
    }

    #[test]
    fn large_batches_grow_past_the_floors() {
        let canvas = size_canvas(60, 180.0, &PackConfig::default());
        assert!(canvas.width > 1000.0);
        assert!(canvas.height > 700.0);
    }

    #[test]
    fn wider_than_tall_for_square_grid_inputs() {
        // aspect_bias > 1 should lean landscape for most batch sizes
        let canvas = size_canvas(40, 150.0, &PackConfig::default());
        assert!(canvas.width >= canvas.height);
    }

    #[test]
    fn degenerate_inputs_still_produce_a_canvas() {
        let canvas = size_canvas(0, 0.0, &PackConfig::default());
        assert!(canvas.width >= 1000.0);
        assert!(canvas.height >= 700.0);
    }
}
