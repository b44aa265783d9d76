/// Diagnostic tool to verify the score → size → pack pipeline
use affinity_cloud::layout::{self, PackConfig, PlacedCircle};
use affinity_cloud::score::{self, ScoredItem, SizeRange};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("affinity_cloud=debug".parse().unwrap()),
        )
        .init();

    let count: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(40);
    let seed: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    println!("=== DIAGNOSTIC: Score → Size → Pack Pipeline ===");
    println!("Circles: {}, seed: {}", count, seed);

    // Synthetic roster with a long-tailed score distribution, deliberately
    // out of order so the ranking step has work to do
    let mut items: Vec<ScoredItem> = (0..count)
        .map(|i| ScoredItem {
            identity: format!("contact-{}", (i * 37) % count.max(1)),
            score: 100.0 * 0.93f32.powi(((i * 37) % count.max(1)) as i32),
        })
        .collect();
    score::rank_descending(&mut items);

    let scores: Vec<f32> = items.iter().map(|i| i.score).collect();
    let sizes = score::diameters(&scores, SizeRange::default());
    println!(
        "\n[1] Sizes: {:.0}px (top) down to {:.0}px (tail)",
        sizes.first().unwrap_or(&0.0),
        sizes.last().unwrap_or(&0.0)
    );

    let config = PackConfig::default();
    let average = sizes.iter().sum::<f32>() / sizes.len().max(1) as f32;
    let canvas = layout::size_canvas(count, average, &config);
    println!("\n[2] Canvas: {:.0}x{:.0} (avg diameter {:.0}px)", canvas.width, canvas.height, average);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut placed: Vec<PlacedCircle> = Vec::with_capacity(count);
    for &diameter in &sizes {
        let radius = diameter / 2.0;
        let (x, y) = layout::place(&mut rng, &placed, canvas, radius, &config);
        placed.push(PlacedCircle { x, y, radius });
    }

    println!("\n[3] First 10 placements:");
    for (i, c) in placed.iter().take(10).enumerate() {
        let (cx, cy) = c.center();
        println!(
            "    [{}] r={:.1} at center ({:.1}, {:.1})",
            i, c.radius, cx, cy
        );
    }

    // Check for anomalies
    println!("\n[4] Checking for anomalies:");

    let fallbacks = placed
        .iter()
        .skip(1)
        .filter(|c| c.x == config.edge_padding && c.y == config.edge_padding)
        .count();
    println!("    Corner fallbacks: {}", fallbacks);

    let mut bounds_violations = 0;
    for c in &placed {
        let (cx, cy) = c.center();
        let ok = cx >= config.edge_padding + c.radius
            && cx <= canvas.width - config.edge_padding - c.radius
            && cy >= config.edge_padding + c.radius
            && cy <= canvas.height - config.caption_band - config.edge_padding - c.radius;
        if !ok {
            bounds_violations += 1;
        }
    }
    println!("    Bounds violations (incl. fallbacks): {}", bounds_violations);

    let mut overlap_violations = 0;
    for later in 1..placed.len() {
        let b = placed[later];
        for a in &placed[..later] {
            let (ax, ay) = a.center();
            let (bx, by) = b.center();
            let min_allowed = a.radius + b.radius * config.spacing_factor;
            if (ax - bx).hypot(ay - by) < min_allowed - 1e-3 {
                overlap_violations += 1;
            }
        }
    }
    println!("    Margin violations (incl. fallbacks): {}", overlap_violations);

    let disc_area: f32 = placed
        .iter()
        .map(|c| std::f32::consts::PI * c.radius * c.radius)
        .sum();
    println!(
        "    Coverage: {:.1}% of {:.0}x{:.0} canvas",
        disc_area / (canvas.width * canvas.height) * 100.0,
        canvas.width,
        canvas.height
    );

    Ok(())
}
