use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use affinity_cloud::avatar::AutoAvatarSource;
use affinity_cloud::cloud::{self, CloudConfig, Contact};
use affinity_cloud::render::TextRenderer;
use affinity_cloud::score::SizeRange;

/// Render a ranked contact roster as a packed avatar-cloud PNG.
#[derive(Parser, Debug)]
#[command(name = "affinity-cloud", version)]
struct Args {
    /// Roster JSON: an array of {id, name, avatar?, score? | interactions?}
    #[arg(long)]
    input: PathBuf,

    /// Output PNG path
    #[arg(long, default_value = "affinity-cloud.png")]
    output: PathBuf,

    /// Render only the top N contacts by score
    #[arg(long)]
    max: Option<usize>,

    /// Smallest avatar diameter (px)
    #[arg(long, default_value_t = 100.0)]
    min_size: f32,

    /// Largest avatar diameter (px)
    #[arg(long, default_value_t = 200.0)]
    max_size: f32,

    /// Skip name/share captions
    #[arg(long)]
    no_labels: bool,

    /// Seed the layout RNG for a reproducible arrangement
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("affinity_cloud=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let roster_json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read roster {}", args.input.display()))?;
    let roster: Vec<Contact> = serde_json::from_str(&roster_json)
        .with_context(|| format!("failed to parse roster {}", args.input.display()))?;
    tracing::info!("Loaded {} contacts from {}", roster.len(), args.input.display());

    let mut config = CloudConfig {
        sizes: SizeRange {
            min_diameter: args.min_size,
            max_diameter: args.max_size,
        },
        max_items: args.max,
        ..Default::default()
    };
    config.style.show_labels = !args.no_labels;

    let mut text_renderer = TextRenderer::new();
    if config.style.show_labels {
        if let Err(err) = text_renderer.load_system_font() {
            tracing::warn!("{err:#}; captions will be skipped");
        }
    }

    let source = AutoAvatarSource::new()?;
    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let rendered = cloud::render_cloud(&mut rng, roster, &source, &config, &mut text_renderer)?;

    rendered
        .image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(
        "Wrote {} ({:.0}x{:.0}, {} circles, {} fallback placements)",
        args.output.display(),
        rendered.canvas.width,
        rendered.canvas.height,
        rendered.placements.len(),
        rendered.fallback_count
    );

    Ok(())
}
