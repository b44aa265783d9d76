use anyhow::{bail, Result};
use image::RgbaImage;
use rand::Rng;
use rayon::prelude::*;
use serde::Deserialize;

use crate::avatar::{self, AvatarSource};
use crate::layout::{self, Canvas, PackConfig, PlacedCircle};
use crate::render::{self, CloudItem, CloudStyle, TextRenderer};
use crate::score::weights::{affinity_score, InteractionCounts};
use crate::score::{self, SizeRange};

/// One roster entry. Either a precomputed `score` or raw `interactions`
/// must be present; with both, the explicit score wins.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    /// Avatar reference: URL or local path. Missing avatars render as
    /// name-colored placeholder discs.
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub interactions: Option<InteractionCounts>,
}

impl Contact {
    pub fn effective_score(&self) -> f32 {
        match (self.score, &self.interactions) {
            (Some(s), _) => s,
            (None, Some(counts)) => affinity_score(counts),
            (None, None) => 0.0,
        }
    }
}

/// Everything tunable about one rendering pass.
#[derive(Debug, Clone, Default)]
pub struct CloudConfig {
    pub pack: PackConfig,
    pub sizes: SizeRange,
    pub style: CloudStyle,
    /// Render only the top N contacts by score
    pub max_items: Option<usize>,
}

/// Result of one rendering pass, with enough detail for callers to log
/// or inspect what happened.
#[derive(Debug)]
pub struct RenderedCloud {
    pub image: RgbaImage,
    pub canvas: Canvas,
    pub placements: Vec<PlacedCircle>,
    /// Placements that exhausted every sampling tier and took the corner
    /// fallback (these may overlap)
    pub fallback_count: usize,
}

/// Run the full pipeline: rank, size, pack, prepare avatars, composite.
///
/// Layout is strictly sequential (each placement depends on the history
/// of all earlier ones); avatar fetch + resize runs in parallel once
/// positions are fixed. The layout core never fails — the only errors out
/// of here are an empty roster and nothing else.
pub fn render_cloud<R: Rng + ?Sized>(
    rng: &mut R,
    mut contacts: Vec<Contact>,
    source: &dyn AvatarSource,
    config: &CloudConfig,
    text_renderer: &mut TextRenderer,
) -> Result<RenderedCloud> {
    if contacts.is_empty() {
        bail!("no contacts to render");
    }

    contacts.sort_by(|a, b| b.effective_score().total_cmp(&a.effective_score()));
    if let Some(cap) = config.max_items {
        contacts.truncate(cap.max(1));
    }

    let scores: Vec<f32> = contacts.iter().map(|c| c.effective_score()).collect();
    let diameters = score::diameters(&scores, config.sizes);
    let shares = score::shares(&scores);

    let average = diameters.iter().sum::<f32>() / diameters.len() as f32;
    let canvas = layout::size_canvas(contacts.len(), average, &config.pack);
    tracing::info!(
        "Layout pass: {} contacts, avg diameter {:.0}px, canvas {:.0}x{:.0}",
        contacts.len(),
        average,
        canvas.width,
        canvas.height
    );

    // Sequential packing over the growing, append-only history.
    let mut placements: Vec<PlacedCircle> = Vec::with_capacity(contacts.len());
    let mut fallback_count = 0;
    for &diameter in &diameters {
        let radius = diameter / 2.0;
        let (x, y) = layout::place(rng, &placements, canvas, radius, &config.pack);
        if (x, y) == (config.pack.edge_padding, config.pack.edge_padding) && !placements.is_empty()
        {
            fallback_count += 1;
        }
        placements.push(PlacedCircle { x, y, radius });
    }
    if fallback_count > 0 {
        tracing::warn!(
            "{} of {} placements took the overlap-permitting corner fallback",
            fallback_count,
            placements.len()
        );
    }

    // Positions are fixed; avatar work is independent per item.
    let avatars: Vec<RgbaImage> = contacts
        .par_iter()
        .zip(diameters.par_iter())
        .map(|(contact, &diameter)| prepare_avatar(source, contact, diameter.ceil() as u32))
        .collect();

    let items: Vec<CloudItem> = contacts
        .iter()
        .zip(avatars)
        .enumerate()
        .map(|(rank, (contact, avatar))| CloudItem {
            name: contact.name.clone(),
            share: shares[rank],
            rank,
            circle: placements[rank],
            avatar,
        })
        .collect();

    let image = render::compose(canvas, &items, &config.style, text_renderer);

    Ok(RenderedCloud {
        image,
        canvas,
        placements,
        fallback_count,
    })
}

/// Fetch and fit one avatar, degrading to the placeholder on any failure.
fn prepare_avatar(source: &dyn AvatarSource, contact: &Contact, diameter: u32) -> RgbaImage {
    let Some(reference) = contact.avatar.as_deref() else {
        tracing::debug!("No avatar reference for '{}', using placeholder", contact.name);
        return avatar::placeholder(&contact.name, diameter);
    };

    match source.fetch(reference) {
        Ok(img) => avatar::fit_avatar(&img, diameter),
        Err(err) => {
            tracing::warn!("Avatar for '{}' unavailable ({err:#}), using placeholder", contact.name);
            avatar::placeholder(&contact.name, diameter)
        }
    }
}
