//! Avatar acquisition.
//!
//! The pipeline only needs "reference in, decoded bitmap out"; everything
//! behind that seam is swappable. `HttpAvatarSource` covers the usual
//! hosted-avatar case, `FileAvatarSource` local rosters, and
//! `AutoAvatarSource` dispatches between them on the reference's scheme.
//! Fetch failures never abort a render: the caller substitutes a
//! deterministic placeholder disc.

use std::time::Duration;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::RgbaImage;

use crate::render::colors;

/// Fetch an avatar bitmap by reference (URL or filesystem path).
pub trait AvatarSource: Sync {
    fn fetch(&self, reference: &str) -> Result<RgbaImage>;
}

/// Fetches avatars over HTTP(S) with a blocking client.
pub struct HttpAvatarSource {
    client: reqwest::blocking::Client,
}

impl HttpAvatarSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl AvatarSource for HttpAvatarSource {
    fn fetch(&self, reference: &str) -> Result<RgbaImage> {
        let bytes = self
            .client
            .get(reference)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("avatar request failed: {reference}"))?
            .bytes()
            .with_context(|| format!("avatar body read failed: {reference}"))?;

        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("avatar decode failed: {reference}"))?;
        Ok(img.to_rgba8())
    }
}

/// Reads avatars from local image files.
pub struct FileAvatarSource;

impl AvatarSource for FileAvatarSource {
    fn fetch(&self, reference: &str) -> Result<RgbaImage> {
        let img = image::open(reference)
            .with_context(|| format!("avatar file open failed: {reference}"))?;
        Ok(img.to_rgba8())
    }
}

/// Dispatches to HTTP or filesystem by the reference's scheme.
pub struct AutoAvatarSource {
    http: HttpAvatarSource,
    file: FileAvatarSource,
}

impl AutoAvatarSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpAvatarSource::new()?,
            file: FileAvatarSource,
        })
    }
}

impl AvatarSource for AutoAvatarSource {
    fn fetch(&self, reference: &str) -> Result<RgbaImage> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            self.http.fetch(reference)
        } else {
            self.file.fetch(reference)
        }
    }
}

/// Center-crop to a square and resize to the target diameter.
pub fn fit_avatar(img: &RgbaImage, diameter: u32) -> RgbaImage {
    let side = img.width().min(img.height()).max(1);
    let left = (img.width() - side) / 2;
    let top = (img.height() - side) / 2;
    let cropped = image::imageops::crop_imm(img, left, top, side, side).to_image();
    image::imageops::resize(&cropped, diameter.max(1), diameter.max(1), FilterType::Lanczos3)
}

/// Deterministic stand-in for a missing or failed avatar: a flat tile in
/// the contact's name-hash color with a soft vertical gradient. The
/// compositor clips it to a disc like any real avatar.
pub fn placeholder(name: &str, diameter: u32) -> RgbaImage {
    let size = diameter.max(1);
    let base = colors::name_color(name);
    let mut img = RgbaImage::new(size, size);

    for y in 0..size {
        let t = y as f32 / size as f32;
        let row = base.lighten(0.14 * (1.0 - t));
        let rgba = image::Rgba(row.to_rgba8());
        for x in 0..size {
            img.put_pixel(x, y, rgba);
        }
    }

    img
}
