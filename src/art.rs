//! Album art download and conversion to terminal glyphs

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{imageops::FilterType, GrayImage};

/// Darkest to brightest
const GLYPH_RAMP: &[u8] = b" .,:;ox%#@";

/// Turns an image reference into a block of text approximating it
#[async_trait]
pub trait ArtRenderer: Send + Sync {
    async fn render(&self, url: &str, width: u16, height: u16) -> Result<String>;
}

pub struct AsciiArtRenderer {
    http: reqwest::Client,
}

impl AsciiArtRenderer {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ArtRenderer for AsciiArtRenderer {
    async fn render(&self, url: &str, width: u16, height: u16) -> Result<String> {
        tracing::debug!(url, "Downloading album art");
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let (width, height) = (u32::from(width), u32::from(height));
        // Decoding and resizing is CPU bound, keep it off the async workers
        tokio::task::spawn_blocking(move || -> Result<String> {
            let image = image::load_from_memory(&bytes).context("failed to decode album art")?;
            let gray = image
                .resize_exact(width, height, FilterType::Triangle)
                .to_luma8();
            Ok(luma_to_glyphs(&gray))
        })
        .await?
    }
}

/// Maps each pixel's luminance onto [`GLYPH_RAMP`], one text line per pixel row
pub fn luma_to_glyphs(image: &GrayImage) -> String {
    let last = GLYPH_RAMP.len() - 1;
    image
        .rows()
        .map(|row| {
            row.map(|pixel| {
                let index = usize::from(pixel.0[0]) * last / 255;
                char::from(GLYPH_RAMP[index])
            })
            .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
