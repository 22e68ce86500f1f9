//! Self-contained PNG images passed between pipeline stages

use crate::error::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::DynamicImage;
use std::io::Cursor;

/// Prefix shared by every image produced by this crate.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A PNG image carried as a `data:image/png;base64,` URI.
///
/// Produced by the QR renderer and the asset loader, consumed by the
/// document composer. Rebuilt on every export invocation rather than cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    data_url: String,
}

impl RenderedImage {
    /// Wrap already-encoded PNG bytes in a data URL.
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self {
            data_url: format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes)),
        }
    }

    /// Encode a decoded image as PNG and wrap it in a data URL.
    pub fn encode(image: &DynamicImage) -> Result<Self> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| Error::PixelExtract(format!("PNG encoding failed: {e}")))?;
        Ok(Self::from_png_bytes(&bytes))
    }

    /// The full data URL.
    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }

    /// Recover the raw PNG bytes from the data URL.
    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        let encoded = self
            .data_url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| Error::Image("not a PNG data URL".to_string()))?;
        STANDARD
            .decode(encoded)
            .map_err(|e| Error::Image(format!("Invalid base64 payload: {e}")))
    }

    /// Decode into an RGB8 pixel buffer for PDF embedding.
    pub fn to_rgb8(&self) -> Result<image::RgbImage> {
        let image = image::load_from_memory(&self.png_bytes()?)?;
        Ok(image.to_rgb8())
    }
}
