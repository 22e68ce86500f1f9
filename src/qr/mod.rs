//! QR code rasterization
//!
//! This module turns arbitrary text payloads into PNG data URLs. The two
//! production payloads (a vCard block and a plain feedback URL) share the
//! same renderer; nothing here assumes any particular payload shape.

mod encoder;

pub use encoder::QrEncoder;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// QR error-correction level, trading capacity for damage resilience
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EccLevel {
    /// ~7% recoverable
    L,
    /// ~15% recoverable
    #[default]
    M,
    /// ~25% recoverable
    Q,
    /// ~30% recoverable
    H,
}

impl EccLevel {
    pub(crate) fn as_qrcode(self) -> qrcode::EcLevel {
        match self {
            EccLevel::L => qrcode::EcLevel::L,
            EccLevel::M => qrcode::EcLevel::M,
            EccLevel::Q => qrcode::EcLevel::Q,
            EccLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Rendering options for a single QR rasterization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrRenderOptions {
    /// Error-correction level
    pub ecc_level: EccLevel,
    /// Quiet-zone width in modules on each side
    pub margin_modules: u32,
    /// Foreground color as a `#RRGGBB` hex string
    pub dark_color: String,
    /// Background color as a `#RRGGBB` hex string
    pub light_color: String,
    /// Output raster is exactly this many pixels square
    pub pixel_width: u32,
}

impl Default for QrRenderOptions {
    fn default() -> Self {
        Self {
            ecc_level: EccLevel::M,
            margin_modules: 1,
            dark_color: "#000000".to_string(),
            light_color: "#FFFFFF".to_string(),
            pixel_width: 200,
        }
    }
}

impl QrRenderOptions {
    /// Override the output pixel width, keeping the other options.
    pub fn with_pixel_width(mut self, pixel_width: u32) -> Self {
        self.pixel_width = pixel_width;
        self
    }
}

/// Build a QR symbol, distinguishing capacity overflow from other failures.
pub(crate) fn build_code(text: &str, ecc_level: EccLevel) -> Result<qrcode::QrCode> {
    qrcode::QrCode::with_error_correction_level(text.as_bytes(), ecc_level.as_qrcode()).map_err(
        |e| match e {
            qrcode::types::QrError::DataTooLong => Error::QrCapacity(format!(
                "{} bytes do not fit at the requested error-correction level",
                text.len()
            )),
            other => Error::QrEncode(format!("Failed to create QR code: {}", other)),
        },
    )
}

/// Parse a `#RRGGBB` (or `RRGGBB`) hex color.
pub(crate) fn parse_hex_color(value: &str) -> Result<image::Rgb<u8>> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Config(format!(
            "Invalid color '{value}', expected #RRGGBB"
        )));
    }
    let channel = |range| u8::from_str_radix(&digits[range], 16).unwrap_or(0);
    Ok(image::Rgb([channel(0..2), channel(2..4), channel(4..6)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#000000").unwrap(), image::Rgb([0, 0, 0]));
        assert_eq!(
            parse_hex_color("FFFFFF").unwrap(),
            image::Rgb([255, 255, 255])
        );
        assert_eq!(
            parse_hex_color("#7c3aed").unwrap(),
            image::Rgb([0x7c, 0x3a, 0xed])
        );
    }

    #[test]
    fn test_parse_hex_color_rejects_garbage() {
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("not-a-color").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_default_options() {
        let options = QrRenderOptions::default();
        assert_eq!(options.ecc_level, EccLevel::M);
        assert_eq!(options.margin_modules, 1);
        assert_eq!(options.pixel_width, 200);
        assert_eq!(options.with_pixel_width(500).pixel_width, 500);
    }
}
