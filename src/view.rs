//! Terminal previews and viewport-dependent QR sizing
//!
//! The on-screen QR pixel size shrinks below fixed breakpoints. Viewport
//! width is an explicit input here rather than observed ambient state.

use crate::error::Result;
use crate::qr::{EccLevel, build_code};
use qrcode::render::unicode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upper bound (exclusive) of the narrow viewport class, in pixels
pub const NARROW_BELOW_PX: u32 = 640;
/// Upper bound (exclusive) of the medium viewport class, in pixels
pub const MEDIUM_BELOW_PX: u32 = 1024;

/// Display-size class selecting the on-screen QR pixel size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    /// Below 640 px: shrink the base size by 50 px
    Narrow,
    /// Below 1024 px: shrink the base size by 20 px
    Medium,
    /// Full base size
    #[default]
    Wide,
}

impl ViewportClass {
    /// Classify a viewport width in pixels.
    pub fn from_width(width_px: u32) -> Self {
        if width_px < NARROW_BELOW_PX {
            Self::Narrow
        } else if width_px < MEDIUM_BELOW_PX {
            Self::Medium
        } else {
            Self::Wide
        }
    }

    /// On-screen QR pixel size for a given base size.
    pub fn scaled_size(self, base_px: u32) -> u32 {
        match self {
            Self::Narrow => base_px.saturating_sub(50),
            Self::Medium => base_px.saturating_sub(20),
            Self::Wide => base_px,
        }
    }

    /// Parse a viewport class identifier (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "narrow" => Some(Self::Narrow),
            "medium" => Some(Self::Medium),
            "wide" => Some(Self::Wide),
            _ => None,
        }
    }
}

impl FromStr for ViewportClass {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!("Unsupported viewport class '{value}', expected narrow, medium, or wide")
        })
    }
}

/// Render a payload as a Unicode block QR for terminal display.
pub fn terminal_qr(text: &str, ecc_level: EccLevel) -> Result<String> {
    let code = build_code(text, ecc_level)?;

    Ok(code
        .render::<unicode::Dense1x2>()
        .quiet_zone(true)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(ViewportClass::from_width(0), ViewportClass::Narrow);
        assert_eq!(ViewportClass::from_width(639), ViewportClass::Narrow);
        assert_eq!(ViewportClass::from_width(640), ViewportClass::Medium);
        assert_eq!(ViewportClass::from_width(1023), ViewportClass::Medium);
        assert_eq!(ViewportClass::from_width(1024), ViewportClass::Wide);
    }

    #[test]
    fn test_scaled_sizes() {
        assert_eq!(ViewportClass::Narrow.scaled_size(300), 250);
        assert_eq!(ViewportClass::Medium.scaled_size(300), 280);
        assert_eq!(ViewportClass::Wide.scaled_size(300), 300);
        // Saturates instead of wrapping for tiny bases.
        assert_eq!(ViewportClass::Narrow.scaled_size(30), 0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("narrow".parse::<ViewportClass>().unwrap(), ViewportClass::Narrow);
        assert_eq!("WIDE".parse::<ViewportClass>().unwrap(), ViewportClass::Wide);
        assert!("huge".parse::<ViewportClass>().is_err());
    }

    #[test]
    fn test_terminal_qr_renders() {
        let art = terminal_qr("https://example.com/feedback", EccLevel::M).unwrap();
        assert!(!art.is_empty());
        assert!(art.lines().count() > 10);
    }
}
