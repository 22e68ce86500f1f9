//! QR code encoder

use crate::error::Result;
use crate::qr::{QrRenderOptions, build_code, parse_hex_color};
use crate::render::RenderedImage;
use image::{DynamicImage, Luma, RgbImage, imageops};

/// QR code encoder producing PNG data URLs
#[derive(Debug, Default)]
pub struct QrEncoder;

impl QrEncoder {
    /// Create a new QR encoder
    pub fn new() -> Self {
        Self
    }

    /// Encode text into a QR code raster per the given options.
    ///
    /// The output is exactly `options.pixel_width` pixels square, including
    /// `options.margin_modules` quiet-zone modules on each side.
    pub fn encode(&self, text: &str, options: &QrRenderOptions) -> Result<DynamicImage> {
        let dark = parse_hex_color(&options.dark_color)?;
        let light = parse_hex_color(&options.light_color)?;

        let code = build_code(text, options.ecc_level)?;

        let modules = code.width() as u32;
        let total_modules = modules + 2 * options.margin_modules;
        let scale = (options.pixel_width / total_modules).max(1);

        let matrix: image::GrayImage = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(scale, scale)
            .build();

        // Pad the quiet zone and map the module matrix onto the palette.
        let margin_px = options.margin_modules * scale;
        let side = matrix.width() + 2 * margin_px;
        let mut canvas = RgbImage::from_pixel(side, side, light);
        for (x, y, pixel) in matrix.enumerate_pixels() {
            if pixel[0] == 0 {
                canvas.put_pixel(x + margin_px, y + margin_px, dark);
            }
        }

        let canvas = if side != options.pixel_width {
            imageops::resize(
                &canvas,
                options.pixel_width,
                options.pixel_width,
                imageops::FilterType::Nearest,
            )
        } else {
            canvas
        };

        Ok(DynamicImage::ImageRgb8(canvas))
    }

    /// Encode text and wrap the PNG raster in a data URL.
    pub fn render_data_url(&self, text: &str, options: &QrRenderOptions) -> Result<RenderedImage> {
        let image = self.encode(text, options)?;
        RenderedImage::encode(&image)
    }
}
