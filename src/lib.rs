//! QCARD - QR contact card and feedback-link PDF exporter
//!
//! This library renders a business contact as a scannable vCard QR code plus
//! a feedback-link QR code and exports both as fixed-layout A4 PDF
//! documents.
//!
//! # Features
//!
//! - **vCard Encoding**: deterministic vCard 3.0 text from a contact record
//! - **QR Rendering**: PNG data URLs with configurable error correction,
//!   quiet zone, palette, and pixel width
//! - **Graceful Degradation**: exports always produce a file, substituting a
//!   placeholder when the QR image or logo is unavailable
//! - **Async-first**: logo assets load in the background on Tokio and
//!   exports await them explicitly
//!
//! # Example
//!
//! ```no_run
//! use qcard::{CardConfig, CardExporter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CardConfig::load(None)?;
//!     let exporter = CardExporter::new(config);
//!     exporter.prefetch_assets();
//!
//!     let report = exporter.export_contact().await?;
//!     println!("Exported {}", report.file.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod assets;
pub mod config;
pub mod error;
pub mod logging;
pub mod pdf;
pub mod qr;
pub mod render;
pub mod vcard;
pub mod view;

// Re-exports for convenience
pub use error::{Error, Result};

pub use assets::AssetCatalog;
pub use config::{
    AssetOptions, CardConfig, ExportOptions, FeedbackOptions, LoggingOptions, QrOptions,
};
pub use qr::{EccLevel, QrEncoder, QrRenderOptions};
pub use render::RenderedImage;
pub use vcard::ContactRecord;
pub use view::ViewportClass;

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Identifier the contact export resolves its logo under
pub const LOGO_ASSET_ID: &str = "logo";

/// Outcome of one export action
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Path the document was written to
    pub file: PathBuf,
    /// Whether a real QR image was embedded (false means placeholder)
    pub qr_embedded: bool,
    /// Whether the logo was embedded
    pub logo_embedded: bool,
    /// Byte length of the QR payload
    pub payload_bytes: usize,
}

/// An on-screen QR preview for one payload
#[derive(Debug, Clone)]
pub struct QrPreview {
    /// Human-readable payload label
    pub label: &'static str,
    /// Unicode block rendering for the terminal
    pub terminal: String,
    /// Raster preview at the viewport-scaled width
    pub image: RenderedImage,
    /// Pixel width the raster was rendered at
    pub pixel_width: u32,
}

/// High-level export interface combining config + assets + QR encoding
pub struct CardExporter {
    config: CardConfig,
    assets: AssetCatalog,
    encoder: QrEncoder,
}

impl CardExporter {
    /// Create a new exporter, registering the configured assets.
    pub fn new(config: CardConfig) -> Self {
        let mut assets = AssetCatalog::new();
        if let Some(path) = &config.assets.logo {
            assets.register(LOGO_ASSET_ID, path.clone());
        }

        Self {
            config,
            assets,
            encoder: QrEncoder::new(),
        }
    }

    /// The configuration this exporter was built from.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Start background loads for all registered assets.
    pub fn prefetch_assets(&self) {
        self.assets.prefetch();
    }

    /// Export the contact card PDF.
    ///
    /// QR rendering and logo loading each degrade independently: a failed
    /// QR render becomes the placeholder box, a failed logo load is
    /// omitted. Either way a document is composed and persisted; only
    /// composition or save failures propagate.
    pub async fn export_contact(&self) -> Result<ExportReport> {
        let payload = self.config.contact.to_vcard();
        let options = self
            .config
            .qr
            .render_options(self.config.qr.contact_print_width);

        let qr = match self.encoder.render_data_url(&payload, &options) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("Contact QR rendering failed, substituting placeholder: {err}");
                None
            }
        };

        let logo = match self.assets.resolve(LOGO_ASSET_ID).await {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("Logo unavailable, exporting without it: {err}");
                None
            }
        };

        let document = pdf::compose_contact(
            logo.as_ref(),
            qr.as_ref(),
            &self.config.export.contact_caption,
            &self.config.export.contact_file_name,
        )?;
        let file = document.persist(&self.config.export.output_dir)?;
        info!(file = %file.display(), "Contact card exported");

        Ok(ExportReport {
            file,
            qr_embedded: qr.is_some(),
            logo_embedded: logo.is_some(),
            payload_bytes: payload.len(),
        })
    }

    /// Export the feedback-link PDF.
    ///
    /// Same degradation rules as the contact export, minus the logo step.
    pub async fn export_feedback(&self) -> Result<ExportReport> {
        let payload = self.config.feedback.url.clone();
        let options = self
            .config
            .qr
            .render_options(self.config.qr.feedback_print_width);

        let qr = match self.encoder.render_data_url(&payload, &options) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("Feedback QR rendering failed, substituting placeholder: {err}");
                None
            }
        };

        let document = pdf::compose_feedback(
            qr.as_ref(),
            &self.config.export.feedback_caption,
            &self.config.export.feedback_file_name,
        )?;
        let file = document.persist(&self.config.export.output_dir)?;
        info!(file = %file.display(), "Feedback link exported");

        Ok(ExportReport {
            file,
            qr_embedded: qr.is_some(),
            logo_embedded: false,
            payload_bytes: payload.len(),
        })
    }

    /// Render on-screen previews for both payloads at the viewport-scaled
    /// pixel sizes.
    pub fn render_previews(&self, viewport: ViewportClass) -> Result<Vec<QrPreview>> {
        let specs = [
            (
                "contact vCard",
                self.config.contact.to_vcard(),
                self.config.qr.contact_preview_width,
            ),
            (
                "feedback link",
                self.config.feedback.url.clone(),
                self.config.qr.feedback_preview_width,
            ),
        ];

        let mut previews = Vec::with_capacity(specs.len());
        for (label, payload, base_width) in specs {
            let pixel_width = viewport.scaled_size(base_width).max(1);
            let options = self.config.qr.render_options(pixel_width);
            previews.push(QrPreview {
                label,
                terminal: view::terminal_qr(&payload, options.ecc_level)?,
                image: self.encoder.render_data_url(&payload, &options)?,
                pixel_width,
            });
        }
        Ok(previews)
    }
}
