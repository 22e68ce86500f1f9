//! Runtime configuration handling

use crate::error::{Error, Result};
use crate::qr::{EccLevel, QrRenderOptions};
use crate::vcard::ContactRecord;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure loaded from disk and environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// The contact embedded in the exported vCard QR code
    pub contact: ContactRecord,
    /// Feedback-link settings
    pub feedback: FeedbackOptions,
    /// Named image assets available to document composition
    pub assets: AssetOptions,
    /// QR rendering defaults and per-call pixel widths
    pub qr: QrOptions,
    /// Output locations, file names, and captions
    pub export: ExportOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl CardConfig {
    /// Load configuration from an explicit path or fall back to discovered
    /// defaults, apply environment overrides, and check required fields.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qcard.toml / qcard.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qcard.toml", "qcard.yaml", "qcard.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qcard");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("QCARD_FEEDBACK_URL") {
            self.feedback.url = url;
        }
        if let Ok(logo) = env::var("QCARD_LOGO") {
            if logo.trim().is_empty() {
                self.assets.logo = None;
            } else {
                self.assets.logo = Some(PathBuf::from(logo));
            }
        }
        if let Ok(dir) = env::var("QCARD_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
        self.logging.apply_env_overrides();
    }

    /// Check that the fields every export depends on are present.
    pub fn validate(&self) -> Result<()> {
        let missing = self.contact.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Missing contact fields: {}",
                missing.join(", ")
            )));
        }
        if self.feedback.url.is_empty() {
            return Err(Error::Config("Feedback URL must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Feedback-link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackOptions {
    /// URL embedded in the feedback QR code
    pub url: String,
}

impl Default for FeedbackOptions {
    fn default() -> Self {
        Self {
            url: "https://feedback-form-omega-eight.vercel.app/".to_string(),
        }
    }
}

/// Named image assets referenced during composition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetOptions {
    /// Logo image placed at the top of the contact export
    pub logo: Option<PathBuf>,
}

/// QR rendering defaults and the pixel widths of the known call sites
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Error-correction level for every rendered code
    pub ecc_level: EccLevel,
    /// Quiet-zone width in modules
    pub margin_modules: u32,
    /// Foreground color as `#RRGGBB`
    pub dark_color: String,
    /// Background color as `#RRGGBB`
    pub light_color: String,
    /// Pixel width of the contact QR in the exported PDF
    pub contact_print_width: u32,
    /// Pixel width of the feedback QR in the exported PDF
    pub feedback_print_width: u32,
    /// Base pixel width of the on-screen contact preview
    pub contact_preview_width: u32,
    /// Base pixel width of the on-screen feedback preview
    pub feedback_preview_width: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        let defaults = QrRenderOptions::default();
        Self {
            ecc_level: defaults.ecc_level,
            margin_modules: defaults.margin_modules,
            dark_color: defaults.dark_color,
            light_color: defaults.light_color,
            contact_print_width: 500,
            feedback_print_width: 400,
            contact_preview_width: 300,
            feedback_preview_width: 280,
        }
    }
}

impl QrOptions {
    /// Build per-call render options at the given pixel width.
    pub fn render_options(&self, pixel_width: u32) -> QrRenderOptions {
        QrRenderOptions {
            ecc_level: self.ecc_level,
            margin_modules: self.margin_modules,
            dark_color: self.dark_color.clone(),
            light_color: self.light_color.clone(),
            pixel_width,
        }
    }
}

/// Output locations, fixed file names, and captions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Directory the PDF files are written into
    pub output_dir: PathBuf,
    /// File name of the contact export
    pub contact_file_name: String,
    /// File name of the feedback export
    pub feedback_file_name: String,
    /// Caption under the contact QR code
    pub contact_caption: String,
    /// Caption under the feedback QR code
    pub feedback_caption: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            contact_file_name: "Save-Us-QR.pdf".to_string(),
            feedback_file_name: "Share-Contact-QR.pdf".to_string(),
            contact_caption: "Save Us".to_string(),
            feedback_caption: "Share your contact to us".to_string(),
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QCARD_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stdout logging
    pub color: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QCARD_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QCARD_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QCARD_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
    }
}
