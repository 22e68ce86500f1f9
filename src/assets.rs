//! Logo asset loading and pixel extraction
//!
//! Assets are registered by identifier at startup and resolved to PNG data
//! URLs during export. A resolve on an asset whose bytes are already in
//! memory completes without touching the source again; a resolve that races
//! an in-flight background load awaits that same load instead of starting a
//! second one.

use crate::error::{Error, Result};
use crate::render::RenderedImage;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Registry of named image assets available to document composition
#[derive(Debug, Default)]
pub struct AssetCatalog {
    entries: HashMap<String, AssetEntry>,
}

#[derive(Debug, Clone)]
struct AssetEntry {
    source: PathBuf,
    bytes: Arc<OnceCell<Bytes>>,
}

impl AssetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under an identifier, replacing any previous entry.
    pub fn register(&mut self, id: impl Into<String>, source: impl Into<PathBuf>) {
        self.entries.insert(
            id.into(),
            AssetEntry {
                source: source.into(),
                bytes: Arc::new(OnceCell::new()),
            },
        );
    }

    /// Whether an asset is registered under the identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether an asset's bytes have already been loaded.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .is_some_and(|entry| entry.bytes.initialized())
    }

    /// Start background loads for every registered asset.
    ///
    /// Best effort: failures are logged and surface again at resolve time.
    pub fn prefetch(&self) {
        for (id, entry) in &self.entries {
            let id = id.clone();
            let entry = entry.clone();
            tokio::spawn(async move {
                let result = entry
                    .bytes
                    .get_or_try_init(|| read_bytes(&entry.source, &id))
                    .await;
                if let Err(err) = result {
                    tracing::warn!("Prefetch of asset '{id}' failed: {err}");
                }
            });
        }
    }

    /// Resolve an asset to a PNG data URL.
    ///
    /// An unregistered identifier fails immediately with
    /// [`Error::AssetNotFound`]; nothing is awaited in that case. Otherwise
    /// the asset bytes are obtained (reusing an in-flight or completed load
    /// where one exists), decoded, and re-encoded as a fresh PNG data URL.
    pub async fn resolve(&self, id: &str) -> Result<RenderedImage> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))?;

        let bytes = entry
            .bytes
            .get_or_try_init(|| read_bytes(&entry.source, id))
            .await?;

        let image = image::load_from_memory(bytes)
            .map_err(|e| Error::AssetLoad(format!("'{id}' could not be decoded: {e}")))?;

        RenderedImage::encode(&image)
    }
}

async fn read_bytes(source: &Path, id: &str) -> Result<Bytes> {
    let data = tokio::fs::read(source)
        .await
        .map_err(|e| Error::AssetLoad(format!("'{id}' ({}): {e}", source.display())))?;
    Ok(Bytes::from(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PNG_DATA_URL_PREFIX;
    use std::time::Duration;

    fn scratch_png(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("qcard-asset-{}-{name}", std::process::id()));
        let pixels = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 40, 200]));
        pixels.save_with_format(&path, image::ImageFormat::Png).unwrap();
        path
    }

    #[tokio::test]
    async fn test_unknown_id_fails_immediately() {
        let catalog = AssetCatalog::new();
        let result = tokio::time::timeout(Duration::from_millis(50), catalog.resolve("logo")).await;
        match result {
            Ok(Err(Error::AssetNotFound(id))) => assert_eq!(id, "logo"),
            other => panic!("expected immediate AssetNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_a_load_failure() {
        let mut catalog = AssetCatalog::new();
        catalog.register("logo", "/nonexistent/logo.png");
        let result = catalog.resolve("logo").await;
        assert!(matches!(result, Err(Error::AssetLoad(_))));
        assert!(!catalog.is_loaded("logo"));
    }

    #[tokio::test]
    async fn test_resolve_produces_png_data_url() {
        let path = scratch_png("resolve.png");
        let mut catalog = AssetCatalog::new();
        catalog.register("logo", &path);

        let rendered = catalog.resolve("logo").await.unwrap();
        assert!(rendered.as_data_url().starts_with(PNG_DATA_URL_PREFIX));
        assert_eq!(rendered.to_rgb8().unwrap().dimensions(), (4, 4));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_loaded_bytes_survive_source_removal() {
        let path = scratch_png("cached.png");
        let mut catalog = AssetCatalog::new();
        catalog.register("logo", &path);

        catalog.resolve("logo").await.unwrap();
        assert!(catalog.is_loaded("logo"));

        // The backing file is gone, but the already-loaded bytes resolve.
        std::fs::remove_file(&path).unwrap();
        let rendered = catalog.resolve("logo").await.unwrap();
        assert!(rendered.as_data_url().starts_with(PNG_DATA_URL_PREFIX));
    }

    #[tokio::test]
    async fn test_undecodable_bytes_are_a_load_failure() {
        let path = std::env::temp_dir().join(format!("qcard-asset-{}-junk.bin", std::process::id()));
        std::fs::write(&path, b"definitely not an image").unwrap();

        let mut catalog = AssetCatalog::new();
        catalog.register("logo", &path);
        let result = catalog.resolve("logo").await;
        assert!(matches!(result, Err(Error::AssetLoad(_))));

        std::fs::remove_file(path).ok();
    }
}
