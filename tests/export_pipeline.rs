use std::path::{Path, PathBuf};

use qcard::{CardConfig, CardExporter, ContactRecord};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qcard-e2e-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn sample_config(output_dir: &Path) -> CardConfig {
    let mut config = CardConfig::default();
    config.contact = ContactRecord {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        title: "CEO".to_string(),
        organization: "Acme".to_string(),
        phone: "+1-555-0100".to_string(),
        email: "jane@acme.com".to_string(),
        address: "1 Main St".to_string(),
        website: Some("https://acme.com".to_string()),
    };
    config.feedback.url = "https://example.com/feedback".to_string();
    config.export.output_dir = output_dir.to_path_buf();
    config
}

fn write_logo(dir: &Path) -> PathBuf {
    let path = dir.join("logo.png");
    let pixels = image::RgbImage::from_pixel(12, 8, image::Rgb([200, 120, 40]));
    pixels
        .save_with_format(&path, image::ImageFormat::Png)
        .expect("write logo png");
    path
}

#[tokio::test]
async fn contact_export_produces_named_pdf() {
    let dir = scratch_dir("contact");
    let config = sample_config(&dir);
    config.validate().expect("sample config is complete");
    let exporter = CardExporter::new(config);

    let report = exporter.export_contact().await.expect("contact export");
    assert_eq!(report.file, dir.join("Save-Us-QR.pdf"));
    assert!(report.qr_embedded, "vCard payload fits at level M");
    assert!(!report.logo_embedded, "no logo configured");
    assert!(report.payload_bytes > 150, "vCard payloads exceed 150 bytes");

    let bytes = std::fs::read(&report.file).expect("read exported pdf");
    assert!(bytes.starts_with(b"%PDF"));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn feedback_export_produces_named_pdf() {
    let dir = scratch_dir("feedback");
    let exporter = CardExporter::new(sample_config(&dir));

    let report = exporter.export_feedback().await.expect("feedback export");
    assert_eq!(report.file, dir.join("Share-Contact-QR.pdf"));
    assert!(report.qr_embedded);
    assert!(!report.logo_embedded);
    assert_eq!(report.payload_bytes, "https://example.com/feedback".len());

    let bytes = std::fs::read(&report.file).expect("read exported pdf");
    assert!(bytes.starts_with(b"%PDF"));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn logo_is_embedded_when_the_asset_loads() {
    let dir = scratch_dir("logo");
    let mut config = sample_config(&dir);
    config.assets.logo = Some(write_logo(&dir));

    let exporter = CardExporter::new(config);
    exporter.prefetch_assets();

    let report = exporter.export_contact().await.expect("contact export");
    assert!(report.logo_embedded);
    assert!(report.qr_embedded);
    assert!(report.file.exists());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn missing_logo_degrades_without_failing() {
    let dir = scratch_dir("missing-logo");
    let mut config = sample_config(&dir);
    config.assets.logo = Some(PathBuf::from("/nonexistent/logo.png"));

    let exporter = CardExporter::new(config);
    let report = exporter.export_contact().await.expect("export still succeeds");
    assert!(!report.logo_embedded);
    assert!(report.qr_embedded);
    assert!(std::fs::read(&report.file).unwrap().starts_with(b"%PDF"));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn oversized_payload_falls_back_to_placeholder() {
    let dir = scratch_dir("oversized");
    let mut config = sample_config(&dir);
    // Far beyond the byte capacity of any QR version at level M.
    config.feedback.url = format!("https://example.com/?q={}", "x".repeat(5000));

    let exporter = CardExporter::new(config);
    let report = exporter.export_feedback().await.expect("export still succeeds");
    assert!(!report.qr_embedded, "placeholder should replace the QR image");
    assert!(std::fs::read(&report.file).unwrap().starts_with(b"%PDF"));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn degraded_qr_and_logo_together_still_produce_both_files() {
    let dir = scratch_dir("degraded");
    let mut config = sample_config(&dir);
    config.assets.logo = Some(PathBuf::from("/nonexistent/logo.png"));
    config.contact.address = "x".repeat(5000);
    config.feedback.url = format!("https://example.com/?q={}", "x".repeat(5000));

    let exporter = CardExporter::new(config);
    let contact = exporter.export_contact().await.expect("contact export");
    let feedback = exporter.export_feedback().await.expect("feedback export");

    assert!(!contact.qr_embedded);
    assert!(!contact.logo_embedded);
    assert!(!feedback.qr_embedded);
    assert!(contact.file.exists());
    assert!(feedback.file.exists());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn previews_render_at_viewport_scaled_widths() {
    let dir = scratch_dir("preview");
    let exporter = CardExporter::new(sample_config(&dir));

    let previews = exporter
        .render_previews(qcard::ViewportClass::Narrow)
        .expect("render previews");
    assert_eq!(previews.len(), 2);
    assert_eq!(previews[0].pixel_width, 250);
    assert_eq!(previews[1].pixel_width, 230);
    for preview in &previews {
        assert!(!preview.terminal.is_empty());
        let raster = preview.image.to_rgb8().expect("decode preview");
        assert_eq!(raster.width(), preview.pixel_width);
    }

    std::fs::remove_dir_all(dir).ok();
}
