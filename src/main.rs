//! qcard CLI entrypoint

use clap::Parser;
use qcard::{CardConfig, CardExporter, Error, ExportReport, ViewportClass, logging};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "qcard",
    version,
    about = "QR contact card and feedback-link PDF exporter"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qcard.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Export the contact card PDF
    #[arg(long)]
    contact: bool,

    /// Export the feedback-link PDF
    #[arg(long)]
    feedback: bool,

    /// Print both QR codes to the terminal and write preview PNGs
    #[arg(long)]
    preview: bool,

    /// Print the encoded vCard text
    #[arg(long)]
    show_vcard: bool,

    /// Override the output directory for exported files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Override the logo image path
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Override the feedback link URL
    #[arg(long, value_name = "URL")]
    feedback_url: Option<String>,

    /// Viewport class for preview sizing (`narrow`, `medium`, `wide`)
    #[arg(long, value_name = "CLASS")]
    viewport: Option<String>,

    /// Output export reports as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CardConfig::load(cli.config.as_deref())?;

    if let Some(dir) = cli.output_dir.clone() {
        config.export.output_dir = dir;
    }
    if let Some(logo) = cli.logo.clone() {
        config.assets.logo = Some(logo);
    }
    if let Some(url) = cli.feedback_url.clone() {
        config.feedback.url = url;
    }

    logging::init(&config.logging)?;

    let viewport = match cli.viewport.as_deref() {
        Some(value) => value.parse::<ViewportClass>().map_err(Error::Config)?,
        None => ViewportClass::Wide,
    };

    let exporter = CardExporter::new(config);
    exporter.prefetch_assets();

    if cli.show_vcard {
        println!("{}", exporter.config().contact.to_vcard());
    }

    if cli.preview {
        run_preview(&exporter, viewport)?;
    }

    // With no action flags, export both documents.
    let export_all = !cli.contact && !cli.feedback && !cli.preview && !cli.show_vcard;

    let mut reports: Vec<ExportReport> = Vec::new();
    let mut failures = 0usize;

    if cli.contact || export_all {
        collect(exporter.export_contact().await, "contact", &mut reports, &mut failures);
    }

    if cli.feedback || export_all {
        collect(exporter.export_feedback().await, "feedback", &mut reports, &mut failures);
    }

    if cli.json && !reports.is_empty() {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("✓ {}", report.file.display());
            if !report.qr_embedded {
                println!("  (QR image unavailable, placeholder embedded)");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} export(s) failed");
    }
    Ok(())
}

fn collect(
    result: qcard::Result<ExportReport>,
    action: &str,
    reports: &mut Vec<ExportReport>,
    failures: &mut usize,
) {
    match result {
        Ok(report) => reports.push(report),
        Err(err) => {
            error!("Error generating the {action} PDF: {err}");
            eprintln!("There was an error generating the {action} PDF. Please try again: {err}");
            *failures += 1;
        }
    }
}

fn run_preview(exporter: &CardExporter, viewport: ViewportClass) -> qcard::Result<()> {
    let output_dir = exporter.config().export.output_dir.clone();
    std::fs::create_dir_all(&output_dir)?;
    for preview in exporter.render_previews(viewport)? {
        println!("{} ({} px):", preview.label, preview.pixel_width);
        println!("{}", preview.terminal);

        let file_name = format!("{}-preview.png", preview.label.replace(' ', "-"));
        let path = output_dir.join(file_name);
        std::fs::write(&path, preview.image.png_bytes()?)?;
        println!("Preview raster written to {}", path.display());
    }
    Ok(())
}
