//! Layout programs for the two export documents

use crate::error::{Error, Result};
use crate::pdf::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM, text_width_mm};
use crate::render::RenderedImage;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px,
    Rgb,
};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const PT_PER_MM: f32 = 72.0 / 25.4;

// Contact page geometry, top-down millimetres.
const LOGO_WIDTH_MM: f32 = 50.0;
const LOGO_HEIGHT_MM: f32 = 35.0;
const LOGO_TOP_MM: f32 = 40.0;
const CONTACT_QR_SIZE_MM: f32 = 100.0;
const CONTACT_QR_TOP_MM: f32 = 95.0;
const CONTACT_CAPTION_DROP_MM: f32 = 20.0;
const CONTACT_CAPTION_PT: f32 = 24.0;
const CONTACT_UNDERLINE_MM: f32 = 0.8;
const CONTACT_PLACEHOLDER_PT: f32 = 18.0;

// Feedback page geometry. The QR sits at the vertical centre, offset upward
// so the caption fits below it.
const FEEDBACK_QR_SIZE_MM: f32 = 80.0;
const FEEDBACK_QR_TOP_MM: f32 = (PAGE_HEIGHT_MM - FEEDBACK_QR_SIZE_MM) / 2.0 - 20.0;
const FEEDBACK_CAPTION_DROP_MM: f32 = 15.0;
const FEEDBACK_CAPTION_PT: f32 = 18.0;
const FEEDBACK_UNDERLINE_MM: f32 = 0.5;
const FEEDBACK_PLACEHOLDER_PT: f32 = 16.0;

const UNDERLINE_OFFSET_MM: f32 = 2.0;
const PLACEHOLDER_LABEL: &str = "QR CODE";
const PLACEHOLDER_GRAY: f32 = 200.0 / 255.0;
const IMAGE_BASE_DPI: f32 = 300.0;

/// A finished single-page document held in memory.
///
/// Composition never touches the filesystem; only [`persist`] does, in one
/// write, so a failed save leaves no partial file behind.
///
/// [`persist`]: ComposedDocument::persist
#[derive(Debug, Clone)]
pub struct ComposedDocument {
    /// File name the document is saved under
    pub file_name: String,
    /// Serialized PDF bytes
    pub bytes: Vec<u8>,
}

impl ComposedDocument {
    /// Write the document into `dir` under its fixed file name.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .map_err(|e| Error::DocumentSave(format!("{}: {e}", dir.display())))?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)
            .map_err(|e| Error::DocumentSave(format!("{}: {e}", path.display())))?;
        Ok(path)
    }
}

/// Compose the contact-card page.
///
/// `logo` and `qr` are optional because their acquisition may have failed
/// upstream: a missing logo is simply omitted, a missing QR image is
/// replaced by the gray placeholder box. The caption and underline are drawn
/// in every case, so composition always yields a complete document.
pub fn compose_contact(
    logo: Option<&RenderedImage>,
    qr: Option<&RenderedImage>,
    caption: &str,
    file_name: &str,
) -> Result<ComposedDocument> {
    let page = Page::new("Contact Card")?;

    if let Some(logo) = logo {
        let logo_x = (PAGE_WIDTH_MM - LOGO_WIDTH_MM) / 2.0;
        page.place_image(logo, logo_x, LOGO_TOP_MM, LOGO_WIDTH_MM, LOGO_HEIGHT_MM)?;
    }

    page.place_qr_slot(
        qr,
        CONTACT_QR_TOP_MM,
        CONTACT_QR_SIZE_MM,
        CONTACT_PLACEHOLDER_PT,
    )?;

    let baseline = CONTACT_QR_TOP_MM + CONTACT_QR_SIZE_MM + CONTACT_CAPTION_DROP_MM;
    page.caption_with_underline(caption, CONTACT_CAPTION_PT, baseline, CONTACT_UNDERLINE_MM);

    page.finish(file_name)
}

/// Compose the feedback-link page. Same mechanics as the contact page, no
/// logo step, QR anchored around the vertical centre.
pub fn compose_feedback(
    qr: Option<&RenderedImage>,
    caption: &str,
    file_name: &str,
) -> Result<ComposedDocument> {
    let page = Page::new("Feedback Link")?;

    page.place_qr_slot(
        qr,
        FEEDBACK_QR_TOP_MM,
        FEEDBACK_QR_SIZE_MM,
        FEEDBACK_PLACEHOLDER_PT,
    )?;

    let baseline = FEEDBACK_QR_TOP_MM + FEEDBACK_QR_SIZE_MM + FEEDBACK_CAPTION_DROP_MM;
    page.caption_with_underline(caption, FEEDBACK_CAPTION_PT, baseline, FEEDBACK_UNDERLINE_MM);

    page.finish(file_name)
}

/// One A4 portrait page plus the drawing state shared by both layouts.
struct Page {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    bold: IndirectFontRef,
}

impl Page {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM as f64),
            Mm(PAGE_HEIGHT_MM as f64),
            "Layer 1",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::DocumentSave(format!("Failed to load builtin font: {e}")))?;

        let page = Self { doc, layer, bold };
        page.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, PAGE_HEIGHT_MM, (1.0, 1.0, 1.0));
        Ok(page)
    }

    /// Fill an axis-aligned rectangle; `top_mm` measured from the page top.
    fn fill_rect(&self, x_mm: f32, top_mm: f32, width_mm: f32, height_mm: f32, rgb: (f32, f32, f32)) {
        let bottom = PAGE_HEIGHT_MM - top_mm - height_mm;
        let corners = vec![
            (Point::new(Mm(x_mm as f64), Mm(bottom as f64)), false),
            (Point::new(Mm((x_mm + width_mm) as f64), Mm(bottom as f64)), false),
            (Point::new(Mm((x_mm + width_mm) as f64), Mm((bottom + height_mm) as f64)), false),
            (Point::new(Mm(x_mm as f64), Mm((bottom + height_mm) as f64)), false),
        ];
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(rgb.0 as f64, rgb.1 as f64, rgb.2 as f64, None)));
        self.layer.add_shape(Line {
            points: corners,
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clipping_path: false,
        });
    }

    /// Embed a rendered image at an absolute position and size.
    fn place_image(
        &self,
        image: &RenderedImage,
        x_mm: f32,
        top_mm: f32,
        width_mm: f32,
        height_mm: f32,
    ) -> Result<()> {
        let pixels = image.to_rgb8()?;
        let (width_px, height_px) = pixels.dimensions();

        let xobject = ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: pixels.into_raw(),
            image_filter: None,
            clipping_bbox: None,
        };

        // Placement resolves through DPI first; scale the natural size up to
        // the requested millimetre box.
        let natural_width_mm = width_px as f32 * 25.4 / IMAGE_BASE_DPI;
        let natural_height_mm = height_px as f32 * 25.4 / IMAGE_BASE_DPI;

        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            Some(Mm(x_mm as f64)),
            Some(Mm((PAGE_HEIGHT_MM - top_mm - height_mm) as f64)),
            None,
            Some((width_mm / natural_width_mm) as f64),
            Some((height_mm / natural_height_mm) as f64),
            Some(IMAGE_BASE_DPI as f64),
        );
        Ok(())
    }

    /// Place the QR image centred at `top_mm`, or the placeholder box when
    /// no image is available.
    fn place_qr_slot(
        &self,
        qr: Option<&RenderedImage>,
        top_mm: f32,
        size_mm: f32,
        placeholder_pt: f32,
    ) -> Result<()> {
        let x_mm = (PAGE_WIDTH_MM - size_mm) / 2.0;
        match qr {
            Some(qr) => self.place_image(qr, x_mm, top_mm, size_mm, size_mm),
            None => {
                self.fill_rect(
                    x_mm,
                    top_mm,
                    size_mm,
                    size_mm,
                    (PLACEHOLDER_GRAY, PLACEHOLDER_GRAY, PLACEHOLDER_GRAY),
                );
                self.centered_text(PLACEHOLDER_LABEL, placeholder_pt, top_mm + size_mm / 2.0);
                Ok(())
            }
        }
    }

    /// Draw black text centred horizontally, baseline at `baseline_top_mm`
    /// from the page top. Returns the rendered text width.
    fn centered_text(&self, text: &str, size_pt: f32, baseline_top_mm: f32) -> f32 {
        let width_mm = text_width_mm(text, size_pt);
        let x_mm = (PAGE_WIDTH_MM - width_mm) / 2.0;
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.use_text(
            text,
            size_pt as f64,
            Mm(x_mm as f64),
            Mm((PAGE_HEIGHT_MM - baseline_top_mm) as f64),
            &self.bold,
        );
        width_mm
    }

    /// Caption plus a manually drawn underline sized to the text width.
    fn caption_with_underline(
        &self,
        caption: &str,
        size_pt: f32,
        baseline_top_mm: f32,
        thickness_mm: f32,
    ) {
        let width_mm = self.centered_text(caption, size_pt, baseline_top_mm);
        let underline_top = baseline_top_mm + UNDERLINE_OFFSET_MM;
        let y = PAGE_HEIGHT_MM - underline_top;
        let start_x = (PAGE_WIDTH_MM - width_mm) / 2.0;
        let end_x = (PAGE_WIDTH_MM + width_mm) / 2.0;

        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness((thickness_mm * PT_PER_MM) as f64);
        self.layer.add_shape(Line {
            points: vec![
                (Point::new(Mm(start_x as f64), Mm(y as f64)), false),
                (Point::new(Mm(end_x as f64), Mm(y as f64)), false),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }

    /// Serialize the page into a [`ComposedDocument`].
    fn finish(self, file_name: &str) -> Result<ComposedDocument> {
        let mut bytes = Vec::new();
        self.doc
            .save(&mut BufWriter::new(&mut bytes))
            .map_err(|e| Error::DocumentSave(e.to_string()))?;
        Ok(ComposedDocument {
            file_name: file_name.to_string(),
            bytes,
        })
    }
}
