use crate::{
    error::{ApiError, Result},
    models::DocumentFormat,
};
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::Cursor;
use tracing::debug;

pub const DOCUMENT_TITLE: &str = "Yoga Recommendations";
pub const DOCUMENT_INTRO: &str = "Here are your personalized yoga recommendations:";

const HEADING_STYLE: &str = "Heading1";

// A4, with the cell geometry of a classic single-column text report
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const ROW_HEIGHT_MM: f32 = 10.0;
const TITLE_CELL_WIDTH_MM: f32 = 200.0;
const TITLE_FONT_SIZE: f32 = 12.0;
const BODY_FONT_SIZE: f32 = 10.0;
const PT_TO_MM: f32 = 0.3528;
// Mean Helvetica glyph advance, in ems
const HELVETICA_AVG_ADVANCE: f32 = 0.5;

/// A rendered document held in memory for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub format: DocumentFormat,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    fn new(format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            file_name: format.file_name().to_string(),
            content_type: format.content_type().to_string(),
            bytes,
        }
    }

    /// A reader positioned at the start of the document.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Renders recommendation lines as a Word or PDF document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<T: AsRef<str>>(
        &self,
        format: DocumentFormat,
        recommendations: &[T],
    ) -> Result<RenderedDocument> {
        let bytes = match format {
            DocumentFormat::Word => self.render_word(recommendations)?,
            DocumentFormat::Pdf => self.render_pdf(recommendations)?,
        };

        debug!(
            "Rendered {} recommendations as {} ({} bytes)",
            recommendations.len(),
            format.label(),
            bytes.len()
        );
        Ok(RenderedDocument::new(format, bytes))
    }

    fn render_word<T: AsRef<str>>(&self, recommendations: &[T]) -> Result<Vec<u8>> {
        let mut docx = Docx::new()
            .add_style(
                Style::new(HEADING_STYLE, StyleType::Paragraph)
                    .name("Heading 1")
                    .size(32)
                    .bold(),
            )
            .add_paragraph(
                Paragraph::new()
                    .style(HEADING_STYLE)
                    .add_run(Run::new().add_text(DOCUMENT_TITLE)),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(DOCUMENT_INTRO)));

        for recommendation in recommendations {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(format!("- {}", recommendation.as_ref()))),
            );
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| ApiError::RenderError(e.to_string()))?;

        Ok(buffer.into_inner())
    }

    fn render_pdf<T: AsRef<str>>(&self, recommendations: &[T]) -> Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            DOCUMENT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ApiError::RenderError(e.to_string()))?;

        let mut cursor = PdfCursor {
            layer: doc.get_page(page).get_layer(layer),
            top: MARGIN_MM,
        };

        let title_width = text_width_mm(DOCUMENT_TITLE, TITLE_FONT_SIZE);
        let title_x = MARGIN_MM + (TITLE_CELL_WIDTH_MM - title_width).max(0.0) / 2.0;
        cursor.cell(DOCUMENT_TITLE, TITLE_FONT_SIZE, title_x, &font);
        cursor.top += ROW_HEIGHT_MM;

        cursor.cell(DOCUMENT_INTRO, BODY_FONT_SIZE, MARGIN_MM, &font);
        cursor.top += ROW_HEIGHT_MM;

        for recommendation in recommendations {
            if cursor.top + ROW_HEIGHT_MM > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                cursor = PdfCursor {
                    layer: doc.get_page(page).get_layer(layer),
                    top: MARGIN_MM,
                };
            }
            let line = format!("- {}", recommendation.as_ref());
            cursor.cell(&line, BODY_FONT_SIZE, MARGIN_MM, &font);
        }

        doc.save_to_bytes()
            .map_err(|e| ApiError::RenderError(e.to_string()))
    }
}

/// Write position on the current PDF page, measured from the top edge.
struct PdfCursor {
    layer: PdfLayerReference,
    top: f32,
}

impl PdfCursor {
    /// Write one fixed-height row and advance past it.
    fn cell(&mut self, text: &str, font_size: f32, x: f32, font: &IndirectFontRef) {
        let baseline = self.top + (ROW_HEIGHT_MM + font_size * PT_TO_MM * 0.7) / 2.0;
        self.layer
            .use_text(text, font_size, Mm(x), Mm(PAGE_HEIGHT_MM - baseline), font);
        self.top += ROW_HEIGHT_MM;
    }
}

fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * HELVETICA_AVG_ADVANCE * PT_TO_MM
}
