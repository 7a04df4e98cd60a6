//! Flowing PDF layout for the report.
//!
//! A [`ReportDocument`] is an ordered list of [`Block`]s. Saving lays them out
//! top to bottom on fixed-size pages, starting a new page whenever the next
//! line, image or table row no longer fits above the bottom margin.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use engagement_core::{ReportError, Result};
use image::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Pt, Rect,
};
use tracing::debug;

use crate::results_table::ResultsTable;
use crate::style::{DocumentStyle, Rgb, TextStyle, BLACK};

const LAYER_NAME: &str = "Layer 1";

/// One element of the document flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Centred document title.
    Title(String),
    /// Section heading.
    Heading(String),
    /// Wrapped explanatory paragraph, set in the sub-heading face.
    Paragraph(String),
    /// Vertical gap in points.
    Spacer(f32),
    /// PNG image, centred at its native size.
    Image(PathBuf),
    Table(ResultsTable),
    /// Continue on a new page. A trailing break adds no blank page.
    PageBreak,
}

/// Counts reported after a document is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub images: usize,
    pub table_rows: usize,
}

/// An ordered document ready to be laid out and saved.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    title: String,
    style: DocumentStyle,
    blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            style: DocumentStyle::legal(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Lay out every block and write the PDF to `path`.
    ///
    /// The file is written next to `path` under a temporary name and renamed
    /// into place, so a failure never leaves a partial document behind.
    pub fn save(&self, path: &Path) -> Result<RenderSummary> {
        let mut writer = PageWriter::new(&self.title, &self.style)?;
        for block in &self.blocks {
            writer.place(block)?;
        }
        let (doc, summary) = writer.finish();

        write_atomically(doc, path)?;
        debug!(
            "Wrote {} with {} pages, {} images, {} table rows",
            path.display(),
            summary.pages,
            summary.images,
            summary.table_rows
        );
        Ok(summary)
    }
}

// ── PageWriter ────────────────────────────────────────────────────────────────

/// Cursor-based layout over a growing printpdf document.
///
/// All positions are in points measured from the bottom-left page corner.
struct PageWriter<'a> {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    style: &'a DocumentStyle,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
    page_is_empty: bool,
    break_pending: bool,
    summary: RenderSummary,
}

impl<'a> PageWriter<'a> {
    fn new(title: &str, style: &'a DocumentStyle) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            pt(style.page_width),
            pt(style.page_height),
            LAYER_NAME,
        );
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;

        Ok(Self {
            doc,
            layer,
            style,
            regular,
            bold,
            cursor: style.page_height - style.margin,
            page_is_empty: true,
            break_pending: false,
            summary: RenderSummary {
                pages: 1,
                ..RenderSummary::default()
            },
        })
    }

    fn finish(self) -> (PdfDocumentReference, RenderSummary) {
        (self.doc, self.summary)
    }

    fn top(&self) -> f32 {
        self.style.page_height - self.style.margin
    }

    fn bottom(&self) -> f32 {
        self.style.margin
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor - height >= self.bottom()
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            pt(self.style.page_width),
            pt(self.style.page_height),
            LAYER_NAME,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = self.top();
        self.page_is_empty = true;
        self.summary.pages += 1;
    }

    /// Start a new page if `height` does not fit, unless the page is still
    /// empty and nothing would be gained.
    fn reserve(&mut self, height: f32) {
        if !self.fits(height) && !self.page_is_empty {
            self.new_page();
        }
    }

    fn place(&mut self, block: &Block) -> Result<()> {
        if let Block::PageBreak = block {
            if !self.page_is_empty {
                self.break_pending = true;
            }
            return Ok(());
        }
        if self.break_pending {
            self.break_pending = false;
            self.new_page();
        }

        match block {
            Block::Title(text) => self.place_text(text, self.style.title),
            Block::Heading(text) => self.place_text(text, self.style.heading1),
            Block::Paragraph(text) => self.place_text(text, self.style.heading2),
            Block::Spacer(height) => self.place_spacer(*height),
            Block::Image(path) => self.place_image(path)?,
            Block::Table(table) => self.place_table(table),
            Block::PageBreak => {}
        }
        Ok(())
    }

    fn place_text(&mut self, text: &str, text_style: TextStyle) {
        let width = self.style.content_width();
        let columns = self.style.chars_per_line(width, text_style.font_size);
        let font = if text_style.bold {
            self.bold.clone()
        } else {
            self.regular.clone()
        };

        if !self.page_is_empty {
            self.cursor -= text_style.space_before;
        }
        self.set_fill(BLACK);
        for line in textwrap::wrap(text, columns) {
            let line = line.into_owned();
            self.reserve(text_style.leading);
            let x = if text_style.centered {
                (self.style.page_width - self.style.text_width(&line, text_style.font_size)) / 2.0
            } else {
                self.style.margin
            };
            let baseline = self.cursor - text_style.font_size;
            self.layer
                .use_text(line, text_style.font_size, pt(x), pt(baseline), &font);
            self.cursor -= text_style.leading;
            self.page_is_empty = false;
        }
        self.cursor -= text_style.space_after;
    }

    fn place_spacer(&mut self, height: f32) {
        if self.fits(height) {
            self.cursor -= height;
        } else {
            self.new_page();
        }
    }

    fn place_image(&mut self, path: &Path) -> Result<()> {
        let image = load_png(path)?;
        let dpi = self.style.image_dpi;
        let width = image.image.width.0 as f32 / dpi * 72.0;
        let height = image.image.height.0 as f32 / dpi * 72.0;

        self.reserve(height);
        let x = self.style.margin + (self.style.content_width() - width).max(0.0) / 2.0;
        let y = self.cursor - height;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(pt(x)),
                translate_y: Some(pt(y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );

        self.cursor = y;
        self.page_is_empty = false;
        self.summary.images += 1;
        Ok(())
    }

    /// Draw the table, repeating the header row at the top of every page it
    /// spans.
    fn place_table(&mut self, table: &ResultsTable) {
        let table_style = self.style.table;
        let header_height = table_style.header_row_height();
        let body_height = table_style.body_row_height();
        let x0 = self.style.margin + (self.style.content_width() - table.total_width()).max(0.0) / 2.0;

        self.reserve(header_height + body_height);
        self.draw_row(x0, &table.header, &table.column_widths, true);

        for row in &table.rows {
            if !self.fits(body_height) {
                self.new_page();
                self.draw_row(x0, &table.header, &table.column_widths, true);
            }
            self.draw_row(x0, row, &table.column_widths, false);
            self.summary.table_rows += 1;
        }
    }

    fn draw_row(&mut self, x0: f32, cells: &[String], widths: &[f32], header: bool) {
        let table_style = self.style.table;
        let (height, background, text_color, padding_bottom, font) = if header {
            (
                table_style.header_row_height(),
                table_style.header_background,
                table_style.header_text,
                table_style.header_padding_bottom,
                self.bold.clone(),
            )
        } else {
            (
                table_style.body_row_height(),
                table_style.body_background,
                table_style.body_text,
                table_style.body_padding_bottom,
                self.regular.clone(),
            )
        };
        let total: f32 = widths.iter().sum();
        let top = self.cursor;
        let bottom = top - height;

        self.set_fill(background);
        self.layer
            .add_rect(Rect::new(pt(x0), pt(bottom), pt(x0 + total), pt(top)));

        self.layer.set_outline_color(color(table_style.grid));
        self.layer.set_outline_thickness(table_style.grid_width);
        self.stroke(x0, top, x0 + total, top);
        self.stroke(x0, bottom, x0 + total, bottom);
        let mut x = x0;
        self.stroke(x, top, x, bottom);
        for width in widths {
            x += width;
            self.stroke(x, top, x, bottom);
        }

        self.set_fill(text_color);
        let baseline = bottom + padding_bottom + (table_style.leading - table_style.font_size);
        let mut x = x0;
        for (cell, width) in cells.iter().zip(widths) {
            let inner = width - 2.0 * table_style.padding_x;
            let text = fit_text(self.style, cell, inner, table_style.font_size);
            let text_width = self.style.text_width(&text, table_style.font_size);
            let tx = x + (width - text_width) / 2.0;
            self.layer
                .use_text(text, table_style.font_size, pt(tx), pt(baseline), &font);
            x += width;
        }

        self.cursor = bottom;
        self.page_is_empty = false;
    }

    fn stroke(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(pt(x1), pt(y1)), false),
                (Point::new(pt(x2), pt(y2)), false),
            ],
            is_closed: false,
        });
    }

    fn set_fill(&self, rgb: Rgb) {
        self.layer.set_fill_color(color(rgb));
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(rgb.r, rgb.g, rgb.b, None))
}

/// Clip `text` to the characters that fit in `width` points.
fn fit_text(style: &DocumentStyle, text: &str, width: f32, font_size: f32) -> String {
    let max = style.chars_per_line(width, font_size);
    text.chars().take(max).collect()
}

fn load_png(path: &Path) -> Result<Image> {
    let file = File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let image_err = |reason: String| ReportError::Image {
        path: path.to_path_buf(),
        reason,
    };
    let decoder = PngDecoder::new(BufReader::new(file)).map_err(|e| image_err(e.to_string()))?;
    Image::try_from(decoder).map_err(|e| image_err(e.to_string()))
}

fn write_atomically(doc: PdfDocumentReference, path: &Path) -> Result<()> {
    let tmp = path.with_extension("pdf.tmp");
    let written = write_pdf(doc, &tmp);
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_pdf(doc: PdfDocumentReference, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(pdf_err)?;
    writer.flush()?;
    Ok(())
}

fn pdf_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Render(err.to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
