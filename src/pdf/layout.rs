use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use printpdf::image_crate::GenericImageView;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rect, Rgb,
};

use super::Theme;

const PAGE_W: f64 = 210.0;
const PAGE_H: f64 = 297.0;
const MARGIN: f64 = 15.0;
const CONTENT_W: f64 = PAGE_W - 2.0 * MARGIN;
const HEADER_H: f64 = 26.0;
/// Vertical space reserved at the bottom of every page for the footer
const FOOTER_RESERVE: f64 = 16.0;
const LOGO_H: f64 = 14.0;

const TEXT_COLOR: [f64; 3] = [0.15, 0.15, 0.15];
const MUTED_COLOR: [f64; 3] = [0.45, 0.45, 0.45];
const STRIPE_COLOR: [f64; 3] = [0.93, 0.93, 0.93];
const WHITE: [f64; 3] = [1.0, 1.0, 1.0];

fn rgb(c: [f64; 3]) -> Color {
    Color::Rgb(Rgb::new(c[0] as f32, c[1] as f32, c[2] as f32, None))
}

/// Approximate rendered width in mm (average Helvetica glyph width)
fn text_width(text: &str, size_pt: f64) -> f64 {
    text.chars().count() as f64 * size_pt * 0.3528 * 0.52
}

fn truncate_to_width(text: &str, size_pt: f64, max_w: f64) -> String {
    if text_width(text, size_pt) <= max_w {
        return text.to_string();
    }

    let char_w = size_pt * 0.3528 * 0.52;
    let fit = ((max_w / char_w) as usize).saturating_sub(1);
    let truncated: String = text.chars().take(fit).collect();
    format!("{truncated}…")
}

/// Multi-page A4 report with cursor-based layout.
///
/// Blocks are appended top to bottom; each block checks remaining space and
/// starts a new page (with a fresh header band) when it would not fit.
/// Footers are stamped across all pages once at save time, when the final
/// page count is known.
pub struct ReportDocument {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    theme: Theme,
    title: String,
    generated_at: DateTime<Local>,
    /// Distance from the page bottom to the next free position
    cursor: f64,
}

impl ReportDocument {
    pub fn new(title: &str, theme: Theme) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_W as f32), Mm(PAGE_H as f32), "content");

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("Failed to embed font: {e}"))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("Failed to embed font: {e}"))?;
        let oblique = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| anyhow!("Failed to embed font: {e}"))?;

        let mut document = Self {
            doc,
            pages: vec![(page, layer)],
            font,
            bold,
            oblique,
            theme,
            title: title.to_string(),
            generated_at: Local::now(),
            cursor: PAGE_H,
        };

        document.draw_header();
        Ok(document)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.pages.len() - 1];
        self.doc.get_page(page).get_layer(layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_W as f32), Mm(PAGE_H as f32), "content");
        self.pages.push((page, layer));
        self.cursor = PAGE_H;
        self.draw_header();
    }

    /// Start a new page when the next block would overflow into the footer
    fn ensure_space(&mut self, needed: f64) {
        if self.cursor - needed < MARGIN + FOOTER_RESERVE {
            self.new_page();
        }
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: [f64; 3]) {
        let layer = self.layer();
        layer.set_fill_color(rgb(color));
        layer.add_rect(
            Rect::new(
                Mm(x as f32),
                Mm(y as f32),
                Mm((x + w) as f32),
                Mm((y + h) as f32),
            )
            .with_mode(PaintMode::Fill),
        );
    }

    fn text(&self, text: &str, font: &IndirectFontRef, size: f64, x: f64, y: f64, color: [f64; 3]) {
        let layer = self.layer();
        layer.set_fill_color(rgb(color));
        layer.use_text(text, size as f32, Mm(x as f32), Mm(y as f32), font);
    }

    /// Fixed header band: logo (when it decodes), platform name, report
    /// title and generation timestamp.
    fn draw_header(&mut self) {
        self.fill_rect(0.0, PAGE_H - HEADER_H, PAGE_W, HEADER_H, self.theme.primary);

        let mut text_x = MARGIN;
        if let Some(logo_w) = self.draw_logo() {
            text_x += logo_w + 5.0;
        }

        self.text(
            &self.theme.platform_name,
            &self.bold,
            15.0,
            text_x,
            PAGE_H - 11.0,
            WHITE,
        );
        self.text(
            &self.title,
            &self.font,
            10.5,
            text_x,
            PAGE_H - 18.5,
            WHITE,
        );

        let stamp = format!("Generated {}", self.generated_at.format("%Y-%m-%d %H:%M"));
        let stamp_x = PAGE_W - MARGIN - text_width(&stamp, 8.0);
        self.text(&stamp, &self.font, 8.0, stamp_x, PAGE_H - 22.5, WHITE);

        self.cursor = PAGE_H - HEADER_H - 8.0;
    }

    /// Returns the rendered logo width, or None when there is no logo or its
    /// bytes fail to decode. A bad logo never blocks document generation.
    fn draw_logo(&self) -> Option<f64> {
        let bytes = self.theme.logo.as_ref()?;

        let decoded = match printpdf::image_crate::load_from_memory(bytes) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Logo failed to decode, rendering without it: {}", e);
                return None;
            }
        };

        let (px_w, px_h) = decoded.dimensions();
        let (px_w, px_h) = (px_w as f64, px_h as f64);
        if px_w <= 0.0 || px_h <= 0.0 {
            return None;
        }

        // printpdf assumes 300 dpi when no dpi is given in the transform
        let natural_h = px_h * 25.4 / 300.0;
        let natural_w = px_w * 25.4 / 300.0;
        let scale = LOGO_H / natural_h;

        let image = Image::from_dynamic_image(&decoded);
        image.add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN as f32)),
                translate_y: Some(Mm((PAGE_H - HEADER_H / 2.0 - LOGO_H / 2.0) as f32)),
                scale_x: Some(scale as f32),
                scale_y: Some(scale as f32),
                ..Default::default()
            },
        );

        Some(natural_w * scale)
    }

    /// Colored section title bar
    pub fn section(&mut self, title: &str) {
        self.ensure_space(13.0);

        let bar_h = 7.0;
        let y = self.cursor - bar_h;
        self.fill_rect(MARGIN, y, CONTENT_W, bar_h, self.theme.secondary);
        self.text(title, &self.bold, 10.5, MARGIN + 2.5, y + 2.0, WHITE);

        self.cursor = y - 5.0;
    }

    /// Label/value pairs flowed into a 2-column grid
    pub fn info_grid(&mut self, pairs: &[(&str, String)]) {
        let row_h = 6.5;
        let col_w = CONTENT_W / 2.0;

        for chunk in pairs.chunks(2) {
            self.ensure_space(row_h);
            let y = self.cursor - row_h + 1.5;

            for (i, (label, value)) in chunk.iter().enumerate() {
                let x = MARGIN + i as f64 * col_w;
                let label_text = format!("{label}:");
                self.text(&label_text, &self.bold, 9.0, x, y, TEXT_COLOR);

                let value_x = x + text_width(&label_text, 9.0) + 2.0;
                let value = truncate_to_width(value, 9.0, x + col_w - value_x - 2.0);
                self.text(&value, &self.font, 9.0, value_x, y, TEXT_COLOR);
            }

            self.cursor -= row_h;
        }

        self.cursor -= 2.0;
    }

    /// Striped data table. `widths` are fractions of the content width and
    /// must line up with `headers`.
    pub fn table(&mut self, headers: &[&str], widths: &[f64], rows: &[Vec<String>]) {
        debug_assert_eq!(headers.len(), widths.len());

        self.ensure_space(14.0);
        self.draw_table_header(headers, widths);

        let row_h = 6.0;
        for (i, row) in rows.iter().enumerate() {
            if self.cursor - row_h < MARGIN + FOOTER_RESERVE {
                self.new_page();
                self.draw_table_header(headers, widths);
            }

            let y = self.cursor - row_h;
            if i % 2 == 1 {
                self.fill_rect(MARGIN, y, CONTENT_W, row_h, STRIPE_COLOR);
            }

            let mut x = MARGIN;
            for (cell, fraction) in row.iter().zip(widths) {
                let cell_w = CONTENT_W * fraction;
                let text = truncate_to_width(cell, 9.0, cell_w - 3.0);
                self.text(&text, &self.font, 9.0, x + 1.5, y + 1.7, TEXT_COLOR);
                x += cell_w;
            }

            self.cursor -= row_h;
        }

        self.cursor -= 4.0;
    }

    fn draw_table_header(&mut self, headers: &[&str], widths: &[f64]) {
        let header_h = 7.0;
        let y = self.cursor - header_h;
        self.fill_rect(MARGIN, y, CONTENT_W, header_h, self.theme.primary);

        let mut x = MARGIN;
        for (header, fraction) in headers.iter().zip(widths) {
            let cell_w = CONTENT_W * fraction;
            let text = truncate_to_width(header, 9.0, cell_w - 3.0);
            self.text(&text, &self.bold, 9.0, x + 1.5, y + 2.0, WHITE);
            x += cell_w;
        }

        self.cursor -= header_h;
    }

    /// Horizontal bar chart: label, proportional bar, numeric value.
    /// Bars scale to `max` when given, otherwise to the largest value; a
    /// non-positive maximum renders empty bars instead of dividing by zero.
    pub fn bar_chart(&mut self, entries: &[(String, f64)], max: Option<f64>) {
        let scale_max = max.unwrap_or_else(|| {
            entries.iter().map(|(_, v)| *v).fold(0.0, f64::max)
        });

        let row_h = 7.5;
        let label_w = 52.0;
        let value_w = 18.0;
        let bar_area = CONTENT_W - label_w - value_w;

        for (label, value) in entries {
            self.ensure_space(row_h);
            let y = self.cursor - row_h;

            let label = truncate_to_width(label, 9.0, label_w - 3.0);
            self.text(&label, &self.font, 9.0, MARGIN, y + 2.2, TEXT_COLOR);

            let bar_w = if scale_max > 0.0 {
                (*value / scale_max * bar_area).max(0.0)
            } else {
                0.0
            };
            if bar_w > 0.0 {
                self.fill_rect(MARGIN + label_w, y + 1.0, bar_w, 4.5, self.theme.secondary);
            }

            let value_text = format_number(*value);
            self.text(
                &value_text,
                &self.font,
                9.0,
                MARGIN + label_w + bar_w + 2.0,
                y + 2.2,
                TEXT_COLOR,
            );

            self.cursor -= row_h;
        }

        self.cursor -= 3.0;
    }

    /// Muted placeholder for sections with no data
    pub fn empty_state(&mut self, message: &str) {
        self.ensure_space(10.0);
        let y = self.cursor - 7.0;
        self.text(message, &self.oblique, 10.0, MARGIN, y, MUTED_COLOR);
        self.cursor -= 12.0;
    }

    /// Stamp footers on every page and write the document. Footers carry the
    /// final page count, so this runs exactly once here rather than on each
    /// intermediate page add.
    pub fn save(self, path: &Path) -> Result<()> {
        let total = self.pages.len();

        for (i, (page, layer)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer);
            layer.set_fill_color(rgb(MUTED_COLOR));

            layer.use_text(
                format!("Generated by the {} platform", self.theme.platform_name),
                8.0,
                Mm(MARGIN as f32),
                Mm(9.0),
                &self.font,
            );

            let page_text = format!("Page {} of {}", i + 1, total);
            let x = PAGE_W - MARGIN - text_width(&page_text, 8.0);
            layer.use_text(page_text, 8.0, Mm(x as f32), Mm(9.0), &self.font);
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| anyhow!("Failed to write PDF: {e}"))?;

        Ok(())
    }
}

/// Trim trailing zeros so 4.0 prints as "4" and 2.5 stays "2.5"
pub(crate) fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < f64::EPSILON {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_document_renders_header_and_empty_state() {
        let mut doc = ReportDocument::new("Attendance Report", Theme::default()).unwrap();
        doc.empty_state("No records found for the selected filters.");
        assert_eq!(doc.page_count(), 1);

        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        doc.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_table_breaks_pages() {
        let mut doc = ReportDocument::new("Ranking Report", Theme::default()).unwrap();

        let rows: Vec<Vec<String>> = (0..120)
            .map(|i| vec![format!("{i}"), format!("Competitor {i}"), "80".to_string()])
            .collect();
        doc.table(&["#", "Name", "Average"], &[0.1, 0.6, 0.3], &rows);

        assert!(doc.page_count() > 1);
    }

    #[test]
    fn test_bad_logo_bytes_do_not_block_generation() {
        let theme = Theme {
            logo: Some(vec![0x00, 0x01, 0x02, 0x03]),
            ..Default::default()
        };

        let mut doc = ReportDocument::new("Competitor Report", theme).unwrap();
        doc.empty_state("nothing here");

        let dir = tempdir().unwrap();
        let path = dir.path().join("nologo.pdf");
        doc.save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_bar_chart_with_zero_max() {
        let mut doc = ReportDocument::new("Training Hours", Theme::default()).unwrap();
        doc.bar_chart(
            &[("internal".to_string(), 0.0), ("external".to_string(), 0.0)],
            None,
        );
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(80.0), "80");
    }
}
