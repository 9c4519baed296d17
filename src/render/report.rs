// src/render/report.rs

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::parser::models::{ParsedDocument, SourceRecord};
use crate::utils::error::RenderError;

// A4 geometry in millimeters.
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_STEP: f32 = 6.0;

const TITLE_SIZE: f32 = 16.0;
const SECTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

/// Renders the parsed document as a paginated A4 report. Each record starts
/// on its own page; long enclosure tables continue onto fresh pages. Like
/// the spreadsheet renderer this consumes only the record shape, never the
/// raw document text.
pub fn write_report(model: &ParsedDocument, path: &Path) -> Result<(), RenderError> {
    let (doc, page, layer) = PdfDocument::new(
        "Soundvision Report",
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Report(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Report(e.to_string()))?;

    {
        let mut writer = PageWriter {
            doc: &doc,
            regular: &regular,
            bold: &bold,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_H - MARGIN,
        };

        let mut first = true;
        for group in &model.groups {
            for record in &group.records {
                if !first {
                    writer.new_page();
                }
                first = false;
                writer.record_section(&group.name, record);
            }
        }

        if first {
            writer.line("No sources recognized in this document.", BODY_SIZE, false);
        }
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| RenderError::Report(e.to_string()))?;

    tracing::info!("Saved report to {}", path.display());
    Ok(())
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN;
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            self.new_page();
        }
    }

    fn text_at(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { self.bold } else { self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        self.ensure_room(LINE_STEP);
        self.text_at(text, size, MARGIN, bold);
        self.y -= LINE_STEP;
    }

    fn spacer(&mut self) {
        self.y -= LINE_STEP / 2.0;
    }

    fn record_section(&mut self, group_name: &str, record: &SourceRecord) {
        self.line(
            &format!("{} / {}", group_name, record.name),
            TITLE_SIZE,
            true,
        );
        self.spacer();

        self.line("Physical Configuration", SECTION_SIZE, true);
        for (field, value) in &record.physical {
            self.line(&format!("{}: {}", field, value), BODY_SIZE, false);
        }
        self.spacer();

        self.line("Per-Enclosure Geometry", SECTION_SIZE, true);
        let labels = record.column_labels();
        let offsets = column_offsets(labels.len());

        self.ensure_room(LINE_STEP);
        for (label, x) in labels.iter().zip(&offsets) {
            self.text_at(label, BODY_SIZE, *x, true);
        }
        self.y -= LINE_STEP;

        for enclosure in &record.enclosures {
            self.ensure_room(LINE_STEP);
            for (cell, x) in enclosure.cells().iter().zip(&offsets) {
                self.text_at(cell, BODY_SIZE, *x, false);
            }
            self.y -= LINE_STEP;
        }
    }
}

/// Left edge of every table column: narrow index column, wide type column,
/// the rest sharing the remaining width evenly.
fn column_offsets(columns: usize) -> Vec<f32> {
    let usable = PAGE_W - 2.0 * MARGIN;
    let index_w = 16.0;
    let type_w = 34.0;
    let numeric = columns.max(3) - 2;
    let numeric_w = (usable - index_w - type_w) / numeric as f32;

    let mut offsets = vec![MARGIN, MARGIN + index_w];
    let mut x = MARGIN + index_w + type_w;
    for _ in 2..columns {
        offsets.push(x);
        x += numeric_w;
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use std::fs;

    #[test]
    fn test_column_offsets_match_arity() {
        for columns in [5, 6, 7] {
            let offsets = column_offsets(columns);
            assert_eq!(offsets.len(), columns);
            // Offsets ascend and stay inside the printable area.
            for pair in offsets.windows(2) {
                assert!(pair[0] < pair[1]);
            }
            assert!(*offsets.last().expect("non-empty") < PAGE_W - MARGIN);
        }
    }

    #[test]
    fn test_write_report_produces_file() {
        let dir = std::env::temp_dir().join("svx_report_test");
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("venue_report.pdf");

        let doc = parse_document(
            "\
1. Group: Mains
2. Source: KARA L
Configuration: Flown
Position (X; Y; Z, m): -5.49; 0.00; 8.06
Enclosures Angles (°) Site (°) Top Z (m) Bottom Z (m) Panflex
#1 KARA II 0.0 -2.5 8.06 7.81 70/70
",
        );
        write_report(&doc, &path).expect("report written");

        let metadata = fs::metadata(&path).expect("file exists");
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_write_report_empty_document() {
        let dir = std::env::temp_dir().join("svx_report_empty_test");
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("empty_report.pdf");

        let doc = parse_document("nothing to see");
        write_report(&doc, &path).expect("report written");
        assert!(path.exists());
    }
}
