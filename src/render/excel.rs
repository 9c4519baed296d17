// src/render/excel.rs

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::parser::models::{ParsedDocument, SourceRecord};
use crate::utils::error::RenderError;

// Palette carried over from the original report template.
const NAVY: Color = Color::RGB(0x1F3864);
const BLUE: Color = Color::RGB(0x2E75B6);
const LIGHT_BLUE: Color = Color::RGB(0xDCE6F1);
const TABLE_HEAD: Color = Color::RGB(0x4472C4);
const GRID_GRAY: Color = Color::RGB(0xB0B0B0);

/// Excel limits sheet names to 31 characters.
const MAX_SHEET_NAME: usize = 31;

struct Styles {
    title: Format,
    section: Format,
    label: Format,
    body: Format,
    body_alt: Format,
    table_header: Format,
    cell: Format,
    cell_alt: Format,
}

impl Styles {
    fn new() -> Self {
        let bordered = || Format::new().set_border(FormatBorder::Thin).set_border_color(GRID_GRAY);
        Styles {
            title: Format::new()
                .set_bold()
                .set_font_name("Arial")
                .set_font_size(13)
                .set_font_color(Color::White)
                .set_background_color(NAVY)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            section: Format::new()
                .set_bold()
                .set_font_name("Arial")
                .set_font_size(10)
                .set_font_color(Color::White)
                .set_background_color(BLUE)
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter),
            label: bordered()
                .set_bold()
                .set_font_name("Arial")
                .set_font_size(10)
                .set_font_color(NAVY),
            body: bordered().set_font_name("Arial").set_font_size(10),
            body_alt: bordered()
                .set_font_name("Arial")
                .set_font_size(10)
                .set_background_color(LIGHT_BLUE),
            table_header: bordered()
                .set_bold()
                .set_font_name("Arial")
                .set_font_size(10)
                .set_font_color(Color::White)
                .set_background_color(TABLE_HEAD)
                .set_align(FormatAlign::Center),
            cell: bordered()
                .set_font_name("Arial")
                .set_font_size(10)
                .set_align(FormatAlign::Center),
            cell_alt: bordered()
                .set_font_name("Arial")
                .set_font_size(10)
                .set_background_color(LIGHT_BLUE)
                .set_align(FormatAlign::Center),
        }
    }
}

/// Renders the parsed document as a styled workbook, one worksheet per
/// record. Depends only on the record shape: canonical name, sparse
/// physical pairs, enclosure cells under the record's column labels.
pub fn write_excel(doc: &ParsedDocument, path: &Path) -> Result<(), RenderError> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();
    let mut used_names: Vec<String> = Vec::new();

    for group in &doc.groups {
        for record in &group.records {
            let name = sheet_name(&group.name, &record.name, &used_names);
            used_names.push(name.clone());

            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&name)?;
            write_record_sheet(worksheet, &group.name, record, &styles)?;
        }
    }

    if used_names.is_empty() {
        // A workbook must contain at least one sheet even for a document
        // with no recognizable sources.
        workbook.add_worksheet().set_name("No Sources")?;
    }

    workbook.save(path)?;
    tracing::info!("Saved workbook to {}", path.display());
    Ok(())
}

fn write_record_sheet(
    worksheet: &mut Worksheet,
    group_name: &str,
    record: &SourceRecord,
    styles: &Styles,
) -> Result<(), RenderError> {
    worksheet.set_screen_gridlines(false);

    let mut row: u32 = 0;

    // Title banner
    let title = format!("Soundvision Report - {} / {}", group_name, record.name);
    worksheet.merge_range(row, 0, row, 5, &title, &styles.title)?;
    worksheet.set_row_height(row, 28)?;
    row += 2;

    // Physical configuration, two key/value pairs per row
    worksheet.merge_range(row, 0, row, 5, "Physical Configuration", &styles.section)?;
    worksheet.set_row_height(row, 20)?;
    row += 1;

    for (i, chunk) in record.physical.chunks(2).enumerate() {
        let value_format = if i % 2 == 0 { &styles.body_alt } else { &styles.body };
        for (offset, (field, value)) in chunk.iter().enumerate() {
            let label_col = (offset * 3) as u16;
            worksheet.write_string_with_format(row, label_col, *field, &styles.label)?;
            worksheet.merge_range(row, label_col + 1, row, label_col + 2, value, value_format)?;
        }
        row += 1;
    }
    row += 1; // spacer

    // Enclosure geometry table
    let labels = record.column_labels();
    let last_col = (labels.len().max(1) - 1) as u16;
    worksheet.merge_range(row, 0, row, last_col, "Per-Enclosure Geometry", &styles.section)?;
    worksheet.set_row_height(row, 20)?;
    row += 1;

    for (col, label) in labels.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, *label, &styles.table_header)?;
    }
    worksheet.set_row_height(row, 18)?;
    row += 1;

    for enclosure in &record.enclosures {
        let format = if enclosure.index() % 2 == 0 { &styles.cell_alt } else { &styles.cell };
        for (col, cell) in enclosure.cells().iter().enumerate() {
            // Numeric cells are written as numbers so spreadsheet consumers
            // can aggregate them.
            match cell.parse::<f64>() {
                Ok(number) => {
                    worksheet.write_number_with_format(row, col as u16, number, format)?
                }
                Err(_) => {
                    worksheet.write_string_with_format(row, col as u16, cell.as_str(), format)?
                }
            };
        }
        row += 1;
    }

    for (col, width) in [20.0, 16.0, 12.0, 12.0, 12.0, 12.0, 10.0].iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    Ok(())
}

/// Builds a worksheet name from group and record names: invalid characters
/// replaced, truncated to Excel's 31-char limit, numeric suffix on
/// collision.
fn sheet_name(group: &str, record: &str, used: &[String]) -> String {
    let raw = format!("{} - {}", group, record);
    let sanitized: String = raw
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '-',
            other => other,
        })
        .collect();

    let base: String = sanitized.chars().take(MAX_SHEET_NAME).collect();
    if !used.contains(&base) {
        return base;
    }

    let mut counter = 2;
    loop {
        let suffix = format!(" ({})", counter);
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        let candidate: String = sanitized.chars().take(keep).collect::<String>() + &suffix;
        if !used.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use std::fs;

    const DOC: &str = "\
1. Group: Mains
2. Source: KARA L
Configuration: Flown
Position (X; Y; Z, m): -5.49; 0.00; 8.06
Enclosures Angles (°) Site (°) Top Z (m) Bottom Z (m) Panflex
#1 KARA II 0.0 -2.5 8.06 7.81 70/70
#2 KARA II -0.25 -2.75 7.81 7.56 70/70
";

    #[test]
    fn test_write_excel_produces_file() {
        let dir = std::env::temp_dir().join("svx_excel_test");
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("venue.xlsx");

        let doc = parse_document(DOC);
        write_excel(&doc, &path).expect("workbook written");

        let metadata = fs::metadata(&path).expect("file exists");
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_write_excel_empty_document() {
        let dir = std::env::temp_dir().join("svx_excel_empty_test");
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("empty.xlsx");

        let doc = parse_document("no headers here");
        write_excel(&doc, &path).expect("workbook written");
        assert!(path.exists());
    }

    #[test]
    fn test_sheet_name_sanitizes_and_truncates() {
        let name = sheet_name("Mains/Delays", "A VERY LONG SOURCE NAME INDEED", &[]);
        assert!(name.chars().count() <= 31);
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_sheet_name_collision_suffix() {
        let first = sheet_name("Mains", "KARA", &[]);
        let second = sheet_name("Mains", "KARA", &[first.clone()]);
        assert_ne!(first, second);
        assert!(second.ends_with("(2)"));
        assert!(second.chars().count() <= 31);
    }
}
