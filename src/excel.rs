use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ExportError;
use crate::models::DocumentPreview;

const HEADER_BLUE: u32 = 0x1E4E6C;

/// Drop control characters Excel refuses to store; keep tabs and line breaks.
fn sanitize_cell(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            let u = c as u32;
            c == '\t' || c == '\n' || c == '\r' || !(u < 0x20 || u == 0x7F || u == 0xFFFE || u == 0xFFFF)
        })
        .collect()
}

fn write_text_cell_safe(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    format: &Format,
) -> Result<(), XlsxError> {
    let cleaned = sanitize_cell(text);
    worksheet.write_string_with_format(row, col, &cleaned, format).map(|_| ())
}

fn estimate_text_width(text: &str) -> f64 {
    let w = text.chars().count() as f64 * 1.2;
    w.clamp(10.0, 50.0)
}

/// Table headers for the preview: rate and amount only when the document is priced.
fn table_headers(preview: &DocumentPreview) -> Vec<&'static str> {
    let mut headers = vec!["PRODUCT", "DESCRIPTION", "QUANTITY"];
    if preview.fields.pricing {
        headers.extend(["RATE", "AMOUNT"]);
    }
    headers
}

fn table_cells(preview: &DocumentPreview) -> Vec<Vec<&str>> {
    preview
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.product.as_str(), row.description.as_str(), row.quantity.as_str()];
            if let (Some(rate), Some(amount)) = (&row.rate, &row.amount) {
                cells.push(rate.as_str());
                cells.push(amount.as_str());
            }
            cells
        })
        .collect()
}

fn column_widths(headers: &[&str], cells: &[Vec<&str>]) -> Vec<f64> {
    let mut widths: Vec<f64> = headers.iter().map(|h| estimate_text_width(h)).collect();
    for row in cells {
        for (col, value) in row.iter().enumerate() {
            let w = estimate_text_width(value);
            if col < widths.len() && w > widths[col] {
                widths[col] = w;
            }
        }
    }
    widths
}

/// Timestamped file in Downloads (or Desktop); never overwrites an existing file.
fn default_export_path(preview: &DocumentPreview) -> Result<PathBuf, ExportError> {
    let dir = dirs::download_dir()
        .or_else(dirs::desktop_dir)
        .ok_or(ExportError::NoOutputDir)?;
    Ok(unique_path_in(&dir, preview, chrono::Local::now()))
}

fn unique_path_in(
    dir: &Path,
    preview: &DocumentPreview,
    now: chrono::DateTime<chrono::Local>,
) -> PathBuf {
    let stem = preview.title.replace(' ', "_");
    let stamp = now.format("%Y%m%d_%H%M%S");
    let mut p = dir.join(format!("{}_{}.xlsx", stem, stamp));
    let mut counter = 2u32;
    while p.exists() {
        p = dir.join(format!("{}_{}_{}.xlsx", stem, stamp, counter));
        counter += 1;
    }
    p
}

/// Render a print preview into a single-sheet workbook. Returns the saved file path.
pub fn export_document_to_excel(
    preview: &DocumentPreview,
    path_override: Option<&str>,
) -> Result<String, ExportError> {
    let path = match path_override.filter(|s| !s.trim().is_empty()) {
        Some(p) => {
            let mut pb = PathBuf::from(p.trim());
            if pb.extension().map(|e| e.to_str()) != Some(Some("xlsx")) {
                pb.set_extension("xlsx");
            }
            pb
        }
        None => default_export_path(preview)?,
    };
    let path_str = path.to_str().ok_or(ExportError::InvalidPath)?.to_string();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&preview.title)?;
    write_preview(worksheet, preview)?;
    workbook.save(&path)?;

    info!(path = %path_str, document_type = preview.document_type.key(), "document exported");
    Ok(path_str)
}

fn write_preview(worksheet: &mut Worksheet, preview: &DocumentPreview) -> Result<(), XlsxError> {
    let title_format = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_font_color(Color::RGB(HEADER_BLUE));
    let label_format = Format::new().set_bold().set_font_color(Color::RGB(HEADER_BLUE));
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_BLUE))
        .set_font_color(Color::RGB(0xFFFFFF));
    let text_format_wrap = Format::new().set_text_wrap();
    let money_format = Format::new().set_align(FormatAlign::Right);
    let total_format = Format::new().set_bold().set_align(FormatAlign::Right);

    let headers = table_headers(preview);
    let cells = table_cells(preview);
    for (col, &w) in column_widths(&headers, &cells).iter().enumerate() {
        worksheet.set_column_width(col as u16, w)?;
    }
    let last_col = (headers.len() - 1) as u16;

    let mut row: u32 = 0;
    write_text_cell_safe(worksheet, row, 0, &preview.title, &title_format)?;
    row += 1;
    if let Some(number_line) = &preview.number_line {
        write_text_cell_safe(worksheet, row, 0, number_line, &text_format_wrap)?;
        row += 1;
    }
    row += 1;

    for detail in &preview.details {
        write_text_cell_safe(worksheet, row, 0, &detail.label, &label_format)?;
        write_text_cell_safe(worksheet, row, 1, &detail.value, &text_format_wrap)?;
        row += 1;
    }
    row += 1;

    for (col, header) in headers.iter().enumerate() {
        write_text_cell_safe(worksheet, row, col as u16, header, &header_format)?;
    }
    row += 1;
    for line in &cells {
        for (col, value) in line.iter().enumerate() {
            let format = if col >= 3 { &money_format } else { &text_format_wrap };
            write_text_cell_safe(worksheet, row, col as u16, value, format)?;
        }
        row += 1;
    }

    if let Some(totals) = &preview.totals {
        row += 1;
        let mut lines = vec![("Subtotal", totals.subtotal.as_str(), &money_format)];
        if let Some(delivery) = &totals.delivery_cost {
            lines.push(("Delivery Cost", delivery.as_str(), &money_format));
        }
        if let Some(discount) = &totals.discount {
            lines.push(("Discount", discount.as_str(), &money_format));
        }
        lines.push(("Total", totals.total.as_str(), &total_format));
        for (label, value, format) in lines {
            write_text_cell_safe(worksheet, row, last_col - 1, label, &label_format)?;
            write_text_cell_safe(worksheet, row, last_col, value, format)?;
            row += 1;
        }
    }

    if !preview.terms.is_empty() {
        row += 1;
        write_text_cell_safe(worksheet, row, 0, "Terms & Conditions:", &label_format)?;
        row += 1;
        for term in &preview.terms {
            write_text_cell_safe(worksheet, row, 0, &format!("• {}", term), &Format::new())?;
            row += 1;
        }
    }

    row += 2;
    for (i, signature) in preview.signatures.iter().enumerate() {
        // issuer on the right, recipient (challans) on the left
        let col = if i + 1 == preview.signatures.len() { last_col } else { 0 };
        write_text_cell_safe(worksheet, row, col, &signature.name, &label_format)?;
        write_text_cell_safe(worksheet, row + 1, col, &signature.caption, &Format::new())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Signatory;
    use crate::services::projection::project;
    use crate::types::{DocumentRecord, DocumentType};
    use chrono::NaiveDate;

    fn preview(doc_type: DocumentType) -> DocumentPreview {
        let record = DocumentRecord::new(doc_type, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        project(&record, &Signatory::default())
    }

    #[test]
    fn sanitize_keeps_text_and_drops_control_chars() {
        assert_eq!(sanitize_cell("Founder & CEO"), "Founder & CEO");
        assert_eq!(sanitize_cell("a\u{0}b\u{7f}c\nd"), "abc\nd");
    }

    #[test]
    fn challan_table_has_no_pricing_columns() {
        let challan = preview(DocumentType::DeliveryChallan);
        assert_eq!(table_headers(&challan), ["PRODUCT", "DESCRIPTION", "QUANTITY"]);
        assert_eq!(table_cells(&challan)[0].len(), 3);
        let invoice = preview(DocumentType::Invoice);
        assert_eq!(table_headers(&invoice).len(), 5);
        assert_eq!(table_cells(&invoice)[0].len(), 5);
    }

    #[test]
    fn unique_path_skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let quotation = preview(DocumentType::Quotation);
        let now = chrono::Local::now();
        let first = unique_path_in(dir.path(), &quotation, now);
        std::fs::write(&first, b"taken").unwrap();
        let second = unique_path_in(dir.path(), &quotation, now);
        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("_2.xlsx"));
    }

    #[test]
    fn export_writes_an_xlsx_file() {
        let dir = tempfile::tempdir().unwrap();
        for doc_type in DocumentType::ALL {
            let target = dir.path().join(format!("{}-out", doc_type.key()));
            let saved = export_document_to_excel(&preview(doc_type), target.to_str()).unwrap();
            assert!(saved.ends_with(".xlsx"));
            let bytes = std::fs::read(&saved).unwrap();
            assert_eq!(&bytes[..4], &[0x50, 0x4B, 0x03, 0x04]);
        }
    }
}
