//! Printable A4 rendering of a report via `printpdf`.
//!
//! Mirrors the on-screen report: patient header, then tests grouped by
//! category (uncategorized rows under "Other", categories in
//! first-appearance order), each with value, status tag, and reference
//! range.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use labwise_core::models::report::LabReport;
use labwise_core::models::test::TestResult;

use crate::error::ExportError;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP_Y: Mm = Mm(280.0);
const BOTTOM_MARGIN: Mm = Mm(18.0);

pub fn export_pdf(report: &LabReport) -> Result<Vec<u8>, ExportError> {
    let (doc, page1, layer1) =
        PdfDocument::new("Laboratory Results", PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;

    let mut cursor = Cursor {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        y: TOP_Y,
    };

    // Header block
    cursor.text(&bold, 16.0, Mm(20.0), "Laboratory Results");
    cursor.down(Mm(6.0));
    cursor.text(&font, 10.0, Mm(20.0), &report.date_display());
    cursor.down(Mm(8.0));
    cursor.text(&font, 10.0, Mm(20.0), &format!("Patient Name: {}", report.patient_name));
    cursor.down(Mm(5.0));
    cursor.text(&font, 10.0, Mm(20.0), &format!("Patient ID: {}", report.patient_id));
    cursor.down(Mm(10.0));

    for (category, tests) in group_by_category(&report.results) {
        cursor.ensure_room(Mm(18.0));
        cursor.text(&bold, 12.0, Mm(20.0), &category);
        cursor.down(Mm(7.0));

        for test in tests {
            cursor.ensure_room(Mm(16.0));

            let value = test
                .value
                .as_ref()
                .map(|v| format!("{v} {}", test.unit).trim_end().to_string())
                .unwrap_or_else(|| "not entered".to_string());

            cursor.text(&bold, 10.0, Mm(25.0), &test.test_name);
            cursor.text(
                &bold,
                10.0,
                Mm(160.0),
                &test.status.to_string().to_uppercase(),
            );
            cursor.down(Mm(5.0));
            cursor.text(&font, 10.0, Mm(25.0), &value);
            cursor.down(Mm(4.5));
            for line in wrap_text(
                &format!("Reference Range: {}", test.reference_range),
                90,
            ) {
                cursor.text(&font, 8.0, Mm(25.0), &line);
                cursor.down(Mm(4.0));
            }
            cursor.down(Mm(2.5));
        }
        cursor.down(Mm(3.0));
    }

    drop(cursor);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
}

/// Display grouping: categories in first-appearance order, uncategorized
/// rows under "Other". Insertion order is preserved inside each group.
pub fn group_by_category(results: &[TestResult]) -> Vec<(String, Vec<&TestResult>)> {
    let mut groups: Vec<(String, Vec<&TestResult>)> = Vec::new();
    for test in results {
        let label = test.category_label();
        match groups.iter_mut().find(|(name, _)| name == label) {
            Some((_, tests)) => tests.push(test),
            None => groups.push((label.to_string(), vec![test])),
        }
    }
    groups
}

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl Cursor<'_> {
    fn text(&self, font: &IndirectFontRef, size: f32, x: Mm, text: &str) {
        self.layer.use_text(text, size, x, self.y, font);
    }

    fn down(&mut self, amount: Mm) {
        self.y -= amount;
    }

    /// Start a new page when fewer than `needed` millimeters remain.
    fn ensure_room(&mut self, needed: Mm) {
        if self.y.0 < BOTTOM_MARGIN.0 + needed.0 {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_Y;
        }
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
