//! Referral letter PDF rendering via `printpdf`.
//!
//! Single A4 page, Helvetica builtins, fixed layout mirroring the letter
//! template. Output is deterministic for a given letter: the document ID is
//! derived from the letter content and the PDF dates are pinned to the
//! referral date, so regenerating with unchanged inputs on the same calendar
//! day reproduces the artifact byte-for-byte.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::BufWriter;

use chrono::Datelike;
use printpdf::*;

use super::letter::{LetterRow, ReferralLetter};
use super::ReferralError;

// Layout columns, in mm: 18.0 content margin (~50pt template margin),
// 62.0 value column (120pt label width), 132.0 right-hand letterhead column.

/// Render the letter to PDF bytes.
pub fn render_pdf(letter: &ReferralLetter) -> Result<Vec<u8>, ReferralError> {
    let (doc, page1, layer1) =
        PdfDocument::new(&letter.title, Mm(210.0), Mm(297.0), "Layer 1");

    let stamp = pdf_timestamp(letter.referral_date)?;
    let doc = doc
        .with_document_id(document_id(letter))
        .with_creation_date(stamp)
        .with_mod_date(stamp)
        .with_metadata_date(stamp);

    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReferralError::Render(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReferralError::Render(format!("PDF font error: {e}")))?;

    let mut y = Mm(279.0);

    // Letterhead: clinic name left, address block right
    layer.use_text(&letter.clinic.name, 14.0, Mm(18.0), y, &bold);
    let mut right_y = y;
    layer.use_text(&letter.clinic.name, 8.0, Mm(132.0), right_y, &font);
    right_y -= Mm(3.5);
    for line in &letter.clinic.address_lines {
        layer.use_text(line, 8.0, Mm(132.0), right_y, &font);
        right_y -= Mm(3.5);
    }
    layer.use_text(
        format!("Tel: {}", letter.clinic.phone),
        8.0,
        Mm(132.0),
        right_y,
        &font,
    );
    y = right_y - Mm(8.0);

    // Referral date, right-aligned column
    layer.use_text(
        format!("Referral Date: {}", letter.formatted_date()),
        9.0,
        Mm(132.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    // Title (approximately centered)
    layer.use_text(&letter.title, 13.0, Mm(62.0), y, &bold);
    y -= Mm(10.0);

    // Introduction
    for line in wrap_text(&letter.introduction, 95) {
        layer.use_text(&line, 9.0, Mm(18.0), y, &font);
        y -= Mm(4.5);
    }
    y -= Mm(4.0);

    y = render_rows(
        &layer,
        "PATIENT INFORMATION",
        &letter.patient_information,
        y,
        &font,
        &bold,
    );
    y = render_rows(
        &layer,
        "CLINICAL DETAILS",
        &letter.clinical_details,
        y,
        &font,
        &bold,
    );
    if let Some(rows) = &letter.medical_background {
        y = render_rows(&layer, "MEDICAL BACKGROUND", rows, y, &font, &bold);
    }

    // Primary diagnosis
    layer.use_text("PRIMARY DIAGNOSIS", 11.0, Mm(18.0), y, &bold);
    y -= Mm(6.0);
    for line in wrap_text(&letter.diagnosis_statement, 95) {
        layer.use_text(&line, 9.0, Mm(18.0), y, &font);
        y -= Mm(4.5);
    }
    y -= Mm(6.0);

    // Closing and signature block
    for line in wrap_text(&letter.closing, 95) {
        layer.use_text(&line, 9.0, Mm(18.0), y, &font);
        y -= Mm(4.5);
    }
    y -= Mm(8.0);
    for line in &letter.signature_lines {
        layer.use_text(line, 9.0, Mm(18.0), y, &font);
        y -= Mm(4.5);
    }

    // Confidentiality footer
    layer.use_text(&letter.footer, 7.0, Mm(55.0), Mm(12.0), &font);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReferralError::Render(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReferralError::Render(format!("PDF buffer error: {e}")))
}

/// Render one titled section of label/value rows; returns the next y.
fn render_rows(
    layer: &PdfLayerReference,
    title: &str,
    rows: &[LetterRow],
    mut y: Mm,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) -> Mm {
    layer.use_text(title, 11.0, Mm(18.0), y, bold);
    y -= Mm(6.0);
    for row in rows {
        layer.use_text(&row.label, 9.0, Mm(18.0), y, bold);
        for line in wrap_text(&row.value, 70) {
            layer.use_text(&line, 9.0, Mm(62.0), y, font);
            y -= Mm(4.5);
        }
    }
    y - Mm(4.0)
}

/// Stable document ID derived from the letter content.
fn document_id(letter: &ReferralLetter) -> String {
    let mut hasher = DefaultHasher::new();
    letter.hash(&mut hasher);
    format!("{:032x}", hasher.finish())
}

/// PDF metadata timestamp pinned to midnight of the referral date.
fn pdf_timestamp(date: chrono::NaiveDate) -> Result<time::OffsetDateTime, ReferralError> {
    let month = time::Month::try_from(date.month() as u8)
        .map_err(|e| ReferralError::Render(e.to_string()))?;
    time::Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map(|d| d.midnight().assume_utc())
        .map_err(|e| ReferralError::Render(e.to_string()))
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
