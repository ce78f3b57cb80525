//! Single-page A4 PDF bill statement.
//!
//! The document uses the two standard Helvetica faces, so no fonts are
//! embedded. Layout coordinates are given in millimetres from the top-left
//! corner of the page and converted to PDF points.

use std::fmt::{self, Write};

use billing_core::format;
use billing_core::models::BillResponse;

const PAGE_WIDTH_PT: f64 = 595.28;
const PAGE_HEIGHT_PT: f64 = 841.89;
const POINTS_PER_MM: f64 = 72.0 / 25.4;
/// Average Helvetica glyph advance, in em, used for centring.
const AVERAGE_GLYPH_WIDTH: f64 = 0.5;

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }
}

/// Accumulates the page content stream.
struct Page {
    content: String,
}

impl Page {
    fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    fn text(&mut self, face: Face, size: f64, x_mm: f64, y_mm: f64, text: &str) -> fmt::Result {
        writeln!(
            self.content,
            "BT /{} {:.0} Tf {:.2} {:.2} Td ({}) Tj ET",
            face.resource(),
            size,
            x_mm * POINTS_PER_MM,
            PAGE_HEIGHT_PT - y_mm * POINTS_PER_MM,
            escape(text)
        )
    }

    fn centered(&mut self, face: Face, size: f64, y_mm: f64, text: &str) -> fmt::Result {
        let width_pt = text.chars().count() as f64 * size * AVERAGE_GLYPH_WIDTH;
        let x_mm = (PAGE_WIDTH_PT - width_pt) / 2.0 / POINTS_PER_MM;
        self.text(face, size, x_mm, y_mm, text)
    }

    fn rule(&mut self, width_mm: f64, y_mm: f64) -> fmt::Result {
        let y = PAGE_HEIGHT_PT - y_mm * POINTS_PER_MM;
        writeln!(
            self.content,
            "{:.2} w {:.2} {:.2} m {:.2} {:.2} l S",
            width_mm * POINTS_PER_MM,
            20.0 * POINTS_PER_MM,
            y,
            190.0 * POINTS_PER_MM,
            y
        )
    }
}

/// Escape a string for a PDF literal. Characters outside printable ASCII
/// cannot be shown with the standard encoding and become `?`.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn layout(bill: &BillResponse) -> Result<String, fmt::Error> {
    let mut page = Page::new();

    page.centered(Face::Regular, 20.0, 20.0, "Utility Bill Statement")?;
    page.centered(
        Face::Regular,
        10.0,
        30.0,
        &format!("Generated: {}", format::timestamp(&bill.calculated_at)),
    )?;
    page.rule(0.5, 35.0)?;

    let mut y = 50.0;
    page.text(Face::Regular, 12.0, 20.0, y, "Consumption Details:")?;
    y += 10.0;
    page.text(
        Face::Regular,
        12.0,
        30.0,
        y,
        &format!("Units Consumed: {}", format::units(bill.units_consumed)),
    )?;
    y += 8.0;
    page.text(
        Face::Regular,
        12.0,
        30.0,
        y,
        &format!("Rate per Unit: {}/kWh", format::currency(bill.rate_per_unit)),
    )?;

    y += 15.0;
    page.text(Face::Regular, 12.0, 20.0, y, "Charges Breakdown:")?;
    y += 10.0;
    page.text(
        Face::Regular,
        12.0,
        30.0,
        y,
        &format!("Subtotal (Units x Rate): {}", format::currency(bill.subtotal)),
    )?;
    y += 8.0;
    page.text(
        Face::Regular,
        12.0,
        30.0,
        y,
        &format!(
            "VAT ({}): {}",
            format::percentage(bill.vat_percentage),
            format::currency(bill.vat_amount)
        ),
    )?;
    y += 8.0;
    page.text(
        Face::Regular,
        12.0,
        30.0,
        y,
        &format!(
            "Fixed Service Charge: {}",
            format::currency(bill.fixed_service_charge)
        ),
    )?;

    y += 15.0;
    page.rule(0.3, y)?;
    y += 10.0;
    page.text(
        Face::Bold,
        14.0,
        30.0,
        y,
        &format!("Total Amount Payable: {}", format::currency(bill.total_amount)),
    )?;

    page.centered(Face::Regular, 8.0, 280.0, "Thank you for your business!")?;

    Ok(page.content)
}

/// Render `bill` as a complete PDF document.
pub fn render(bill: &BillResponse) -> Result<Vec<u8>, fmt::Error> {
    let content = layout(bill)?;
    // The EOL before `endstream` is not part of the stream data
    let data = content.strip_suffix('\n').unwrap_or(&content);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH_PT} {PAGE_HEIGHT_PT}] \
             /Resources << /Font << /F1 5 0 R /F2 6 0 R >> >> /Contents 4 0 R >>"
        ),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            data.len(),
            data
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut document = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(document.len());
        write!(document, "{} 0 obj\n{}\nendobj\n", index + 1, body)?;
    }

    let xref_offset = document.len();
    write!(document, "xref\n0 {}\n", objects.len() + 1)?;
    document.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        write!(document, "{:010} 00000 n \n", offset)?;
    }
    write!(
        document,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    )?;

    Ok(document.into_bytes())
}
