//! Single-page PDF documents: invoices and payslips.
//!
//! Building a [`Document`] and turning it into Typst markup are pure steps;
//! [`PdfRenderer`] compiles that markup into PDF bytes.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::CompanyProfile;
use crate::models::{InvoiceWithClient, PayrollWithConsultant};

mod render;

pub use render::PdfRenderer;

pub const INVOICE_TITLE: &str = "Faktura";
pub const PAYSLIP_TITLE: &str = "Lönespecifikation";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub company: CompanyProfile,
    pub title: String,
    pub lines: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

pub fn invoice_document(
    company: &CompanyProfile,
    row: &InvoiceWithClient,
    generated_at: DateTime<Utc>,
) -> Document {
    let invoice = &row.invoice;
    let amount = invoice
        .amount
        .as_ref()
        .map(|amount| amount.to_string())
        .unwrap_or_default();

    Document {
        company: company.clone(),
        title: INVOICE_TITLE.to_string(),
        lines: vec![
            format!("Kund: {}", row.client.as_deref().unwrap_or("")),
            format!("Datum: {}", invoice.date.format("%Y-%m-%d")),
            format!("Belopp: {amount} kr (inkl. moms)"),
            format!("Typ: {}", invoice.kind),
        ],
        generated_at,
    }
}

pub fn payslip_document(
    company: &CompanyProfile,
    row: &PayrollWithConsultant,
    generated_at: DateTime<Utc>,
) -> Document {
    let payroll = &row.payroll;
    Document {
        company: company.clone(),
        title: PAYSLIP_TITLE.to_string(),
        lines: vec![
            format!("Namn: {}", row.consultant.as_deref().unwrap_or("")),
            format!("Månad: {}", payroll.month),
            format!("Brutto: {} kr", payroll.gross),
            format!("Status: {}", payroll.status),
        ],
        generated_at,
    }
}

impl Document {
    pub fn footer_lines(&self) -> [String; 2] {
        [
            format!("Org.nr: {}", self.company.org_number),
            format!(
                "Genererad: {}",
                self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
        ]
    }

    /// A4 page, 50pt margins; header, field lines and footer top to bottom.
    pub fn to_typst(&self) -> String {
        let mut out =
            String::from("#set page(paper: \"a4\", margin: 50pt)\n#set text(size: 12pt)\n\n");

        push_text(&mut out, "18pt", false, &self.company.name);
        out.push_str("#v(0.3em)\n\n");
        push_text(&mut out, "10pt", true, &self.company.address);
        out.push_str("#v(0.8em)\n\n");
        push_text(&mut out, "16pt", false, &self.title);
        out.push_str("#v(0.5em)\n\n");

        for line in &self.lines {
            push_text(&mut out, "12pt", false, line);
        }

        out.push_str("#v(2em)\n\n");
        for line in self.footer_lines() {
            push_text(&mut out, "9pt", true, &line);
        }

        out
    }
}

fn push_text(out: &mut String, size: &str, muted: bool, value: &str) {
    out.push_str("#text(size: ");
    out.push_str(size);
    if muted {
        out.push_str(", fill: gray");
    }
    out.push_str(", ");
    out.push_str(&string_literal(value));
    out.push_str(")\n\n");
}

/// Quotes `value` as a Typst string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
