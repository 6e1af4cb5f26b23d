//! PDF report of a single record.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use dentasys_i18n::{Language, Locale};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use serde::{Deserialize, Serialize};

use super::{ExportError, ExportResult};
use crate::db::Database;
use crate::models::{format_money, Doctor, Financials, Patient, Payment, Record, Treatment};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const LEFT: f32 = 20.0;

const ROW_HEIGHT: f32 = 5.0;
const NOTES_MAX_CHARS: usize = 40;
const NAME_MAX_CHARS: usize = 38;

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfOptions {
    /// Printed in front of every amount.
    pub currency_symbol: String,
    /// TrueType font able to draw Arabic. Without it Arabic reports use
    /// English labels, since the built-in fonts only cover Latin text.
    pub font_path: Option<PathBuf>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            font_path: None,
        }
    }
}

/// Everything printed in a record report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordReport {
    pub record: Record,
    pub doctor: Doctor,
    pub patient: Patient,
    pub treatments: Vec<Treatment>,
    pub payments: Vec<Payment>,
    pub financials: Financials,
    pub generated_at: String,
}

impl RecordReport {
    /// Gather a record with its people, children and totals.
    pub fn build(db: &Database, record_id: i64) -> ExportResult<Self> {
        let record = db
            .get_record(record_id)?
            .ok_or(ExportError::RecordNotFound(record_id))?;
        let doctor = db.require_doctor(record.doctor_id)?;
        let patient = db.require_patient(record.patient_id)?;

        Ok(Self {
            treatments: db.list_treatments(record_id)?,
            payments: db.list_payments(record_id)?,
            financials: db.record_financials(record_id)?,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
            record,
            doctor,
            patient,
        })
    }

    /// Suggested file name, e.g. `record_12_Layla.pdf`.
    pub fn file_name(&self) -> String {
        let patient: String = self
            .patient
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        format!("record_{}_{}.pdf", self.record.id, patient)
    }

    /// Render the report to PDF bytes.
    pub fn render_pdf(&self, locale: &Locale<'_>, options: &PdfOptions) -> ExportResult<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            format!("Record {}", self.record.id),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );

        let (regular, bold, labels) = match &options.font_path {
            Some(path) => {
                let font = load_font(&doc, path)?;
                (font.clone(), font, *locale)
            }
            None => {
                let labels = if locale.language() == Language::English {
                    *locale
                } else {
                    tracing::warn!(
                        language = %locale.language(),
                        "no PDF font configured, using English labels"
                    );
                    locale.in_language(Language::English)
                };
                (
                    builtin(&doc, BuiltinFont::Helvetica)?,
                    builtin(&doc, BuiltinFont::HelveticaBold)?,
                    labels,
                )
            }
        };

        let layer = doc.get_page(page).get_layer(layer);
        let mut out = PageWriter {
            doc: &doc,
            layer,
            y: TOP,
            pages: 1,
            regular,
            bold,
        };
        let money = |v: f64| format_money(v, &options.currency_symbol);

        // Header
        out.line(labels.text("pdf_report_title"), 16.0, true);
        out.gap(2.0);
        out.line(
            &format!("{}: {}", labels.text("generated_on"), self.generated_at),
            9.0,
            false,
        );
        out.line(
            &format!(
                "{}: {}    {}: {}",
                labels.text("record_id"),
                self.record.id,
                labels.text("col_created"),
                self.record.created_at
            ),
            9.0,
            false,
        );
        out.gap(3.0);
        out.line(
            &format!(
                "{}: {}{}",
                labels.text("col_doctor"),
                self.doctor.name,
                self.doctor
                    .phone
                    .as_deref()
                    .map(|p| format!("  ({})", p))
                    .unwrap_or_default()
            ),
            10.0,
            false,
        );
        out.line(
            &format!(
                "{}: {}  ({})",
                labels.text("col_patient"),
                self.patient.name,
                self.patient.phone
            ),
            10.0,
            false,
        );
        out.gap(6.0);

        // Treatments
        out.line(labels.text("pdf_treatments"), 12.0, true);
        out.gap(1.0);
        if self.treatments.is_empty() {
            out.line(labels.text("pdf_no_treatments"), 9.0, false);
        } else {
            let columns = [LEFT, 95.0, 125.0, 150.0];
            out.row(
                &columns,
                &[
                    labels.text("col_treatment_name"),
                    labels.text("col_cost"),
                    labels.text("col_date"),
                    labels.text("col_notes"),
                ],
                true,
            );
            for t in &self.treatments {
                out.row(
                    &columns,
                    &[
                        clip(&t.name, NAME_MAX_CHARS).as_str(),
                        money(t.cost).as_str(),
                        date_text(t.date).as_str(),
                        clip(t.notes.as_deref().unwrap_or(""), NOTES_MAX_CHARS).as_str(),
                    ],
                    false,
                );
            }
        }
        out.gap(6.0);

        // Payments
        out.line(labels.text("pdf_payments"), 12.0, true);
        out.gap(1.0);
        if self.payments.is_empty() {
            out.line(labels.text("pdf_no_payments"), 9.0, false);
        } else {
            let columns = [LEFT, 60.0, 95.0];
            out.row(
                &columns,
                &[
                    labels.text("col_amount"),
                    labels.text("col_date"),
                    labels.text("col_notes"),
                ],
                true,
            );
            for p in &self.payments {
                out.row(
                    &columns,
                    &[
                        money(p.amount).as_str(),
                        date_text(p.date).as_str(),
                        clip(p.notes.as_deref().unwrap_or(""), NOTES_MAX_CHARS * 2).as_str(),
                    ],
                    false,
                );
            }
        }
        out.gap(6.0);

        // Totals
        out.line(labels.text("pdf_totals"), 12.0, true);
        out.gap(1.0);
        let totals = [
            (labels.text("total_cost"), money(self.financials.cost)),
            (labels.text("total_paid"), money(self.financials.amount)),
            (
                labels.text("balance"),
                format!(
                    "{}  ({})",
                    money(self.financials.balance),
                    labels.text(self.financials.status().label_key())
                ),
            ),
        ];
        for (label, value) in &totals {
            out.row(&[LEFT, 70.0], &[*label, value.as_str()], false);
        }

        let pages = out.pages;
        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| ExportError::Pdf(format!("save failed: {e}")))?;
        let bytes = buf
            .into_inner()
            .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))?;

        tracing::debug!(record_id = self.record.id, pages, bytes = bytes.len(), "pdf rendered");
        Ok(bytes)
    }

    /// Render and write to `path`, replacing any existing file.
    pub fn write_pdf(
        &self,
        path: &Path,
        locale: &Locale<'_>,
        options: &PdfOptions,
    ) -> ExportResult<()> {
        let bytes = self.render_pdf(locale, options)?;
        std::fs::write(path, bytes)?;
        tracing::info!(record_id = self.record.id, path = %path.display(), "record exported");
        Ok(())
    }
}

fn builtin(doc: &PdfDocumentReference, font: BuiltinFont) -> ExportResult<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))
}

fn load_font(doc: &PdfDocumentReference, path: &Path) -> ExportResult<IndirectFontRef> {
    let file = File::open(path)?;
    doc.add_external_font(file)
        .map_err(|e| ExportError::Pdf(format!("font {} unusable: {e}", path.display())))
}

fn date_text(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}

/// Shorten to `max` characters, marking the cut with `...`.
fn clip(text: &str, max: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= max {
        return text;
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

/// Top-down text cursor that starts a new page when it runs out of room.
struct PageWriter<'d> {
    doc: &'d PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageWriter<'_> {
    fn ensure_room(&mut self, height: f32) {
        if self.y - height >= BOTTOM {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Layer {}", self.pages + 1));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        self.y = TOP;
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        let height = size * 0.5;
        self.ensure_room(height);
        self.layer
            .use_text(text, size, Mm(LEFT), Mm(self.y), self.font(bold));
        self.y -= height;
    }

    fn row(&mut self, columns: &[f32], cells: &[&str], bold: bool) {
        self.ensure_room(ROW_HEIGHT);
        for (x, cell) in columns.iter().zip(cells) {
            self.layer
                .use_text(*cell, 9.0, Mm(*x), Mm(self.y), self.font(bold));
        }
        self.y -= ROW_HEIGHT;
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }
}
