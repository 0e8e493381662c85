//! PDF rendering of the year register.
//!
//! Typeset with printpdf's built-in Helvetica faces on A4 portrait. Each
//! register row prints as a short block; the cursor walks down the page and
//! a new page starts when the block would not fit.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::BufWriter;

use crate::domain::Error;
use crate::domain::report::{YearReport, YearReportRow};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 18.0;
const MARGIN_BOTTOM: f32 = 20.0;
const TOP_START: f32 = 280.0;
const WRAP_COLUMNS: usize = 96;

/// Greedy word wrap on character count; long unbroken words are split hard.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut rest: Vec<char> = word.chars().collect();
        while rest.len() > max_chars {
            lines.push(rest.drain(..max_chars).collect());
        }
        current = rest.into_iter().collect();
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

#[expect(
    clippy::float_arithmetic,
    reason = "page layout is measured in millimetres"
)]
fn render_row(layer: &PdfLayerReference, fonts: &Fonts, row: &YearReportRow, y: &mut f32) {
    let heading = format!(
        "{}   {}   {}",
        row.number, row.diary_date, row.status
    );
    layer.use_text(heading, 10.0, Mm(MARGIN_LEFT), Mm(*y), &fonts.bold);
    *y -= 4.5;

    let detail = format!(
        "From: {}   Ref: {}   Kind: {}   Folders: {}   Marked to: {}",
        row.received_from, row.received_diary_no, row.kind, row.folders, row.marked_to
    );
    for line in wrap_text(&detail, WRAP_COLUMNS) {
        layer.use_text(line, 8.0, Mm(MARGIN_LEFT + 4.0), Mm(*y), &fonts.regular);
        *y -= 3.8;
    }

    if !row.subject.is_empty() {
        for line in wrap_text(&format!("Subject: {}", row.subject), WRAP_COLUMNS) {
            layer.use_text(line, 8.0, Mm(MARGIN_LEFT + 4.0), Mm(*y), &fonts.regular);
            *y -= 3.8;
        }
    }

    for line in wrap_text(&format!("History: {}", row.history_plain), WRAP_COLUMNS) {
        layer.use_text(line, 8.0, Mm(MARGIN_LEFT + 4.0), Mm(*y), &fonts.regular);
        *y -= 3.8;
    }

    *y -= 2.5;
}

/// Conservative height estimate used for the page-break decision.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "page layout is measured in millimetres"
)]
fn row_height(row: &YearReportRow) -> f32 {
    let wrapped = |text: &str| wrap_text(text, WRAP_COLUMNS).len() as f32;
    // Two lines usually cover the detail field; subject and history wrap.
    let mut lines = 2.0 + wrapped(&row.history_plain);
    if !row.subject.is_empty() {
        lines += wrapped(&row.subject);
    }
    4.5 + lines * 3.8 + 2.5
}

/// Render the register into PDF bytes.
///
/// # Errors
/// Surfaces font registration and serialisation failures as internal
/// errors; both indicate a bug rather than bad input.
#[expect(
    clippy::float_arithmetic,
    reason = "page layout is measured in millimetres"
)]
pub(crate) fn render_year_report_pdf(report: &YearReport) -> Result<Vec<u8>, Error> {
    let title = format!("Diary Register {}", report.year);
    let (doc, first_page, first_layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "register");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| Error::internal(format!("pdf font error: {err}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|err| Error::internal(format!("pdf font error: {err}")))?,
    };

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = TOP_START;

    layer.use_text(&title, 14.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
    y -= 6.0;
    layer.use_text(
        format!("{} entries", report.rows.len()),
        9.0,
        Mm(MARGIN_LEFT),
        Mm(y),
        &fonts.regular,
    );
    y -= 8.0;

    for row in &report.rows {
        if y - row_height(row) < MARGIN_BOTTOM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "register");
            layer = doc.get_page(page).get_layer(page_layer);
            y = TOP_START;
        }
        render_row(&layer, &fonts, row, &mut y);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|err| Error::internal(format!("pdf save error: {err}")))?;
    buf.into_inner()
        .map_err(|err| Error::internal(format!("pdf buffer error: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::year_report;
    use crate::domain::{
        Diary, DiaryNumber, DiaryStatus, DocumentKind, Movement, MovementAction, UserId,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn entry(sequence: u32, subject: &str) -> (Diary, Vec<Movement>) {
        let diary = Diary {
            id: Uuid::new_v4(),
            number: DiaryNumber::new(2026, sequence).expect("number"),
            diary_date: NaiveDate::from_ymd_opt(2026, 6, 1).expect("date"),
            received_from: "Office X".to_owned(),
            received_diary_no: String::new(),
            kind: DocumentKind::Letter,
            folders: 0,
            subject: subject.to_owned(),
            remarks: String::new(),
            marked_to: String::new(),
            marked_date: None,
            status: DiaryStatus::Forwarded,
            created_by: UserId::random(),
            created_at: Utc::now(),
        };
        let movement = Movement {
            id: Uuid::new_v4(),
            diary_id: diary.id,
            number: diary.number,
            from_office: "X".to_owned(),
            to_office: "OFFICE_PDF_B".to_owned(),
            action: MovementAction::Forwarded,
            action_at: Utc
                .with_ymd_and_hms(2026, 6, 2, 9, 0, 0)
                .single()
                .expect("timestamp"),
            remarks: String::new(),
            created_by: UserId::random(),
            created_on: Utc::now(),
        };
        (diary, vec![movement])
    }

    #[rstest]
    fn wrap_respects_the_column_limit() {
        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[rstest]
    fn wrap_splits_unbroken_words_hard() {
        let lines = wrap_text(&"x".repeat(25), 10);
        assert_eq!(lines.len(), 3);
    }

    #[rstest]
    fn wrap_of_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[rstest]
    fn renders_a_parseable_pdf_with_the_history_text() {
        let report = year_report(2026, vec![entry(1, "Pension case")]);
        let bytes = render_year_report_pdf(&report).expect("pdf bytes");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[rstest]
    fn long_registers_spill_onto_more_pages() {
        let entries: Vec<_> = (1..=120).map(|seq| entry(seq, "A subject line")).collect();
        let report = year_report(2026, entries);
        let bytes = render_year_report_pdf(&report).expect("pdf bytes");
        // One page holds nowhere near 120 blocks. The count includes the
        // single page-tree node, so anything above two means real pages.
        let needle = b"/Type /Page";
        let pages = bytes
            .windows(needle.len())
            .filter(|window| *window == needle.as_slice())
            .count();
        assert!(pages > 2, "expected a multi-page document, got {pages}");
    }
}
