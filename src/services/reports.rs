use anyhow::Context;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use crate::core::time::format_primitive;
use crate::repositories::stats::{QuizResultRow, StudentProgressRow};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    layer: printpdf::PdfLayerReference,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> anyhow::Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        let font =
            doc.add_builtin_font(BuiltinFont::Helvetica).context("Failed to load report font")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("Failed to load report font")?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self { doc, font, bold, layer, y: PAGE_HEIGHT_MM - MARGIN_MM })
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        if self.y < MARGIN_MM {
            let (page, layer) =
                self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }

        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= LINE_HEIGHT_MM;
    }

    fn heading(&mut self, text: &str) {
        self.line(text, 16.0, true);
        self.y -= LINE_HEIGHT_MM / 2.0;
    }

    fn finish(self) -> anyhow::Result<Vec<u8>> {
        self.doc.save_to_bytes().context("Failed to serialize report")
    }
}

/// "Rekap Nilai" sheet: every finished attempt on one quiz.
pub(crate) fn quiz_results_report(
    quiz_title: &str,
    rows: &[QuizResultRow],
) -> anyhow::Result<Vec<u8>> {
    let mut writer = PdfWriter::new("Rekap Nilai")?;
    writer.heading("Rekap Nilai");
    writer.line(&format!("Quiz: {quiz_title}"), 11.0, false);
    writer.y -= LINE_HEIGHT_MM / 2.0;

    if rows.is_empty() {
        writer.line("No finished attempts yet.", 11.0, false);
        return writer.finish();
    }

    writer.line("Student / Score / Finished", 11.0, true);
    for row in rows {
        writer.line(
            &format!(
                "{} / {:.2} / {}",
                row.username,
                row.score,
                format_primitive(row.finished_at)
            ),
            11.0,
            false,
        );
    }

    writer.finish()
}

/// Per-student progress over all published quizzes.
pub(crate) fn student_progress_report(
    student_name: &str,
    rows: &[StudentProgressRow],
) -> anyhow::Result<Vec<u8>> {
    let mut writer = PdfWriter::new("Student Progress")?;
    writer.heading("Student Progress");
    writer.line(&format!("Student: {student_name}"), 11.0, false);
    writer.y -= LINE_HEIGHT_MM / 2.0;

    if rows.is_empty() {
        writer.line("No published quizzes yet.", 11.0, false);
        return writer.finish();
    }

    for row in rows {
        let status = match (&row.submission_id, row.finished_at, row.score) {
            (None, _, _) => "not started".to_string(),
            (Some(_), Some(finished_at), Some(score)) => {
                format!("score {:.2}, finished {}", score, format_primitive(finished_at))
            }
            (Some(_), _, _) => format!(
                "in progress, {} of {} answered",
                row.answered.unwrap_or(0),
                row.total_questions
            ),
        };
        writer.line(&format!("{} ({}) - {}", row.quiz_title, row.quiz_code, status), 11.0, false);
    }

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    #[test]
    fn results_report_produces_pdf_bytes() {
        let now = primitive_now_utc();
        let rows = vec![QuizResultRow {
            submission_id: "sub-1".to_string(),
            student_id: "student-1".to_string(),
            username: "budi".to_string(),
            score: 83.33,
            started_at: now,
            finished_at: now,
        }];

        let bytes = quiz_results_report("Algebra Basics", &rows).expect("pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn results_report_handles_empty_list() {
        let bytes = quiz_results_report("Algebra Basics", &[]).expect("pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn progress_report_lists_every_status() {
        let now = primitive_now_utc();
        let rows = vec![
            StudentProgressRow {
                quiz_id: "quiz-1".to_string(),
                quiz_title: "Algebra Basics".to_string(),
                quiz_code: "AB2C3D".to_string(),
                total_questions: 10,
                submission_id: None,
                answered: None,
                score: None,
                started_at: None,
                finished_at: None,
            },
            StudentProgressRow {
                quiz_id: "quiz-2".to_string(),
                quiz_title: "Geometry".to_string(),
                quiz_code: "GE0M22".to_string(),
                total_questions: 5,
                submission_id: Some("sub-2".to_string()),
                answered: Some(2),
                score: None,
                started_at: Some(now),
                finished_at: None,
            },
            StudentProgressRow {
                quiz_id: "quiz-3".to_string(),
                quiz_title: "Fractions".to_string(),
                quiz_code: "FR4CT5".to_string(),
                total_questions: 4,
                submission_id: Some("sub-3".to_string()),
                answered: Some(4),
                score: Some(75.0),
                started_at: Some(now),
                finished_at: Some(now),
            },
        ];

        let bytes = student_progress_report("budi", &rows).expect("pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
