use crate::export::{ExportError, PlanLine, WorksheetMeta, build_worksheet};
use crate::models::Question;
use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};
use std::io::Cursor;

// 0.5" and 0.3" in twips
const OPTION_INDENT: i32 = 720;
const KEY_INDENT: i32 = 432;

const ACCENT_COLOR: &str = "4F46E5";
const CORRECT_COLOR: &str = "22C55E";
const MUTED_COLOR: &str = "646464";

fn indented(indent: i32) -> Paragraph {
    Paragraph::new().indent(Some(indent), None, None, None)
}

/// Render the quiz as an editable Word document mirroring the PDF layout.
pub fn create_docx(
    questions: &[Question],
    meta: &WorksheetMeta,
    include_answers: bool,
) -> Result<Vec<u8>, ExportError> {
    let plan = build_worksheet(questions, meta, include_answers);
    let mut docx = Docx::new();

    for line in &plan {
        let paragraph = match line {
            PlanLine::Title(text) => Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(text.as_str()).bold().size(32)),
            PlanLine::Subtitle(text) => Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(text.as_str()).size(24).color(MUTED_COLOR)),
            PlanLine::Stamp(text) => Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(text.as_str()).italic().size(18)),
            PlanLine::Heading(text) => Paragraph::new().add_run(
                Run::new()
                    .add_text(text.as_str())
                    .bold()
                    .size(28)
                    .color(ACCENT_COLOR),
            ),
            PlanLine::NameDateLine => Paragraph::new().add_run(
                Run::new().add_text("Name: _________________________    Date: ____________"),
            ),
            PlanLine::Question { number, badge, text } => Paragraph::new()
                .add_run(Run::new().add_text(format!("{}. {} ", number, badge)).bold())
                .add_run(Run::new().add_text(text.as_str())),
            PlanLine::Option { label, text } => indented(OPTION_INDENT)
                .add_run(Run::new().add_text(format!("({}) {}", label, text))),
            PlanLine::Choices(text) => {
                indented(OPTION_INDENT).add_run(Run::new().add_text(text.as_str()))
            }
            PlanLine::AnswerLine => indented(OPTION_INDENT)
                .add_run(Run::new().add_text("Answer: _________________________________")),
            PlanLine::KeyQuestion { number, text } => Paragraph::new()
                .add_run(Run::new().add_text(format!("{}. ", number)).bold())
                .add_run(Run::new().add_text(text.as_str())),
            PlanLine::KeyAnswer(text) => indented(KEY_INDENT)
                .add_run(Run::new().add_text("Correct Answer: ").bold())
                .add_run(Run::new().add_text(text.as_str()).color(CORRECT_COLOR)),
            PlanLine::KeyExplanation(text) => indented(KEY_INDENT)
                .add_run(Run::new().add_text("Explanation: ").italic())
                .add_run(Run::new().add_text(text.as_str()).color(MUTED_COLOR).size(20)),
            PlanLine::Blank => Paragraph::new(),
            PlanLine::PageBreak => {
                Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
            }
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}
