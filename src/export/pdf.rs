use crate::export::{ExportError, PlanLine, WorksheetMeta, build_worksheet};
use crate::models::Question;
use crate::utils::wrap_plain_text;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 25.0;
const WRAP_CHARS: usize = 90;
const PT_TO_MM: f32 = 0.352_778;

/// Replace characters the builtin Helvetica font cannot encode with ASCII
/// equivalents, then squash anything still outside latin-1.
pub fn sanitize_for_pdf(text: &str) -> String {
    const REPLACEMENTS: &[(char, &str)] = &[
        ('\u{2018}', "'"),
        ('\u{2019}', "'"),
        ('\u{201c}', "\""),
        ('\u{201d}', "\""),
        ('\u{2013}', "-"),
        ('\u{2014}', "--"),
        ('\u{2026}', "..."),
        ('\u{00a0}', " "),
        ('\u{2022}', "*"),
        ('\u{00b7}', "*"),
        ('\u{2212}', "-"),
        ('\u{00d7}', "x"),
        ('\u{00f7}', "/"),
        ('\u{2264}', "<="),
        ('\u{2265}', ">="),
        ('\u{2260}', "!="),
        ('\u{00b0}', " deg"),
        ('\u{03c0}', "pi"),
        ('\u{00b2}', "^2"),
        ('\u{00b3}', "^3"),
        ('\u{221a}', "sqrt"),
        ('\u{00bd}', "1/2"),
        ('\u{00bc}', "1/4"),
        ('\u{00be}', "3/4"),
    ];

    let mut result = String::with_capacity(text.len());
    'outer: for c in text.chars() {
        for (from, to) in REPLACEMENTS {
            if c == *from {
                result.push_str(to);
                continue 'outer;
            }
        }
        if (c as u32) < 256 {
            result.push(c);
        } else {
            result.push('?');
        }
    }
    result
}

struct PdfRenderer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    y: f32,
}

impl PdfRenderer {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let oblique = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            oblique,
            y: PAGE_HEIGHT - 15.0,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - 15.0;
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_MARGIN {
            self.new_page();
        }
    }

    fn set_color(&self, r: f32, g: f32, b: f32) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn write_line(&mut self, text: &str, font: &IndirectFontRef, size: f32, x: f32, leading: f32) {
        self.ensure_room(leading);
        self.layer
            .use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= leading;
    }

    fn write_wrapped(
        &mut self,
        text: &str,
        font: &IndirectFontRef,
        size: f32,
        x: f32,
        leading: f32,
    ) {
        for line in wrap_plain_text(text, WRAP_CHARS) {
            self.write_line(&line, font, size, x, leading);
        }
    }

    fn write_centered(&mut self, text: &str, font: &IndirectFontRef, size: f32, leading: f32) {
        // rough width estimate for the builtin fonts, good enough to center
        let width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.write_line(text, font, size, x, leading);
    }
}

/// Render the quiz as a print-ready A4 worksheet, optionally followed by a
/// teacher answer key on its own page.
pub fn create_pdf(
    questions: &[Question],
    meta: &WorksheetMeta,
    include_answers: bool,
) -> Result<Vec<u8>, ExportError> {
    let title = if meta.title.is_empty() {
        "Practice Quiz".to_string()
    } else {
        sanitize_for_pdf(&meta.title)
    };
    let mut renderer = PdfRenderer::new(&title)?;
    let plan = build_worksheet(questions, meta, include_answers);

    for line in &plan {
        match line {
            PlanLine::Title(text) => {
                renderer.set_color(0.0, 0.0, 0.0);
                let text = sanitize_for_pdf(text);
                let font = renderer.bold.clone();
                renderer.write_centered(&crate::utils::truncate_string(&text, 60), &font, 16.0, 8.0);
            }
            PlanLine::Subtitle(text) => {
                let font = renderer.regular.clone();
                renderer.write_centered(&sanitize_for_pdf(text), &font, 10.0, 5.0);
            }
            PlanLine::Stamp(text) => {
                renderer.set_color(0.4, 0.4, 0.4);
                let font = renderer.oblique.clone();
                renderer.write_centered(&sanitize_for_pdf(text), &font, 8.0, 6.0);
                renderer.set_color(0.0, 0.0, 0.0);
            }
            PlanLine::Heading(text) => {
                renderer.set_color(0.31, 0.27, 0.9);
                let font = renderer.bold.clone();
                renderer.write_line(&sanitize_for_pdf(text), &font, 14.0, MARGIN, 8.0);
                renderer.set_color(0.0, 0.0, 0.0);
            }
            PlanLine::NameDateLine => {
                let font = renderer.regular.clone();
                renderer.write_line(
                    "Name: _______________________          Date: ____________",
                    &font,
                    11.0,
                    MARGIN,
                    8.0,
                );
            }
            PlanLine::Question { number, badge, text } => {
                let font = renderer.bold.clone();
                let line = format!("{}. {} {}", number, badge, sanitize_for_pdf(text));
                renderer.write_wrapped(&line, &font, 11.0, MARGIN, 6.0);
            }
            PlanLine::Option { label, text } => {
                let font = renderer.regular.clone();
                let line = format!("({}) {}", label, sanitize_for_pdf(text));
                renderer.write_wrapped(&line, &font, 10.0, MARGIN + 10.0, 5.5);
            }
            PlanLine::Choices(text) => {
                let font = renderer.regular.clone();
                renderer.write_line(text, &font, 10.0, MARGIN + 10.0, 5.5);
            }
            PlanLine::AnswerLine => {
                let font = renderer.regular.clone();
                renderer.write_line(
                    "Answer: _________________________________",
                    &font,
                    10.0,
                    MARGIN + 10.0,
                    5.5,
                );
            }
            PlanLine::KeyQuestion { number, text } => {
                let font = renderer.bold.clone();
                let line = format!("{}. {}", number, sanitize_for_pdf(text));
                renderer.write_wrapped(&line, &font, 10.0, MARGIN, 5.5);
            }
            PlanLine::KeyAnswer(text) => {
                renderer.set_color(0.13, 0.77, 0.37);
                let font = renderer.regular.clone();
                let line = format!("Correct Answer: {}", sanitize_for_pdf(text));
                renderer.write_wrapped(&line, &font, 10.0, MARGIN + 10.0, 5.5);
                renderer.set_color(0.0, 0.0, 0.0);
            }
            PlanLine::KeyExplanation(text) => {
                renderer.set_color(0.4, 0.4, 0.4);
                let font = renderer.oblique.clone();
                let line = format!("Explanation: {}", sanitize_for_pdf(text));
                renderer.write_wrapped(&line, &font, 9.0, MARGIN + 10.0, 5.0);
                renderer.set_color(0.0, 0.0, 0.0);
            }
            PlanLine::Blank => {
                renderer.y -= 4.0;
            }
            PlanLine::PageBreak => renderer.new_page(),
        }
    }

    renderer
        .doc
        .save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    fn question() -> Question {
        Question {
            prompt: "What is 2 + 2?".to_string(),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "3".to_string(),
                "4".to_string(),
                "5".to_string(),
                "22".to_string(),
            ],
            correct_index: 1,
            correct_answer: "4".to_string(),
            explanation: "Basic addition.".to_string(),
            misconception_tag: "Concatenating digits".to_string(),
        }
    }

    fn meta() -> WorksheetMeta {
        WorksheetMeta {
            title: "Addition Quiz".to_string(),
            subject: "Math".to_string(),
            grade: "2".to_string(),
            generated_on: "August 26, 2026".to_string(),
        }
    }

    #[test]
    fn test_sanitize_replaces_common_unicode() {
        assert_eq!(sanitize_for_pdf("\u{201c}quote\u{201d}"), "\"quote\"");
        assert_eq!(sanitize_for_pdf("6 \u{00d7} 4 \u{2264} 30"), "6 x 4 <= 30");
        assert_eq!(sanitize_for_pdf("\u{00bd} \u{2026}"), "1/2 ...");
        assert_eq!(sanitize_for_pdf("caf\u{e9}"), "caf\u{e9}");
        assert_eq!(sanitize_for_pdf("\u{4e2d}\u{6587}"), "??");
    }

    #[test]
    fn test_create_pdf_emits_valid_header() {
        let bytes = create_pdf(&[question()], &meta(), true).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_create_pdf_handles_many_questions_across_pages() {
        let questions: Vec<Question> = (0..40).map(|_| question()).collect();
        let bytes = create_pdf(&questions, &meta(), true).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_create_pdf_empty_quiz_still_renders() {
        let bytes = create_pdf(&[], &meta(), false).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
