pub mod docx;
pub mod json;
pub mod pdf;

pub use docx::create_docx;
pub use json::{GameState, QUIZ_SCHEMA_VERSION, QuizExport, QuizMetadata, create_json_export, import_from_json};
pub use pdf::create_pdf;

use crate::models::{Question, QuestionKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("DOCX generation failed: {0}")]
    Docx(String),
    #[error("invalid quiz JSON: {0}")]
    Json(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Document header fields shared by the PDF and DOCX renderers. The caller
/// supplies the date string so identical inputs produce identical documents.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetMeta {
    pub title: String,
    pub subject: String,
    pub grade: String,
    pub generated_on: String,
}

impl WorksheetMeta {
    pub fn subtitle(&self) -> Option<String> {
        match (self.subject.is_empty(), self.grade.is_empty()) {
            (false, false) => Some(format!("{} - Grade {}", self.subject, self.grade)),
            (false, true) => Some(self.subject.clone()),
            (true, false) => Some(format!("Grade {}", self.grade)),
            (true, true) => None,
        }
    }
}

/// One logical line of the rendered worksheet. Both exporters walk the same
/// plan so the two formats always agree on content and ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanLine {
    Title(String),
    Subtitle(String),
    Stamp(String),
    Heading(String),
    NameDateLine,
    Question {
        number: usize,
        badge: &'static str,
        text: String,
    },
    Option {
        label: char,
        text: String,
    },
    Choices(String),
    AnswerLine,
    KeyQuestion {
        number: usize,
        text: String,
    },
    KeyAnswer(String),
    KeyExplanation(String),
    Blank,
    PageBreak,
}

/// Lay out the student worksheet (and optionally the teacher key) as a flat
/// sequence of lines.
pub fn build_worksheet(
    questions: &[Question],
    meta: &WorksheetMeta,
    include_answers: bool,
) -> Vec<PlanLine> {
    let mut plan = Vec::new();

    plan.push(PlanLine::Title(meta.title.clone()));
    if let Some(subtitle) = meta.subtitle() {
        plan.push(PlanLine::Subtitle(subtitle));
    }
    plan.push(PlanLine::Stamp(format!("Generated: {}", meta.generated_on)));
    plan.push(PlanLine::Blank);

    plan.push(PlanLine::Heading("Student Worksheet".to_string()));
    plan.push(PlanLine::NameDateLine);
    plan.push(PlanLine::Blank);

    for (i, question) in questions.iter().enumerate() {
        plan.push(PlanLine::Question {
            number: i + 1,
            badge: question.kind.badge(),
            text: question.prompt.clone(),
        });

        match question.kind {
            QuestionKind::MultipleChoice => {
                for (j, option) in question.options.iter().take(4).enumerate() {
                    plan.push(PlanLine::Option {
                        label: (b'A' + j as u8) as char,
                        text: option.clone(),
                    });
                }
            }
            QuestionKind::TrueFalse => {
                plan.push(PlanLine::Choices(
                    "(   ) True    (   ) False".to_string(),
                ));
            }
            QuestionKind::ShortAnswer => {
                plan.push(PlanLine::AnswerLine);
            }
        }
        plan.push(PlanLine::Blank);
    }

    if include_answers {
        plan.push(PlanLine::PageBreak);
        plan.push(PlanLine::Heading("Teacher Answer Key".to_string()));
        plan.push(PlanLine::Blank);

        for (i, question) in questions.iter().enumerate() {
            plan.push(PlanLine::KeyQuestion {
                number: i + 1,
                text: question.prompt.clone(),
            });
            plan.push(PlanLine::KeyAnswer(question.correct_answer.clone()));
            if !question.explanation.is_empty() {
                plan.push(PlanLine::KeyExplanation(question.explanation.clone()));
            }
            plan.push(PlanLine::Blank);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> WorksheetMeta {
        WorksheetMeta {
            title: "Fractions Quiz".to_string(),
            subject: "Math".to_string(),
            grade: "4".to_string(),
            generated_on: "August 26, 2026".to_string(),
        }
    }

    fn questions() -> Vec<Question> {
        vec![
            Question {
                prompt: "What is 1/2 + 1/4?".to_string(),
                kind: QuestionKind::MultipleChoice,
                options: vec![
                    "3/4".to_string(),
                    "2/6".to_string(),
                    "1/6".to_string(),
                    "2/4".to_string(),
                ],
                correct_index: 0,
                correct_answer: "3/4".to_string(),
                explanation: "Convert to fourths first.".to_string(),
                misconception_tag: "Adding numerators and denominators".to_string(),
            },
            Question {
                prompt: "1/2 is larger than 3/4.".to_string(),
                kind: QuestionKind::TrueFalse,
                options: vec!["True".to_string(), "False".to_string()],
                correct_index: 1,
                correct_answer: "False".to_string(),
                explanation: String::new(),
                misconception_tag: "Comparing denominators only".to_string(),
            },
            Question {
                prompt: "The top number of a fraction is the _____.".to_string(),
                kind: QuestionKind::ShortAnswer,
                options: vec![],
                correct_index: -1,
                correct_answer: "numerator".to_string(),
                explanation: "The numerator counts the parts.".to_string(),
                misconception_tag: "Numerator vs denominator".to_string(),
            },
        ]
    }

    #[test]
    fn test_subtitle_combinations() {
        let mut m = meta();
        assert_eq!(m.subtitle().unwrap(), "Math - Grade 4");
        m.grade.clear();
        assert_eq!(m.subtitle().unwrap(), "Math");
        m.subject.clear();
        assert_eq!(m.subtitle(), None);
        m.grade = "4".to_string();
        assert_eq!(m.subtitle().unwrap(), "Grade 4");
    }

    #[test]
    fn test_plan_renders_each_question_kind() {
        let plan = build_worksheet(&questions(), &meta(), false);

        assert_eq!(plan[0], PlanLine::Title("Fractions Quiz".to_string()));
        assert!(plan.contains(&PlanLine::Heading("Student Worksheet".to_string())));
        assert!(plan.contains(&PlanLine::Option {
            label: 'A',
            text: "3/4".to_string()
        }));
        assert!(plan.contains(&PlanLine::Choices("(   ) True    (   ) False".to_string())));
        assert!(plan.contains(&PlanLine::AnswerLine));
        assert!(!plan.iter().any(|l| matches!(l, PlanLine::KeyAnswer(_))));
        assert!(!plan.contains(&PlanLine::PageBreak));
    }

    #[test]
    fn test_answer_key_follows_page_break() {
        let plan = build_worksheet(&questions(), &meta(), true);

        let break_at = plan.iter().position(|l| *l == PlanLine::PageBreak).unwrap();
        let key_at = plan
            .iter()
            .position(|l| *l == PlanLine::Heading("Teacher Answer Key".to_string()))
            .unwrap();
        assert!(key_at > break_at);
        assert!(plan.contains(&PlanLine::KeyAnswer("numerator".to_string())));
        // empty explanations are skipped
        let explanations = plan
            .iter()
            .filter(|l| matches!(l, PlanLine::KeyExplanation(_)))
            .count();
        assert_eq!(explanations, 2);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = build_worksheet(&questions(), &meta(), true);
        let b = build_worksheet(&questions(), &meta(), true);
        assert_eq!(a, b);
    }
}
