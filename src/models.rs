use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Question categories understood by the generator, the review surface and
/// the exporters. Serialized snake_case to match the model's JSON schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionKind {
    pub fn badge(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "[MC]",
            QuestionKind::TrueFalse => "[T/F]",
            QuestionKind::ShortAnswer => "[SA]",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::ShortAnswer => "short_answer",
        }
    }
}

fn default_correct_index() -> i32 {
    -1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question_text")]
    pub prompt: String,
    #[serde(rename = "question_type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "correct_answer_index", default = "default_correct_index")]
    pub correct_index: i32,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub misconception_tag: String,
}

impl Question {
    /// Blank multiple-choice skeleton used when the teacher adds a question
    /// by hand on the review screen.
    pub fn blank() -> Self {
        Self {
            prompt: String::new(),
            kind: QuestionKind::MultipleChoice,
            options: vec![String::new(), String::new(), String::new(), String::new()],
            correct_index: 0,
            correct_answer: String::new(),
            explanation: String::new(),
            misconception_tag: String::new(),
        }
    }
}

fn default_subject() -> String {
    "General".to_string()
}

fn default_grade() -> String {
    "5".to_string()
}

fn default_concept() -> String {
    "Unknown".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

fn default_confidence() -> f32 {
    0.5
}

fn default_image_count() -> usize {
    1
}

/// Structured result of analyzing one or more notebook pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookAnalysis {
    #[serde(default)]
    pub transcribed_text: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(rename = "detected_grade_level", default = "default_grade")]
    pub grade_level: String,
    #[serde(default = "default_concept")]
    pub core_concept: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub key_terms: Vec<String>,
    #[serde(default)]
    pub visual_elements: Vec<String>,
    #[serde(default)]
    pub content_summary: String,
    #[serde(default = "default_image_count")]
    pub image_count: usize,
}

/// How many questions of each type to request from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPlan {
    pub multiple_choice: usize,
    pub true_false: usize,
    pub short_answer: usize,
}

impl QuestionPlan {
    /// 50% multiple choice, 30% true/false, remainder short answer, with at
    /// least one each of the first two.
    pub fn split(total: usize) -> Self {
        let multiple_choice = (total / 2).max(1);
        let true_false = (total * 3 / 10).max(1);
        let short_answer = total.saturating_sub(multiple_choice + true_false);
        Self {
            multiple_choice,
            true_false,
            short_answer,
        }
    }

    pub fn total(&self) -> usize {
        self.multiple_choice + self.true_false + self.short_answer
    }
}

impl Default for QuestionPlan {
    fn default() -> Self {
        Self {
            multiple_choice: 5,
            true_false: 3,
            short_answer: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageHint {
    Auto,
    English,
    Spanish,
}

impl LanguageHint {
    pub fn cycle(&self) -> Self {
        match self {
            LanguageHint::Auto => LanguageHint::English,
            LanguageHint::English => LanguageHint::Spanish,
            LanguageHint::Spanish => LanguageHint::Auto,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LanguageHint::Auto => "auto",
            LanguageHint::English => "English",
            LanguageHint::Spanish => "Spanish",
        }
    }
}

#[derive(Debug)]
pub enum AiRequest {
    Analyze {
        image_paths: Vec<PathBuf>,
        language_hint: LanguageHint,
    },
    Generate {
        analysis: NotebookAnalysis,
        plan: QuestionPlan,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiStage {
    Analysis,
    Generation,
}

#[derive(Debug)]
pub enum AiResponse {
    Analysis(NotebookAnalysis),
    Questions(Vec<Question>),
    Error { stage: AiStage, error: String },
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Working,
    Analysis,
    Review,
    Quiz,
    QuizQuitConfirm,
    Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_kind_serde_matches_schema() {
        let json = serde_json::to_string(&QuestionKind::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");
        let kind: QuestionKind = serde_json::from_str("\"true_false\"").unwrap();
        assert_eq!(kind, QuestionKind::TrueFalse);
    }

    #[test]
    fn test_question_deserializes_generator_schema() {
        let json = r#"{
            "question_text": "What is 24 / 6?",
            "question_type": "multiple_choice",
            "options": ["4", "6", "18", "30"],
            "correct_answer_index": 0,
            "correct_answer": "4",
            "explanation": "24 / 6 = 4 because 6 x 4 = 24",
            "misconception_tag": "Confusing division with subtraction"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_index, 0);
        assert_eq!(q.correct_answer, "4");
    }

    #[test]
    fn test_question_missing_optional_fields() {
        let json = r#"{
            "question_text": "The number being divided is called the dividend.",
            "question_type": "short_answer",
            "correct_answer": "dividend"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.options.is_empty());
        assert_eq!(q.correct_index, -1);
        assert!(q.explanation.is_empty());
    }

    #[test]
    fn test_analysis_defaults() {
        let a: NotebookAnalysis = serde_json::from_str("{}").unwrap();
        assert_eq!(a.subject, "General");
        assert_eq!(a.grade_level, "5");
        assert_eq!(a.core_concept, "Unknown");
        assert_eq!(a.language, "English");
        assert_eq!(a.confidence, 0.5);
        assert!(a.key_terms.is_empty());
        assert_eq!(a.image_count, 1);
    }

    #[test]
    fn test_plan_split_small_counts() {
        let plan = QuestionPlan::split(10);
        assert_eq!(plan.multiple_choice, 5);
        assert_eq!(plan.true_false, 3);
        assert_eq!(plan.short_answer, 2);
        assert_eq!(plan.total(), 10);

        // The two guaranteed types can swallow everything at tiny totals.
        let plan = QuestionPlan::split(2);
        assert_eq!(plan.multiple_choice, 1);
        assert_eq!(plan.true_false, 1);
        assert_eq!(plan.short_answer, 0);
    }

    #[test]
    fn test_language_hint_cycles_through_all() {
        let mut hint = LanguageHint::Auto;
        hint = hint.cycle();
        assert_eq!(hint, LanguageHint::English);
        hint = hint.cycle();
        assert_eq!(hint, LanguageHint::Spanish);
        hint = hint.cycle();
        assert_eq!(hint, LanguageHint::Auto);
    }

    #[test]
    fn test_blank_question_is_editable_mc() {
        let q = Question::blank();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_index, 0);
    }
}
