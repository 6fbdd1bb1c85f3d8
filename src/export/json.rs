use crate::export::ExportError;
use crate::models::{NotebookAnalysis, Question, QuestionKind, QuestionPlan};
use serde::{Deserialize, Serialize};

pub const QUIZ_SCHEMA_VERSION: &str = "2.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub schema_version: String,
}

/// Snapshot of quiz progress, exported so an interrupted run can be resumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub streak: usize,
    #[serde(default)]
    pub max_streak: usize,
    #[serde(default)]
    pub correct_answers: usize,
    #[serde(default)]
    pub questions_answered: usize,
}

/// Versioned export envelope. Optional sections carry enough context to
/// regenerate or resume the quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizExport {
    pub schema_version: String,
    pub created_at: String,
    pub metadata: QuizMetadata,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<NotebookAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_settings: Option<QuestionPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
}

/// Serialize the quiz with a stable schema. `created_at` comes from the
/// caller so identical inputs serialize identically.
pub fn create_json_export(
    questions: &[Question],
    metadata: QuizMetadata,
    created_at: String,
    analysis_result: Option<&NotebookAnalysis>,
    quiz_settings: Option<QuestionPlan>,
    game_state: Option<GameState>,
) -> Result<String, ExportError> {
    let mut metadata = metadata;
    metadata.schema_version = QUIZ_SCHEMA_VERSION.to_string();

    let export = QuizExport {
        schema_version: QUIZ_SCHEMA_VERSION.to_string(),
        created_at,
        metadata,
        questions: questions.to_vec(),
        analysis_result: analysis_result.cloned(),
        quiz_settings,
        game_state,
    };

    serde_json::to_string_pretty(&export).map_err(|e| ExportError::Json(e.to_string()))
}

/// Permissive mirror of the question schema for imports: older exports may
/// omit fields that the current format requires.
#[derive(Debug, Deserialize)]
struct ImportedQuestion {
    #[serde(default)]
    question_text: String,
    #[serde(default)]
    question_type: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default = "default_index")]
    correct_answer_index: i32,
    #[serde(default)]
    correct_answer: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    misconception_tag: String,
}

fn default_index() -> i32 {
    -1
}

fn normalize_imported(raw: Vec<ImportedQuestion>) -> Vec<Question> {
    raw.into_iter()
        .filter(|q| !q.question_text.is_empty())
        .map(|q| Question {
            prompt: q.question_text,
            kind: match q.question_type.to_lowercase().replace(' ', "_").as_str() {
                "true_false" => QuestionKind::TrueFalse,
                "short_answer" => QuestionKind::ShortAnswer,
                _ => QuestionKind::MultipleChoice,
            },
            options: q.options,
            correct_index: q.correct_answer_index,
            correct_answer: q.correct_answer,
            explanation: q.explanation,
            misconception_tag: q.misconception_tag,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ImportEnvelope {
    #[serde(default)]
    schema_version: Option<String>,
    // v1.0 exports used "version" at the root
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    metadata: QuizMetadata,
    questions: Vec<ImportedQuestion>,
    #[serde(default)]
    analysis_result: Option<NotebookAnalysis>,
    #[serde(default)]
    quiz_settings: Option<QuestionPlan>,
    #[serde(default)]
    game_state: Option<GameState>,
}

/// Load a quiz from JSON, accepting a bare question array as well as the
/// v1.0 and v2.0 envelopes.
pub fn import_from_json(json_string: &str) -> Result<QuizExport, ExportError> {
    let value: serde_json::Value =
        serde_json::from_str(json_string).map_err(|e| ExportError::Json(e.to_string()))?;

    if value.is_array() {
        let raw: Vec<ImportedQuestion> =
            serde_json::from_value(value).map_err(|e| ExportError::Json(e.to_string()))?;
        return Ok(QuizExport {
            schema_version: String::new(),
            created_at: String::new(),
            metadata: QuizMetadata::default(),
            questions: normalize_imported(raw),
            analysis_result: None,
            quiz_settings: None,
            game_state: None,
        });
    }

    if !value.is_object() {
        return Err(ExportError::Json(
            "expected object or array".to_string(),
        ));
    }

    if value.get("questions").is_none() {
        return Err(ExportError::Json("missing 'questions' field".to_string()));
    }

    let envelope: ImportEnvelope =
        serde_json::from_value(value).map_err(|e| ExportError::Json(e.to_string()))?;

    let schema_version = envelope
        .schema_version
        .or(envelope.version)
        .unwrap_or_default();
    let mut metadata = envelope.metadata;
    if metadata.schema_version.is_empty() {
        metadata.schema_version = schema_version.clone();
    }

    Ok(QuizExport {
        schema_version,
        created_at: envelope.created_at,
        metadata,
        questions: normalize_imported(envelope.questions),
        analysis_result: envelope.analysis_result,
        quiz_settings: envelope.quiz_settings,
        game_state: envelope.game_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn metadata() -> QuizMetadata {
        QuizMetadata {
            title: "Addition Quiz".to_string(),
            subject: "Math".to_string(),
            grade: "2".to_string(),
            language: "English".to_string(),
            schema_version: String::new(),
        }
    }

    #[test]
    fn test_export_stamps_schema_version() {
        let json = create_json_export(
            &[question()],
            metadata(),
            "2026-08-26T00:00:00".to_string(),
            None,
            None,
            None,
        )
        .unwrap();

        assert!(json.contains("\"schema_version\": \"2.0\""));
        assert!(json.contains("\"question_text\": \"What is 2 + 2?\""));
        // optional sections are omitted entirely when absent
        assert!(!json.contains("analysis_result"));
        assert!(!json.contains("game_state"));
    }

    #[test]
    fn test_export_is_deterministic() {
        let make = || {
            create_json_export(
                &[question()],
                metadata(),
                "2026-08-26T00:00:00".to_string(),
                None,
                Some(QuestionPlan::default()),
                None,
            )
            .unwrap()
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn test_round_trip_preserves_questions_and_state() {
        let game_state = GameState {
            current_index: 1,
            score: 21,
            streak: 2,
            max_streak: 2,
            correct_answers: 2,
            questions_answered: 2,
        };
        let json = create_json_export(
            &[question()],
            metadata(),
            "2026-08-26T00:00:00".to_string(),
            None,
            Some(QuestionPlan::default()),
            Some(game_state.clone()),
        )
        .unwrap();

        let imported = import_from_json(&json).unwrap();
        assert_eq!(imported.schema_version, "2.0");
        assert_eq!(imported.questions, vec![question()]);
        assert_eq!(imported.game_state, Some(game_state));
        assert_eq!(imported.quiz_settings, Some(QuestionPlan::default()));
    }

    #[test]
    fn test_import_accepts_bare_array() {
        let json = r#"[{
            "question_text": "What is 2 + 2?",
            "question_type": "multiple_choice",
            "options": ["3", "4", "5", "22"],
            "correct_answer_index": 1,
            "correct_answer": "4"
        }]"#;
        let imported = import_from_json(json).unwrap();
        assert_eq!(imported.questions.len(), 1);
        assert_eq!(imported.metadata, QuizMetadata::default());
    }

    #[test]
    fn test_import_handles_v1_envelope_and_omitted_fields() {
        let json = r#"{
            "version": "1.0",
            "questions": [
                {"question_text": "True or false: water is wet.", "correct_answer": "True"},
                {"question_text": ""}
            ]
        }"#;
        let imported = import_from_json(json).unwrap();
        assert_eq!(imported.schema_version, "1.0");
        assert_eq!(imported.metadata.schema_version, "1.0");
        assert_eq!(imported.questions.len(), 1);
        assert_eq!(imported.questions[0].kind, QuestionKind::MultipleChoice);
        assert_eq!(imported.questions[0].correct_index, -1);
    }

    #[test]
    fn test_import_rejects_bad_shapes() {
        assert!(import_from_json("not json").is_err());
        assert!(import_from_json("42").is_err());
        assert!(import_from_json("{\"metadata\": {}}").is_err());
    }
}
