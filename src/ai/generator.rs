use crate::ai::client::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, ModelConfig, OpenRouterClient};
use crate::logger;
use crate::models::{NotebookAnalysis, Question, QuestionKind, QuestionPlan};
use crate::utils::truncate_string;
use serde::Deserialize;

/// Strip markdown code fences and surrounding chatter from a model reply,
/// keeping the outermost JSON payload delimited by `open`/`close`.
pub(crate) fn clean_json_payload(response: &str, open: char, close: char) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find(open)
        && let Some(end) = cleaned.rfind(close)
        && end > start
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

fn vocabulary_guidance(grade: &str) -> &'static str {
    let grade_num: i32 = grade.trim().replace('K', "0").parse().unwrap_or(5);

    if grade_num <= 2 {
        "VOCABULARY LEVEL: Very Simple
- Use short, common words (1-2 syllables)
- Avoid complex sentence structures
- Use concrete, familiar concepts
- Questions should be 1-2 sentences maximum"
    } else if grade_num <= 4 {
        "VOCABULARY LEVEL: Elementary
- Use simple but varied vocabulary
- Introduce grade-appropriate terms
- Keep sentences clear and direct
- Avoid idioms and figurative language"
    } else if grade_num <= 6 {
        "VOCABULARY LEVEL: Intermediate
- Use grade-level vocabulary
- Include some academic language
- Sentences can be more complex
- Context clues for new terms are helpful"
    } else if grade_num <= 8 {
        "VOCABULARY LEVEL: Middle School
- Use academic vocabulary appropriate for subject
- More complex sentence structures are acceptable
- Include subject-specific terminology
- Critical thinking questions are encouraged"
    } else {
        "VOCABULARY LEVEL: High School
- Use sophisticated academic vocabulary
- Complex reasoning and analysis questions
- Subject-specific terminology expected
- Higher-order thinking skills assessed"
    }
}

fn build_system_prompt(analysis: &NotebookAnalysis, plan: &QuestionPlan) -> String {
    let lang_instruction = if analysis.language.to_lowercase() == "spanish" {
        "\nIMPORTANT: Generate ALL content in Spanish, including:
- Questions
- Answer options
- Explanations
- True/False as \"Verdadero/Falso\"

Use appropriate Spanish educational terminology."
    } else {
        ""
    };

    format!(
        r#"You are an expert educational content creator specializing in K-12 curriculum.
Your task is to generate high-quality quiz questions that:
1. Are age-appropriate for Grade {grade} students
2. Test understanding of the core concept: "{concept}"
3. Use vocabulary suitable for the grade level
4. Include common student misconceptions as distractors (NOT random wrong answers)
5. Provide clear, educational explanations

{vocabulary}

SUBJECT AREA: {subject}
{lang_instruction}

PEDAGOGICAL GUIDELINES FOR DISTRACTORS:
- Multiple Choice: Each wrong answer should represent a REAL misconception students commonly have
- For Math: Use computational errors students typically make (wrong operation, place value errors, etc.)
- For Science: Use common misunderstandings about natural phenomena
- For Language Arts: Use grammar mistakes students frequently make
- NEVER use obviously wrong or silly answers

QUESTION DISTRIBUTION:
- Multiple Choice: {mc} questions (4 options each, labeled A-D)
- True/False: {tf} questions
- Short Answer: {sa} questions (answer should be 1-3 words)

OUTPUT FORMAT - Respond ONLY with a valid JSON array:
[
    {{
        "question_text": "What is the result of 24 / 6?",
        "question_type": "multiple_choice",
        "options": ["4", "6", "18", "30"],
        "correct_answer_index": 0,
        "correct_answer": "4",
        "explanation": "24 / 6 = 4 because 6 x 4 = 24",
        "misconception_tag": "Confusing division with subtraction or addition"
    }},
    {{
        "question_text": "The sum of 15 + 8 equals 22.",
        "question_type": "true_false",
        "options": ["True", "False"],
        "correct_answer_index": 1,
        "correct_answer": "False",
        "explanation": "15 + 8 = 23, not 22. Count carefully!",
        "misconception_tag": "Careless addition errors"
    }},
    {{
        "question_text": "In division, the number being divided is called the _____.",
        "question_type": "short_answer",
        "options": [],
        "correct_answer_index": -1,
        "correct_answer": "dividend",
        "explanation": "In a division problem like 24 / 6, the dividend (24) is the number being divided.",
        "misconception_tag": "Confusing dividend and divisor"
    }}
]

CRITICAL REQUIREMENTS:
1. Generate EXACTLY the number of questions requested for each type
2. Each question must have a unique misconception_tag
3. Explanations should be educational and encouraging
4. Short answer correct_answer should be 1-3 words maximum
5. All content must directly relate to the provided source text"#,
        grade = analysis.grade_level,
        concept = analysis.core_concept,
        vocabulary = vocabulary_guidance(&analysis.grade_level),
        subject = analysis.subject,
        lang_instruction = lang_instruction,
        mc = plan.multiple_choice,
        tf = plan.true_false,
        sa = plan.short_answer,
    )
}

fn build_user_prompt(text: &str, plan: &QuestionPlan) -> String {
    format!(
        r#"Based on the following student notes/content, generate a quiz:

---SOURCE CONTENT---
{text}
---END CONTENT---

Generate:
- {mc} multiple choice questions
- {tf} true/false questions
- {sa} short answer questions

Total: {total} questions

Remember: Use real student misconceptions as distractors, not random errors."#,
        text = text,
        mc = plan.multiple_choice,
        tf = plan.true_false,
        sa = plan.short_answer,
        total = plan.total(),
    )
}

/// Loose mirror of the question schema, so that partially-filled entries
/// survive deserialization and can be repaired or rejected individually.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question_text: Option<String>,
    question_type: Option<String>,
    options: Option<Vec<String>>,
    correct_answer_index: Option<i32>,
    correct_answer: Option<String>,
    explanation: Option<String>,
    misconception_tag: Option<String>,
}

/// Normalize one raw question, or reject it when it cannot be repaired.
fn validate_question(raw: RawQuestion) -> Option<Question> {
    let prompt = raw.question_text.filter(|t| !t.trim().is_empty())?;
    let type_name = raw.question_type.filter(|t| !t.trim().is_empty())?;
    let correct_answer = raw.correct_answer.filter(|a| !a.trim().is_empty())?;

    let kind = match type_name.to_lowercase().replace(' ', "_").as_str() {
        "true_false" => QuestionKind::TrueFalse,
        "short_answer" => QuestionKind::ShortAnswer,
        _ => QuestionKind::MultipleChoice,
    };

    let options = match kind {
        QuestionKind::MultipleChoice => {
            let options = raw.options?;
            if options.len() != 4 {
                return None;
            }
            options
        }
        QuestionKind::TrueFalse => match raw.options {
            Some(options) if options.len() >= 2 => options,
            _ => vec!["True".to_string(), "False".to_string()],
        },
        QuestionKind::ShortAnswer => Vec::new(),
    };

    let correct_index = match raw.correct_answer_index {
        Some(index) => index,
        None => match kind {
            QuestionKind::MultipleChoice => {
                options.iter().position(|o| *o == correct_answer)? as i32
            }
            QuestionKind::TrueFalse => {
                if matches!(correct_answer.to_lowercase().as_str(), "true" | "verdadero") {
                    0
                } else {
                    1
                }
            }
            QuestionKind::ShortAnswer => -1,
        },
    };

    let explanation = raw
        .explanation
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "Great job reviewing this concept!".to_string());
    let misconception_tag = raw
        .misconception_tag
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "General concept check".to_string());

    Some(Question {
        prompt,
        kind,
        options,
        correct_index,
        correct_answer,
        explanation,
        misconception_tag,
    })
}

/// Parse the model's reply into validated questions. Individual entries that
/// cannot be repaired are dropped; a reply yielding no usable questions is an
/// error, never a partial quiz.
pub fn parse_questions(response: &str) -> Result<Vec<Question>, String> {
    let cleaned = clean_json_payload(response, '[', ']');

    let raw: Vec<RawQuestion> = serde_json::from_str(&cleaned).map_err(|e| {
        format!(
            "Failed to parse quiz response: {}; response was: {}",
            e,
            truncate_string(&cleaned, 200)
        )
    })?;

    let questions: Vec<Question> = raw.into_iter().filter_map(validate_question).collect();

    if questions.is_empty() {
        return Err("Quiz generation returned no usable questions".to_string());
    }

    Ok(questions)
}

/// Ask the model for a quiz over the analyzed notebook content.
pub async fn generate_questions(
    client: &OpenRouterClient,
    analysis: &NotebookAnalysis,
    plan: &QuestionPlan,
) -> Result<Vec<Question>, Box<dyn std::error::Error + Send + Sync>> {
    if analysis.transcribed_text.trim().is_empty() {
        return Err("Source text is required to generate questions".into());
    }

    logger::log(&format!(
        "Generating quiz: {} questions for {} (grade {})",
        plan.total(),
        analysis.subject,
        analysis.grade_level
    ));

    let system_prompt = build_system_prompt(analysis, plan);
    let user_prompt = build_user_prompt(&analysis.transcribed_text, plan);

    let config = ModelConfig {
        temperature: Some(DEFAULT_TEMPERATURE),
        max_tokens: Some(DEFAULT_MAX_TOKENS),
        ..ModelConfig::default()
    };

    let response = client
        .complete(&system_prompt, &user_prompt, Some(&config))
        .await?;

    logger::log(&format!(
        "Quiz response received ({} bytes)",
        response.len()
    ));

    parse_questions(&response).map_err(|e| e.into())
}
