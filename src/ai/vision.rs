use crate::ai::AiError;
use crate::ai::generator::clean_json_payload;
use crate::files;
use crate::logger;
use crate::models::{LanguageHint, NotebookAnalysis};
use crate::utils::truncate_string;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_VISION_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const VISION_MAX_TOKENS: u32 = 2000;
const VISION_TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = r#"You are an expert pedagogue and educational content analyst.
Your task is to analyze handwritten student notebook pages with precision and educational insight.

When analyzing the image:
1. TRANSCRIBE all visible handwritten text exactly as written (preserve any errors or unique spellings)
2. IDENTIFY the academic subject (Math, Science, English/Language Arts, Social Studies, Art, Music, etc.)
3. ESTIMATE the grade level (1-12) based on content complexity, vocabulary, and concepts
4. EXTRACT the core learning concept being studied
5. DETECT the language (English or Spanish)
6. IDENTIFY key terms or vocabulary that are central to the content
7. Note any diagrams, formulas, or visual elements present

Respond ONLY with valid JSON in this exact format:
{
    "transcribed_text": "Full transcription of all text...",
    "subject": "Math",
    "detected_grade_level": "5",
    "core_concept": "Long Division with Remainders",
    "language": "English",
    "confidence": 0.85,
    "key_terms": ["dividend", "divisor", "quotient", "remainder"],
    "visual_elements": ["division bracket diagram", "worked examples"],
    "content_summary": "Brief 1-2 sentence summary of what the student is learning"
}

Important guidelines:
- Be accurate but not overly critical of handwriting variations
- Identify the MAIN subject even if multiple topics appear
- Grade level should reflect the complexity of the CONTENT, not handwriting quality
- Include ALL readable text in transcription
- If uncertain about any field, provide best estimate with lower confidence score
- Key terms should be actual vocabulary from the notes, not generic terms"#;

/// Vision-capable chat client talking to the OpenRouter completions endpoint
/// directly, since image parts need the raw multimodal message body.
#[derive(Debug)]
pub struct VisionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageBody,
}

#[derive(Debug, Deserialize)]
struct ChatMessageBody {
    content: String,
}

impl VisionClient {
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| AiError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: std::env::var("NOTEBOOK_QUIZ_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: std::env::var("NOTEBOOK_QUIZ_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
        })
    }

    /// Transcribe and classify a single notebook page.
    pub async fn analyze_page(
        &self,
        path: &Path,
        hint: LanguageHint,
    ) -> Result<NotebookAnalysis, AiError> {
        let data_uri = files::encode_image_data_uri(path)?;
        let system_prompt = format!("{}{}", SYSTEM_PROMPT, language_instruction(hint));

        let body = json!({
            "model": self.model,
            "max_tokens": VISION_MAX_TOKENS,
            "temperature": VISION_TEMPERATURE,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt,
                },
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": "Please analyze this student notebook page and provide the structured analysis.",
                        },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": data_uri,
                                "detail": "high",
                            },
                        },
                    ],
                },
            ],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::Transport(format!(
                "HTTP {}: {}",
                status,
                truncate_string(&text, 200)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(format!("invalid completion envelope: {}", e)))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| AiError::Parse("no response choices received".to_string()))?;

        parse_analysis(&content)
    }

    /// Analyze every selected page and merge the results into one combined
    /// analysis. Pages that fail are logged and skipped; if nothing succeeds
    /// the last error is returned.
    pub async fn analyze_pages(
        &self,
        paths: &[PathBuf],
        hint: LanguageHint,
    ) -> Result<NotebookAnalysis, AiError> {
        if paths.is_empty() {
            return Err(AiError::Parse("at least one image is required".to_string()));
        }

        let mut parts = Vec::new();
        let mut last_error = None;

        for path in paths {
            match self.analyze_page(path, hint).await {
                Ok(analysis) => parts.push(analysis),
                Err(e) => {
                    logger::error(&format!("Failed to analyze {}: {}", path.display(), e));
                    last_error = Some(e);
                }
            }
        }

        match (parts.is_empty(), last_error) {
            (true, Some(e)) => Err(e),
            (true, None) => Err(AiError::Parse("no pages analyzed".to_string())),
            (false, _) => Ok(merge_analyses(parts)),
        }
    }
}

fn language_instruction(hint: LanguageHint) -> &'static str {
    match hint {
        LanguageHint::Spanish => {
            "\n\nNote: The content is expected to be in Spanish. Transcribe in the original language."
        }
        LanguageHint::English => "\n\nNote: The content is expected to be in English.",
        LanguageHint::Auto => "",
    }
}

pub(crate) fn parse_analysis(content: &str) -> Result<NotebookAnalysis, AiError> {
    let cleaned = clean_json_payload(content, '{', '}');
    serde_json::from_str(&cleaned).map_err(|e| {
        AiError::Parse(format!(
            "JSON parsing failed: {}; response was: {}",
            e,
            truncate_string(&cleaned, 200)
        ))
    })
}

/// Combine per-page analyses into a single result: transcriptions joined
/// with a page separator, most common subject, averaged grade level and
/// confidence, unioned key terms.
pub fn merge_analyses(parts: Vec<NotebookAnalysis>) -> NotebookAnalysis {
    let image_count = parts.len();

    let transcribed_text = parts
        .iter()
        .map(|p| p.transcribed_text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let mut subject_counts: HashMap<&str, usize> = HashMap::new();
    for part in &parts {
        if !part.subject.is_empty() && part.subject != "Unknown" {
            *subject_counts.entry(part.subject.as_str()).or_insert(0) += 1;
        }
    }
    let subject = subject_counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(subject, _)| subject.to_string())
        .unwrap_or_else(|| "General".to_string());

    let grades: Vec<i32> = parts.iter().map(|p| parse_grade(&p.grade_level)).collect();
    let grade_level = if grades.is_empty() {
        "5".to_string()
    } else {
        ((grades.iter().sum::<i32>() as f32 / grades.len() as f32).round() as i32).to_string()
    };

    let language = parts
        .iter()
        .map(|p| p.language.as_str())
        .find(|l| !l.is_empty() && *l != "Unknown")
        .map(str::to_string)
        .unwrap_or_else(|| detect_language(&transcribed_text).to_string());

    let mut core_concepts: Vec<&str> = Vec::new();
    for part in &parts {
        if !part.core_concept.is_empty() && !core_concepts.contains(&part.core_concept.as_str()) {
            core_concepts.push(part.core_concept.as_str());
        }
    }
    let core_concept = if core_concepts.is_empty() {
        "Multiple concepts".to_string()
    } else {
        core_concepts.join("; ")
    };

    let confidence = if parts.is_empty() {
        0.0
    } else {
        parts.iter().map(|p| p.confidence).sum::<f32>() / parts.len() as f32
    };

    let mut key_terms: Vec<String> = Vec::new();
    let mut visual_elements: Vec<String> = Vec::new();
    for part in &parts {
        for term in &part.key_terms {
            if !key_terms.contains(term) {
                key_terms.push(term.clone());
            }
        }
        for element in &part.visual_elements {
            if !visual_elements.contains(element) {
                visual_elements.push(element.clone());
            }
        }
    }

    let content_summary = parts
        .iter()
        .map(|p| p.content_summary.as_str())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string();

    NotebookAnalysis {
        transcribed_text,
        subject,
        grade_level,
        core_concept,
        language,
        confidence,
        key_terms,
        visual_elements,
        content_summary,
        image_count,
    }
}

fn parse_grade(grade: &str) -> i32 {
    grade
        .trim()
        .trim_end_matches("th")
        .trim_end_matches("st")
        .trim_end_matches("nd")
        .trim_end_matches("rd")
        .parse()
        .unwrap_or(5)
}

/// Word-list fallback used when no page reported a language.
pub fn detect_language(text: &str) -> &'static str {
    const SPANISH_INDICATORS: &[&str] = &[
        "que", "de", "el", "la", "los", "las", "es", "en", "un", "una", "por", "con", "para",
        "como", "pero", "si", "su", "al", "del", "son", "esta", "esto", "ese", "eso", "muy",
        "bien", "todo", "puede", "tiene", "hace", "cuando", "donde", "porque", "hay",
    ];
    const ENGLISH_INDICATORS: &[&str] = &[
        "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can",
        "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by",
        "from", "or", "an", "not",
    ];

    let lowered = text.to_lowercase();
    let words: std::collections::HashSet<&str> = lowered.split_whitespace().collect();

    let spanish_count = SPANISH_INDICATORS.iter().filter(|w| words.contains(**w)).count();
    let english_count = ENGLISH_INDICATORS.iter().filter(|w| words.contains(**w)).count();

    if spanish_count > english_count {
        "Spanish"
    } else {
        "English"
    }
}
