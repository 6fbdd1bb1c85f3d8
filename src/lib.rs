pub mod ai;
pub mod ai_worker;
pub mod export;
pub mod files;
pub mod logger;
pub mod menu;
pub mod models;
pub mod quiz;
pub mod review;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use ai::{
    AiError, DEFAULT_QUIZ_MODEL, DEFAULT_VISION_MODEL, ModelConfig, OpenRouterClient,
    VisionClient, generate_questions, merge_analyses, parse_questions,
};
pub use ai_worker::spawn_ai_worker;
pub use export::{
    ExportError, QUIZ_SCHEMA_VERSION, QuizExport, QuizMetadata, WorksheetMeta, build_worksheet,
    create_docx, create_json_export, create_pdf, import_from_json,
};
pub use files::{get_image_files, save_export};
pub use menu::{MenuAction, MenuState, handle_menu_input};
pub use models::{
    AiRequest, AiResponse, AiStage, AppState, LanguageHint, NotebookAnalysis, Question,
    QuestionKind, QuestionPlan,
};
pub use quiz::{QuizAction, QuizSession, final_grade, handle_quiz_input};
pub use review::{ReviewAction, ReviewState, handle_review_input};
pub use ui::{
    draw_analysis, draw_menu, draw_quit_confirmation, draw_quiz, draw_review, draw_summary,
    draw_working,
};
pub use utils::{calculate_wrapped_cursor_position, safe_filename};
