use chrono::Local;
use crossbeam_channel::unbounded;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use notebook_quiz::export::GameState;
use notebook_quiz::{
    AiRequest, AiResponse, AiStage, AppState, MenuAction, MenuState, NotebookAnalysis, Question,
    QuestionPlan, QuizAction, QuizMetadata, QuizSession, ReviewAction, ReviewState, WorksheetMeta,
    create_docx, create_json_export, create_pdf, draw_analysis, draw_menu, draw_quit_confirmation,
    draw_quiz, draw_review, draw_summary, draw_working, handle_menu_input, handle_quiz_input,
    handle_review_input, logger, safe_filename, save_export, spawn_ai_worker,
};
use rand::seq::SliceRandom;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExportFormat {
    Pdf,
    Docx,
    Json,
}

struct App {
    state: AppState,
    menu: MenuState,
    plan: QuestionPlan,
    analysis: Option<NotebookAnalysis>,
    review: Option<ReviewState>,
    session: Option<QuizSession>,
    working_stage: AiStage,
    generation_error: Option<String>,
    summary_status: Option<String>,
    tick: usize,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::Menu,
            menu: MenuState::new(),
            plan: QuestionPlan::default(),
            analysis: None,
            review: None,
            session: None,
            working_stage: AiStage::Analysis,
            generation_error: None,
            summary_status: None,
            tick: 0,
        }
    }

    fn quiz_title(&self) -> String {
        match &self.analysis {
            Some(analysis) if !analysis.subject.is_empty() && analysis.subject != "General" => {
                format!("{} Quiz", analysis.subject)
            }
            _ => "Practice Quiz".to_string(),
        }
    }

    fn worksheet_meta(&self) -> WorksheetMeta {
        let (subject, grade) = self
            .analysis
            .as_ref()
            .map(|a| (a.subject.clone(), a.grade_level.clone()))
            .unwrap_or_default();
        WorksheetMeta {
            title: self.quiz_title(),
            subject,
            grade,
            generated_on: Local::now().format("%B %d, %Y").to_string(),
        }
    }

    /// Write the current question set to exports/ in the requested format
    /// and return a one-line status for the UI.
    fn export(&self, questions: &[Question], format: ExportFormat) -> String {
        let meta = self.worksheet_meta();
        let date_stamp = Local::now().format("%Y%m%d").to_string();

        let result = match format {
            ExportFormat::Pdf => create_pdf(questions, &meta, true).and_then(|bytes| {
                let filename = safe_filename(&meta.title, &date_stamp, "pdf");
                save_export(&filename, &bytes).map_err(Into::into)
            }),
            ExportFormat::Docx => create_docx(questions, &meta, true).and_then(|bytes| {
                let filename = safe_filename(&meta.title, &date_stamp, "docx");
                save_export(&filename, &bytes).map_err(Into::into)
            }),
            ExportFormat::Json => {
                let metadata = QuizMetadata {
                    title: meta.title.clone(),
                    subject: meta.subject.clone(),
                    grade: meta.grade.clone(),
                    language: self
                        .analysis
                        .as_ref()
                        .map(|a| a.language.clone())
                        .unwrap_or_default(),
                    schema_version: String::new(),
                };
                let game_state = self.session.as_ref().map(|s| GameState {
                    current_index: s.current_index,
                    score: s.score,
                    streak: s.streak,
                    max_streak: s.max_streak,
                    correct_answers: s.correct_answers,
                    questions_answered: s.questions_answered,
                });
                create_json_export(
                    questions,
                    metadata,
                    Local::now().to_rfc3339(),
                    self.analysis.as_ref(),
                    Some(self.plan),
                    game_state,
                )
                .and_then(|json| {
                    let filename = safe_filename(&meta.title, &date_stamp, "json");
                    save_export(&filename, json.as_bytes()).map_err(Into::into)
                })
            }
        };

        match result {
            Ok(path) => {
                logger::log(&format!("Exported {}", path.display()));
                format!("Saved {}", path.display())
            }
            Err(e) => {
                logger::error(&format!("Export failed: {}", e));
                format!("Export failed: {}", e)
            }
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn main() -> io::Result<()> {
    logger::init();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (request_tx, request_rx) = unbounded::<AiRequest>();
    let (response_tx, response_rx) = unbounded::<AiResponse>();
    let _worker = spawn_ai_worker(response_tx, request_rx);

    let mut app = App::new();

    loop {
        terminal.draw(|f| match app.state {
            AppState::Menu => draw_menu(f, &app.menu),
            AppState::Working => draw_working(f, app.working_stage, app.tick),
            AppState::Analysis => {
                if let Some(analysis) = &app.analysis {
                    draw_analysis(f, analysis, &app.plan, app.generation_error.as_deref());
                }
            }
            AppState::Review => {
                if let Some(review) = &app.review {
                    draw_review(f, review);
                }
            }
            AppState::Quiz => {
                if let Some(session) = &app.session {
                    draw_quiz(f, session);
                }
            }
            AppState::QuizQuitConfirm => draw_quit_confirmation(f),
            AppState::Summary => {
                if let Some(session) = &app.session {
                    draw_summary(f, session, app.summary_status.as_deref());
                }
            }
        })?;

        while let Ok(response) = response_rx.try_recv() {
            match response {
                AiResponse::Analysis(analysis) => {
                    app.analysis = Some(analysis);
                    app.generation_error = None;
                    app.state = AppState::Analysis;
                }
                AiResponse::Questions(questions) => {
                    app.review = Some(ReviewState::new(questions));
                    app.state = AppState::Review;
                }
                AiResponse::Error { stage, error } => {
                    logger::error(&format!("AI error: {}", error));
                    match stage {
                        AiStage::Analysis => {
                            app.menu.status = Some(error);
                            app.state = AppState::Menu;
                        }
                        AiStage::Generation => {
                            app.generation_error = Some(error);
                            app.state = AppState::Analysis;
                        }
                    }
                }
            }
        }

        if app.state == AppState::Working {
            app.tick = app.tick.wrapping_add(1);
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if is_ctrl_c(&key) {
            break;
        }

        match app.state {
            AppState::Menu => match handle_menu_input(key, &mut app.menu) {
                MenuAction::Analyze => {
                    app.plan = app.menu.plan();
                    let request = AiRequest::Analyze {
                        image_paths: app.menu.selected_paths(),
                        language_hint: app.menu.language_hint,
                    };
                    if request_tx.send(request).is_ok() {
                        app.working_stage = AiStage::Analysis;
                        app.state = AppState::Working;
                    }
                }
                MenuAction::Quit => break,
                MenuAction::None => {}
            },
            AppState::Working => {}
            AppState::Analysis => match key.code {
                KeyCode::Char('g') => {
                    if let Some(analysis) = &app.analysis {
                        let request = AiRequest::Generate {
                            analysis: analysis.clone(),
                            plan: app.plan,
                        };
                        if request_tx.send(request).is_ok() {
                            app.working_stage = AiStage::Generation;
                            app.generation_error = None;
                            app.state = AppState::Working;
                        }
                    }
                }
                KeyCode::Char('m') | KeyCode::Esc => {
                    app.state = AppState::Menu;
                }
                _ => {}
            },
            AppState::Review => {
                let action = if let Some(review) = &mut app.review {
                    handle_review_input(key, review)
                } else {
                    ReviewAction::None
                };
                match action {
                    ReviewAction::StartQuiz => {
                        if let Some(review) = &app.review {
                            app.session = Some(QuizSession::new(
                                review.questions.clone(),
                                app.quiz_title(),
                            ));
                            app.state = AppState::Quiz;
                        }
                    }
                    ReviewAction::ExportPdf | ReviewAction::ExportDocx | ReviewAction::ExportJson => {
                        let format = match action {
                            ReviewAction::ExportPdf => ExportFormat::Pdf,
                            ReviewAction::ExportDocx => ExportFormat::Docx,
                            _ => ExportFormat::Json,
                        };
                        let questions = app
                            .review
                            .as_ref()
                            .map(|r| r.questions.clone())
                            .unwrap_or_default();
                        let status = app.export(&questions, format);
                        if let Some(review) = &mut app.review {
                            review.status = Some(status);
                        }
                    }
                    ReviewAction::BackToMenu => {
                        app.state = AppState::Menu;
                    }
                    ReviewAction::None => {}
                }
            }
            AppState::Quiz => {
                if let Some(session) = &mut app.session {
                    match handle_quiz_input(key, session) {
                        QuizAction::Finished => {
                            app.summary_status = None;
                            app.state = AppState::Summary;
                        }
                        QuizAction::RequestQuit => {
                            app.state = AppState::QuizQuitConfirm;
                        }
                        QuizAction::None => {}
                    }
                }
            }
            AppState::QuizQuitConfirm => match key.code {
                KeyCode::Char('y') => {
                    app.session = None;
                    app.state = AppState::Review;
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    app.state = AppState::Quiz;
                }
                _ => {}
            },
            AppState::Summary => match key.code {
                KeyCode::Char('r') => {
                    let mut questions = app
                        .review
                        .as_ref()
                        .map(|r| r.questions.clone())
                        .unwrap_or_default();
                    if !questions.is_empty() {
                        questions.shuffle(&mut rand::thread_rng());
                        app.session = Some(QuizSession::new(questions, app.quiz_title()));
                        app.state = AppState::Quiz;
                    }
                }
                KeyCode::Char('v') => {
                    app.session = None;
                    app.state = AppState::Review;
                }
                KeyCode::Char('m') => {
                    app.session = None;
                    app.state = AppState::Menu;
                }
                KeyCode::Char('p') => {
                    let questions = questions_for_export(&app);
                    app.summary_status = Some(app.export(&questions, ExportFormat::Pdf));
                }
                KeyCode::Char('w') => {
                    let questions = questions_for_export(&app);
                    app.summary_status = Some(app.export(&questions, ExportFormat::Docx));
                }
                KeyCode::Char('x') => {
                    let questions = questions_for_export(&app);
                    app.summary_status = Some(app.export(&questions, ExportFormat::Json));
                }
                _ => {}
            },
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn questions_for_export(app: &App) -> Vec<Question> {
    app.session
        .as_ref()
        .map(|s| s.questions.clone())
        .or_else(|| app.review.as_ref().map(|r| r.questions.clone()))
        .unwrap_or_default()
}
