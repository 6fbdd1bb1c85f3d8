use crate::models::{Question, QuestionKind};
use crossterm::event::{KeyCode, KeyEvent};

/// Fields a question exposes on the review screen, in edit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Prompt,
    Option(usize),
    CorrectAnswer,
    Explanation,
    MisconceptionTag,
}

impl EditField {
    pub fn label(&self) -> String {
        match self {
            EditField::Prompt => "Question".to_string(),
            EditField::Option(i) => format!("Option {}", (b'A' + *i as u8) as char),
            EditField::CorrectAnswer => "Correct answer".to_string(),
            EditField::Explanation => "Explanation".to_string(),
            EditField::MisconceptionTag => "Misconception".to_string(),
        }
    }
}

pub fn editable_fields(kind: QuestionKind) -> Vec<EditField> {
    match kind {
        QuestionKind::MultipleChoice => vec![
            EditField::Prompt,
            EditField::Option(0),
            EditField::Option(1),
            EditField::Option(2),
            EditField::Option(3),
            EditField::CorrectAnswer,
            EditField::Explanation,
            EditField::MisconceptionTag,
        ],
        QuestionKind::TrueFalse | QuestionKind::ShortAnswer => vec![
            EditField::Prompt,
            EditField::CorrectAnswer,
            EditField::Explanation,
            EditField::MisconceptionTag,
        ],
    }
}

/// Re-derive the option index after an edit changed the answer or options.
pub fn derive_correct_index(kind: QuestionKind, options: &[String], correct_answer: &str) -> i32 {
    match kind {
        QuestionKind::MultipleChoice => options
            .iter()
            .position(|o| o == correct_answer)
            .map(|i| i as i32)
            .unwrap_or(-1),
        QuestionKind::TrueFalse => {
            if matches!(correct_answer.to_lowercase().as_str(), "true" | "verdadero") {
                0
            } else {
                1
            }
        }
        QuestionKind::ShortAnswer => -1,
    }
}

#[derive(Debug)]
pub struct EditSession {
    pub field_index: usize,
    pub buffer: String,
    pub cursor_position: usize,
}

#[derive(Debug, PartialEq)]
pub enum ReviewAction {
    None,
    StartQuiz,
    ExportPdf,
    ExportDocx,
    ExportJson,
    BackToMenu,
}

#[derive(Debug)]
pub struct ReviewState {
    pub questions: Vec<Question>,
    pub cursor: usize,
    pub editing: Option<EditSession>,
    pub status: Option<String>,
}

impl ReviewState {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: 0,
            editing: None,
            status: None,
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    pub fn current_fields(&self) -> Vec<EditField> {
        self.current()
            .map(|q| editable_fields(q.kind))
            .unwrap_or_default()
    }

    fn field_value(&self, field: EditField) -> String {
        let Some(question) = self.current() else {
            return String::new();
        };
        match field {
            EditField::Prompt => question.prompt.clone(),
            EditField::Option(i) => question.options.get(i).cloned().unwrap_or_default(),
            EditField::CorrectAnswer => question.correct_answer.clone(),
            EditField::Explanation => question.explanation.clone(),
            EditField::MisconceptionTag => question.misconception_tag.clone(),
        }
    }

    fn begin_edit(&mut self) {
        if self.current().is_none() {
            return;
        }
        let buffer = self.field_value(EditField::Prompt);
        self.editing = Some(EditSession {
            field_index: 0,
            buffer: buffer.clone(),
            cursor_position: buffer.len(),
        });
    }

    /// Write the edit buffer back into the selected field and keep the
    /// correct-answer index consistent with the new text.
    fn commit_field(&mut self) {
        let Some((field_index, value)) = self
            .editing
            .as_ref()
            .map(|e| (e.field_index, e.buffer.clone()))
        else {
            return;
        };
        let fields = self.current_fields();
        let Some(field) = fields.get(field_index).copied() else {
            return;
        };
        let Some(question) = self.questions.get_mut(self.cursor) else {
            return;
        };

        match field {
            EditField::Prompt => question.prompt = value,
            EditField::Option(i) => {
                if let Some(option) = question.options.get_mut(i) {
                    *option = value;
                }
            }
            EditField::CorrectAnswer => question.correct_answer = value,
            EditField::Explanation => question.explanation = value,
            EditField::MisconceptionTag => question.misconception_tag = value,
        }

        question.correct_index =
            derive_correct_index(question.kind, &question.options, &question.correct_answer);
    }

    fn select_field(&mut self, field_index: usize) {
        let fields = self.current_fields();
        if fields.is_empty() {
            return;
        }
        let field_index = field_index % fields.len();
        let buffer = self.field_value(fields[field_index]);
        self.editing = Some(EditSession {
            field_index,
            buffer: buffer.clone(),
            cursor_position: buffer.len(),
        });
    }

    fn add_question(&mut self) {
        let insert_at = if self.questions.is_empty() {
            0
        } else {
            self.cursor + 1
        };
        self.questions.insert(insert_at, Question::blank());
        self.cursor = insert_at;
        self.status = Some("Added blank question".to_string());
    }

    fn delete_question(&mut self) {
        if self.questions.is_empty() {
            return;
        }
        self.questions.remove(self.cursor);
        if self.cursor >= self.questions.len() && self.cursor > 0 {
            self.cursor -= 1;
        }
        self.status = Some("Question deleted".to_string());
    }

    fn move_question(&mut self, down: bool) {
        if down && self.cursor + 1 < self.questions.len() {
            self.questions.swap(self.cursor, self.cursor + 1);
            self.cursor += 1;
        } else if !down && self.cursor > 0 {
            self.questions.swap(self.cursor, self.cursor - 1);
            self.cursor -= 1;
        }
    }

    fn cycle_kind(&mut self) {
        let Some(question) = self.questions.get_mut(self.cursor) else {
            return;
        };
        question.kind = match question.kind {
            QuestionKind::MultipleChoice => QuestionKind::TrueFalse,
            QuestionKind::TrueFalse => QuestionKind::ShortAnswer,
            QuestionKind::ShortAnswer => QuestionKind::MultipleChoice,
        };
        question.options = match question.kind {
            QuestionKind::MultipleChoice => {
                vec![String::new(), String::new(), String::new(), String::new()]
            }
            QuestionKind::TrueFalse => vec!["True".to_string(), "False".to_string()],
            QuestionKind::ShortAnswer => vec![],
        };
        question.correct_index =
            derive_correct_index(question.kind, &question.options, &question.correct_answer);
    }
}

pub fn handle_review_input(key: KeyEvent, state: &mut ReviewState) -> ReviewAction {
    if state.editing.is_some() {
        match key.code {
            KeyCode::Esc => {
                state.editing = None;
            }
            KeyCode::Enter => {
                state.commit_field();
                state.editing = None;
                state.status = Some("Question updated".to_string());
            }
            KeyCode::Tab => {
                state.commit_field();
                let next = state.editing.as_ref().map(|e| e.field_index + 1).unwrap_or(0);
                state.select_field(next);
            }
            KeyCode::BackTab => {
                state.commit_field();
                let fields = state.current_fields();
                let current = state.editing.as_ref().map(|e| e.field_index).unwrap_or(0);
                let prev = if current == 0 {
                    fields.len().saturating_sub(1)
                } else {
                    current - 1
                };
                state.select_field(prev);
            }
            _ => {
                if let Some(editing) = &mut state.editing {
                    match key.code {
                        KeyCode::Char(c) => {
                            editing.buffer.insert(editing.cursor_position, c);
                            editing.cursor_position += c.len_utf8();
                        }
                        KeyCode::Backspace => {
                            if editing.cursor_position > 0 {
                                let prev = editing.buffer[..editing.cursor_position]
                                    .chars()
                                    .next_back()
                                    .map(|c| c.len_utf8())
                                    .unwrap_or(0);
                                editing.cursor_position -= prev;
                                editing.buffer.remove(editing.cursor_position);
                            }
                        }
                        KeyCode::Delete => {
                            if editing.cursor_position < editing.buffer.len() {
                                editing.buffer.remove(editing.cursor_position);
                            }
                        }
                        KeyCode::Left => {
                            if editing.cursor_position > 0 {
                                let prev = editing.buffer[..editing.cursor_position]
                                    .chars()
                                    .next_back()
                                    .map(|c| c.len_utf8())
                                    .unwrap_or(0);
                                editing.cursor_position -= prev;
                            }
                        }
                        KeyCode::Right => {
                            if editing.cursor_position < editing.buffer.len() {
                                let next = editing.buffer[editing.cursor_position..]
                                    .chars()
                                    .next()
                                    .map(|c| c.len_utf8())
                                    .unwrap_or(0);
                                editing.cursor_position += next;
                            }
                        }
                        KeyCode::Home => editing.cursor_position = 0,
                        KeyCode::End => editing.cursor_position = editing.buffer.len(),
                        _ => {}
                    }
                }
            }
        }
        return ReviewAction::None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if state.cursor > 0 {
                state.cursor -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !state.questions.is_empty() && state.cursor < state.questions.len() - 1 {
                state.cursor += 1;
            }
        }
        KeyCode::Char('K') => state.move_question(false),
        KeyCode::Char('J') => state.move_question(true),
        KeyCode::Enter | KeyCode::Char('e') => state.begin_edit(),
        KeyCode::Char('a') => state.add_question(),
        KeyCode::Char('d') => state.delete_question(),
        KeyCode::Char('t') => state.cycle_kind(),
        KeyCode::Char('g') => {
            if state.questions.is_empty() {
                state.status = Some("Add at least one question first".to_string());
            } else {
                return ReviewAction::StartQuiz;
            }
        }
        KeyCode::Char('p') => return ReviewAction::ExportPdf,
        KeyCode::Char('w') => return ReviewAction::ExportDocx,
        KeyCode::Char('x') => return ReviewAction::ExportJson,
        KeyCode::Esc | KeyCode::Char('m') => return ReviewAction::BackToMenu,
        _ => {}
    }

    ReviewAction::None
}
