use crate::files;
use crate::models::{LanguageHint, QuestionPlan};
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 20;
pub const DEFAULT_QUESTIONS: usize = 10;

#[derive(Debug, PartialEq)]
pub enum MenuAction {
    None,
    Analyze,
    Quit,
}

/// Image picker plus quiz settings shown on the start screen.
#[derive(Debug)]
pub struct MenuState {
    pub images: Vec<PathBuf>,
    pub selected: Vec<bool>,
    pub cursor: usize,
    pub question_count: usize,
    pub language_hint: LanguageHint,
    pub status: Option<String>,
}

impl MenuState {
    pub fn new() -> Self {
        let images = files::get_image_files();
        let selected = vec![false; images.len()];
        Self {
            images,
            selected,
            cursor: 0,
            question_count: DEFAULT_QUESTIONS,
            language_hint: LanguageHint::Auto,
            status: None,
        }
    }

    pub fn rescan(&mut self) {
        self.images = files::get_image_files();
        self.selected = vec![false; self.images.len()];
        self.cursor = 0;
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.images
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn plan(&self) -> QuestionPlan {
        QuestionPlan::split(self.question_count)
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_menu_input(key: KeyEvent, state: &mut MenuState) -> MenuAction {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if state.cursor > 0 {
                state.cursor -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !state.images.is_empty() && state.cursor < state.images.len() - 1 {
                state.cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(selected) = state.selected.get_mut(state.cursor) {
                *selected = !*selected;
            }
        }
        KeyCode::Char('r') => {
            state.rescan();
            state.status = Some(format!("Found {} image(s)", state.images.len()));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if state.question_count < MAX_QUESTIONS {
                state.question_count += 1;
            }
        }
        KeyCode::Char('-') => {
            if state.question_count > MIN_QUESTIONS {
                state.question_count -= 1;
            }
        }
        KeyCode::Char('l') => {
            state.language_hint = state.language_hint.cycle();
        }
        KeyCode::Enter | KeyCode::Char('a') => {
            if state.selected_paths().is_empty() {
                state.status = Some("Select at least one notebook image first".to_string());
            } else {
                return MenuAction::Analyze;
            }
        }
        KeyCode::Char('q') | KeyCode::Esc => return MenuAction::Quit,
        _ => {}
    }
    MenuAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_with_images(count: usize) -> MenuState {
        let images: Vec<PathBuf> = (0..count)
            .map(|i| PathBuf::from(format!("notebooks/page{}.jpg", i)))
            .collect();
        let selected = vec![false; images.len()];
        MenuState {
            images,
            selected,
            cursor: 0,
            question_count: DEFAULT_QUESTIONS,
            language_hint: LanguageHint::Auto,
            status: None,
        }
    }

    #[test]
    fn test_space_toggles_selection() {
        let mut state = state_with_images(2);
        handle_menu_input(key(KeyCode::Char(' ')), &mut state);
        assert!(state.selected[0]);
        handle_menu_input(key(KeyCode::Char(' ')), &mut state);
        assert!(!state.selected[0]);
    }

    #[test]
    fn test_selected_paths_follow_toggles() {
        let mut state = state_with_images(3);
        handle_menu_input(key(KeyCode::Char(' ')), &mut state);
        handle_menu_input(key(KeyCode::Down), &mut state);
        handle_menu_input(key(KeyCode::Down), &mut state);
        handle_menu_input(key(KeyCode::Char(' ')), &mut state);

        let paths = state.selected_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], PathBuf::from("notebooks/page0.jpg"));
        assert_eq!(paths[1], PathBuf::from("notebooks/page2.jpg"));
    }

    #[test]
    fn test_question_count_stays_in_bounds() {
        let mut state = state_with_images(1);
        for _ in 0..30 {
            handle_menu_input(key(KeyCode::Char('+')), &mut state);
        }
        assert_eq!(state.question_count, MAX_QUESTIONS);
        for _ in 0..30 {
            handle_menu_input(key(KeyCode::Char('-')), &mut state);
        }
        assert_eq!(state.question_count, MIN_QUESTIONS);
    }

    #[test]
    fn test_language_hint_cycles() {
        let mut state = state_with_images(1);
        handle_menu_input(key(KeyCode::Char('l')), &mut state);
        assert_eq!(state.language_hint, LanguageHint::English);
        handle_menu_input(key(KeyCode::Char('l')), &mut state);
        assert_eq!(state.language_hint, LanguageHint::Spanish);
        handle_menu_input(key(KeyCode::Char('l')), &mut state);
        assert_eq!(state.language_hint, LanguageHint::Auto);
    }

    #[test]
    fn test_analyze_requires_a_selection() {
        let mut state = state_with_images(1);
        assert_eq!(
            handle_menu_input(key(KeyCode::Enter), &mut state),
            MenuAction::None
        );
        assert!(state.status.is_some());

        handle_menu_input(key(KeyCode::Char(' ')), &mut state);
        assert_eq!(
            handle_menu_input(key(KeyCode::Enter), &mut state),
            MenuAction::Analyze
        );
    }

    #[test]
    fn test_quit_keys() {
        let mut state = state_with_images(1);
        assert_eq!(
            handle_menu_input(key(KeyCode::Char('q')), &mut state),
            MenuAction::Quit
        );
        assert_eq!(
            handle_menu_input(key(KeyCode::Esc), &mut state),
            MenuAction::Quit
        );
    }
}
