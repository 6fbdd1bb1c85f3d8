use crate::models::{Question, QuestionKind};
use crossterm::event::{KeyCode, KeyEvent};
use lazy_static::lazy_static;
use regex::Regex;

pub const BASE_POINTS: u32 = 10;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub points: u32,
    pub streak: usize,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, PartialEq)]
pub enum QuizAction {
    None,
    Finished,
    RequestQuit,
}

/// Live quiz state: one question at a time, immediate feedback, score with
/// streak bonuses.
#[derive(Debug)]
pub struct QuizSession {
    pub questions: Vec<Question>,
    pub quiz_title: String,
    pub current_index: usize,
    pub score: u32,
    pub streak: usize,
    pub max_streak: usize,
    pub correct_answers: usize,
    pub questions_answered: usize,
    pub missed: Vec<usize>,
    pub selected_option: usize,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub feedback: Option<AnswerFeedback>,
    pub finished: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, quiz_title: String) -> Self {
        Self {
            questions,
            quiz_title,
            current_index: 0,
            score: 0,
            streak: 0,
            max_streak: 0,
            correct_answers: 0,
            questions_answered: 0,
            missed: Vec::new(),
            selected_option: 0,
            input_buffer: String::new(),
            cursor_position: 0,
            feedback: None,
            finished: false,
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Maximum score attainable so far: base points per answered question,
    /// bonuses excluded so a bonus-free perfect run still grades as 100%.
    pub fn total_possible(&self) -> u32 {
        self.questions_answered as u32 * BASE_POINTS
    }

    pub fn accuracy(&self) -> f32 {
        if self.questions_answered == 0 {
            0.0
        } else {
            self.correct_answers as f32 / self.questions_answered as f32 * 100.0
        }
    }

    /// Grade the current question and record feedback. The streak bonus uses
    /// the streak as it stood BEFORE this answer.
    pub fn submit_answer(&mut self) {
        if self.feedback.is_some() || self.finished {
            return;
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return;
        };

        let correct = match question.kind {
            QuestionKind::ShortAnswer => {
                short_answer_matches(&self.input_buffer, &question.correct_answer)
            }
            _ => self.selected_option as i32 == question.correct_index,
        };

        self.questions_answered += 1;

        let points = if correct {
            let points = points_for(self.streak);
            self.score += points;
            self.streak += 1;
            self.correct_answers += 1;
            if self.streak > self.max_streak {
                self.max_streak = self.streak;
            }
            points
        } else {
            self.streak = 0;
            self.missed.push(self.current_index);
            0
        };

        self.feedback = Some(AnswerFeedback {
            correct,
            points,
            streak: self.streak,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        });
    }

    /// Letter grade for the summary screen. Graded on accuracy alone, so
    /// streak bonuses raise the score but never the grade.
    pub fn grade(&self) -> (&'static str, &'static str) {
        final_grade(
            self.correct_answers as u32 * BASE_POINTS,
            self.total_possible(),
        )
    }

    /// Move past the feedback screen to the next question, or finish.
    pub fn advance(&mut self) {
        if self.feedback.take().is_none() {
            return;
        }
        self.selected_option = 0;
        self.input_buffer.clear();
        self.cursor_position = 0;
        self.current_index += 1;
        if self.current_index >= self.questions.len() {
            self.finished = true;
        }
    }
}

/// Score multiplier from the running streak, capped at 1.5x.
pub fn score_multiplier(streak: usize) -> f32 {
    (1.0 + streak as f32 * 0.1).min(1.5)
}

pub fn points_for(streak: usize) -> u32 {
    (BASE_POINTS as f32 * score_multiplier(streak)) as u32
}

/// Case-insensitive short-answer comparison that also forgives punctuation.
pub fn short_answer_matches(user_text: &str, correct_text: &str) -> bool {
    let user_clean = user_text.trim().to_lowercase();
    let correct_clean = correct_text.trim().to_lowercase();

    if user_clean == correct_clean {
        return true;
    }

    let user_simple = PUNCTUATION.replace_all(&user_clean, "");
    let correct_simple = PUNCTUATION.replace_all(&correct_clean, "");
    user_simple == correct_simple
}

pub fn streak_message(streak: usize) -> String {
    if streak >= 10 {
        return format!("AMAZING! {} in a row!", streak);
    }
    match streak {
        0 => "Let's go!",
        1 => "Good start!",
        2 => "You're on a roll!",
        3 => "Hat trick!",
        4 => "Fantastic!",
        5 => "On fire!",
        6 => "Unstoppable!",
        7 => "Incredible!",
        8 => "Legendary!",
        _ => "Master level!",
    }
    .to_string()
}

/// Letter grade and blurb for a final score against the bonus-free maximum.
pub fn final_grade(score: u32, total_possible: u32) -> (&'static str, &'static str) {
    if total_possible == 0 {
        return ("N/A", "No questions answered");
    }

    let percentage = score as f32 / total_possible as f32 * 100.0;

    if percentage >= 95.0 {
        ("A+", "Outstanding!")
    } else if percentage >= 90.0 {
        ("A", "Excellent!")
    } else if percentage >= 85.0 {
        ("A-", "Great work!")
    } else if percentage >= 80.0 {
        ("B+", "Very good!")
    } else if percentage >= 75.0 {
        ("B", "Good job!")
    } else if percentage >= 70.0 {
        ("B-", "Nice effort!")
    } else if percentage >= 65.0 {
        ("C+", "Getting there!")
    } else if percentage >= 60.0 {
        ("C", "Keep practicing!")
    } else if percentage >= 55.0 {
        ("C-", "Almost there!")
    } else if percentage >= 50.0 {
        ("D", "Need more practice")
    } else {
        ("F", "Let's try again!")
    }
}

/// Replace a blank placeholder in a fill-in question with a run of
/// underscores sized to hint at the answer length.
pub fn create_smart_blank(question_text: &str, answer: &str) -> String {
    let blank_length = answer.chars().count().min(10);
    let visual_blank = " _ ".repeat(blank_length.max(1));
    let visual_blank = visual_blank.trim();

    for placeholder in ["_____", "____", "___", "__", "_", "[blank]", "[BLANK]"] {
        if question_text.contains(placeholder) {
            return question_text.replace(placeholder, visual_blank);
        }
    }

    format!("{} {}", question_text, visual_blank)
}

pub fn handle_quiz_input(key: KeyEvent, session: &mut QuizSession) -> QuizAction {
    if key.code == KeyCode::Esc {
        return QuizAction::RequestQuit;
    }

    if session.feedback.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            session.advance();
            if session.finished {
                return QuizAction::Finished;
            }
        }
        return QuizAction::None;
    }

    let Some(question) = session.current() else {
        return QuizAction::None;
    };

    match question.kind {
        QuestionKind::ShortAnswer => match key.code {
            KeyCode::Enter => {
                if !session.input_buffer.trim().is_empty() {
                    session.submit_answer();
                }
            }
            KeyCode::Char(c) => {
                session.input_buffer.insert(session.cursor_position, c);
                session.cursor_position += c.len_utf8();
            }
            KeyCode::Backspace => {
                if session.cursor_position > 0 {
                    let prev = session.input_buffer[..session.cursor_position]
                        .chars()
                        .next_back()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
                    session.cursor_position -= prev;
                    session.input_buffer.remove(session.cursor_position);
                }
            }
            KeyCode::Delete => {
                if session.cursor_position < session.input_buffer.len() {
                    session.input_buffer.remove(session.cursor_position);
                }
            }
            KeyCode::Left => {
                if session.cursor_position > 0 {
                    let prev = session.input_buffer[..session.cursor_position]
                        .chars()
                        .next_back()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
                    session.cursor_position -= prev;
                }
            }
            KeyCode::Right => {
                if session.cursor_position < session.input_buffer.len() {
                    let next = session.input_buffer[session.cursor_position..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
                    session.cursor_position += next;
                }
            }
            KeyCode::Home => session.cursor_position = 0,
            KeyCode::End => session.cursor_position = session.input_buffer.len(),
            _ => {}
        },
        _ => {
            let option_count = question.options.len();
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    if session.selected_option > 0 {
                        session.selected_option -= 1;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if option_count > 0 && session.selected_option < option_count - 1 {
                        session.selected_option += 1;
                    }
                }
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    if index < option_count {
                        session.selected_option = index;
                    }
                }
                KeyCode::Enter => session.submit_answer(),
                _ => {}
            }
        }
    }

    QuizAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mc_question(prompt: &str, correct_index: i32) -> Question {
        Question {
            prompt: prompt.to_string(),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            correct_index,
            correct_answer: "a".to_string(),
            explanation: "Because.".to_string(),
            misconception_tag: "Tag".to_string(),
        }
    }

    fn sa_question(answer: &str) -> Question {
        Question {
            prompt: "The answer is _____.".to_string(),
            kind: QuestionKind::ShortAnswer,
            options: vec![],
            correct_index: -1,
            correct_answer: answer.to_string(),
            explanation: String::new(),
            misconception_tag: String::new(),
        }
    }

    fn session_of(questions: Vec<Question>) -> QuizSession {
        QuizSession::new(questions, "Test Quiz".to_string())
    }

    #[test]
    fn test_correct_answer_scores_base_points() {
        let mut session = session_of(vec![mc_question("q1", 0)]);
        session.selected_option = 0;
        session.submit_answer();

        assert_eq!(session.score, 10);
        assert_eq!(session.streak, 1);
        assert_eq!(session.correct_answers, 1);
        let feedback = session.feedback.as_ref().unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.points, 10);
    }

    #[test]
    fn test_streak_bonus_grows_with_consecutive_correct_answers() {
        let mut session = session_of(vec![
            mc_question("q1", 0),
            mc_question("q2", 0),
            mc_question("q3", 0),
        ]);

        for _ in 0..3 {
            session.selected_option = 0;
            session.submit_answer();
            session.advance();
        }

        // 10 + 11 + 12: the bonus uses the streak before each answer
        assert_eq!(session.score, 33);
        assert_eq!(session.streak, 3);
        assert_eq!(session.max_streak, 3);
        assert!(session.finished);
    }

    #[test]
    fn test_wrong_answer_resets_streak_and_records_miss() {
        let mut session = session_of(vec![mc_question("q1", 0), mc_question("q2", 0)]);

        session.selected_option = 0;
        session.submit_answer();
        session.advance();

        session.selected_option = 2;
        session.submit_answer();

        assert_eq!(session.streak, 0);
        assert_eq!(session.max_streak, 1);
        assert_eq!(session.score, 10);
        assert_eq!(session.missed, vec![1]);
        assert!(!session.feedback.as_ref().unwrap().correct);
    }

    #[test]
    fn test_double_submit_is_ignored_until_advance() {
        let mut session = session_of(vec![mc_question("q1", 0)]);
        session.selected_option = 0;
        session.submit_answer();
        session.submit_answer();

        assert_eq!(session.score, 10);
        assert_eq!(session.questions_answered, 1);
    }

    #[test]
    fn test_score_multiplier_caps_at_one_and_a_half() {
        assert!((score_multiplier(0) - 1.0).abs() < f32::EPSILON);
        assert!((score_multiplier(3) - 1.3).abs() < 1e-5);
        assert!((score_multiplier(5) - 1.5).abs() < f32::EPSILON);
        assert!((score_multiplier(20) - 1.5).abs() < f32::EPSILON);
        assert_eq!(points_for(20), 15);
    }

    #[test]
    fn test_short_answer_forgives_case_whitespace_and_punctuation() {
        assert!(short_answer_matches("Dividend", "dividend"));
        assert!(short_answer_matches("  dividend  ", "dividend"));
        assert!(short_answer_matches("it's a cell", "its a cell"));
        assert!(!short_answer_matches("divisor", "dividend"));
    }

    #[test]
    fn test_short_answer_question_uses_text_comparison() {
        let mut session = session_of(vec![sa_question("Pacific")]);
        session.input_buffer = "pacific.".to_string();
        session.submit_answer();
        assert!(session.feedback.as_ref().unwrap().correct);
    }

    #[test]
    fn test_total_possible_counts_answered_questions_only() {
        let mut session = session_of(vec![mc_question("q1", 0), mc_question("q2", 0)]);
        session.selected_option = 0;
        session.submit_answer();
        assert_eq!(session.total_possible(), 10);
        assert!((session.accuracy() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_grade_ignores_streak_bonus() {
        let mut session = session_of((0..10).map(|_| mc_question("q", 0)).collect());

        // five correct in a row, then five wrong
        for _ in 0..5 {
            session.selected_option = 0;
            session.submit_answer();
            session.advance();
        }
        for _ in 0..5 {
            session.selected_option = 1;
            session.submit_answer();
            session.advance();
        }

        // bonuses push the raw score past half the possible points
        assert_eq!(session.score, 60);
        assert_eq!(session.total_possible(), 100);
        // but the grade follows accuracy: 5/10 is a D, not a C
        assert_eq!(session.grade().0, "D");
    }

    #[test]
    fn test_final_grade_thresholds() {
        assert_eq!(final_grade(0, 0).0, "N/A");
        assert_eq!(final_grade(95, 100).0, "A+");
        assert_eq!(final_grade(90, 100).0, "A");
        assert_eq!(final_grade(85, 100).0, "A-");
        assert_eq!(final_grade(80, 100).0, "B+");
        assert_eq!(final_grade(75, 100).0, "B");
        assert_eq!(final_grade(70, 100).0, "B-");
        assert_eq!(final_grade(65, 100).0, "C+");
        assert_eq!(final_grade(60, 100).0, "C");
        assert_eq!(final_grade(55, 100).0, "C-");
        assert_eq!(final_grade(50, 100).0, "D");
        assert_eq!(final_grade(49, 100).0, "F");
    }

    #[test]
    fn test_streak_messages() {
        assert_eq!(streak_message(0), "Let's go!");
        assert_eq!(streak_message(3), "Hat trick!");
        assert_eq!(streak_message(9), "Master level!");
        assert_eq!(streak_message(12), "AMAZING! 12 in a row!");
    }

    #[test]
    fn test_create_smart_blank_replaces_placeholder() {
        let result = create_smart_blank("The answer is _____.", "cat");
        assert_eq!(result, "The answer is _  _  _.");
    }

    #[test]
    fn test_create_smart_blank_caps_length_and_appends_when_missing() {
        let long = create_smart_blank("Name it: _____", "photosynthesis");
        assert_eq!(long.matches('_').count(), 10);

        let appended = create_smart_blank("Name the largest ocean", "Pacific");
        assert!(appended.starts_with("Name the largest ocean "));
        assert_eq!(appended.matches('_').count(), 7);
    }

    #[test]
    fn test_quiz_input_navigation_and_submit() {
        let mut session = session_of(vec![mc_question("q1", 2)]);

        handle_quiz_input(key(KeyCode::Down), &mut session);
        handle_quiz_input(key(KeyCode::Down), &mut session);
        assert_eq!(session.selected_option, 2);

        handle_quiz_input(key(KeyCode::Up), &mut session);
        assert_eq!(session.selected_option, 1);

        handle_quiz_input(key(KeyCode::Char('3')), &mut session);
        assert_eq!(session.selected_option, 2);

        handle_quiz_input(key(KeyCode::Enter), &mut session);
        assert!(session.feedback.as_ref().unwrap().correct);

        let action = handle_quiz_input(key(KeyCode::Enter), &mut session);
        assert_eq!(action, QuizAction::Finished);
        assert!(session.finished);
    }

    #[test]
    fn test_quiz_input_short_answer_editing() {
        let mut session = session_of(vec![sa_question("cat")]);

        for c in "cart".chars() {
            handle_quiz_input(key(KeyCode::Char(c)), &mut session);
        }
        handle_quiz_input(key(KeyCode::Left), &mut session);
        handle_quiz_input(key(KeyCode::Backspace), &mut session);
        assert_eq!(session.input_buffer, "cat");
        assert_eq!(session.cursor_position, 2);

        handle_quiz_input(key(KeyCode::End), &mut session);
        assert_eq!(session.cursor_position, 3);

        handle_quiz_input(key(KeyCode::Enter), &mut session);
        assert!(session.feedback.as_ref().unwrap().correct);
    }

    #[test]
    fn test_quiz_input_ignores_empty_short_answer_submit() {
        let mut session = session_of(vec![sa_question("cat")]);
        handle_quiz_input(key(KeyCode::Enter), &mut session);
        assert!(session.feedback.is_none());
    }

    #[test]
    fn test_quiz_input_escape_requests_quit() {
        let mut session = session_of(vec![mc_question("q1", 0)]);
        assert_eq!(
            handle_quiz_input(key(KeyCode::Esc), &mut session),
            QuizAction::RequestQuit
        );
    }
}
