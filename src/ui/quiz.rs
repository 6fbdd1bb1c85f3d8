use crate::models::QuestionKind;
use crate::quiz::{QuizSession, create_smart_blank, score_multiplier, streak_message};
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::calculate_wrapped_cursor_position;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_quiz(f: &mut Frame, session: &QuizSession) {
    let layout = calculate_quiz_chunks(f.area());

    let Some(question) = session.current() else {
        return;
    };

    let header_text = format!(
        "Question {} / {}   Score: {}   Streak: {} (x{:.1})   {}",
        session.current_index + 1,
        session.questions.len(),
        session.score,
        session.streak,
        score_multiplier(session.streak),
        session.quiz_title
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let prompt = match question.kind {
        QuestionKind::ShortAnswer => create_smart_blank(&question.prompt, &question.correct_answer),
        _ => question.prompt.clone(),
    };
    let question_widget = Paragraph::new(Text::from(format!(
        "{} {}",
        question.kind.badge(),
        prompt
    )))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_widget, layout.question_area);

    let (interaction, title) = if let Some(feedback) = &session.feedback {
        let mut text = Text::default();
        if feedback.correct {
            text.push_line(Line::from(Span::styled(
                format!("Correct!  +{} points", feedback.points),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::from(streak_message(feedback.streak)));
        } else {
            text.push_line(Line::from(Span::styled(
                "Not quite.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::from(format!(
                "Correct answer: {}",
                feedback.correct_answer
            )));
        }
        if !feedback.explanation.is_empty() {
            text.push_line(Line::from(""));
            text.push_line(Line::from(feedback.explanation.as_str()));
        }
        if !question.misconception_tag.is_empty() && !feedback.correct {
            text.push_line(Line::from(""));
            text.push_line(Line::from(Span::styled(
                format!("Watch out for: {}", question.misconception_tag),
                Style::default().fg(Color::DarkGray),
            )));
        }
        (text, "Feedback")
    } else {
        match question.kind {
            QuestionKind::ShortAnswer => {
                let content = if session.input_buffer.is_empty() {
                    Text::from("[Type your answer here...]")
                } else {
                    Text::from(session.input_buffer.as_str())
                };
                (content, "Your Answer")
            }
            _ => {
                let mut text = Text::default();
                for (i, option) in question.options.iter().enumerate() {
                    let label = (b'A' + i as u8) as char;
                    if i == session.selected_option {
                        text.push_line(Line::from(Span::styled(
                            format!("> ({}) {}", label, option),
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        )));
                    } else {
                        text.push_line(Line::from(format!("  ({}) {}", label, option)));
                    }
                }
                (text, "Options")
            }
        }
    };
    let interaction = Paragraph::new(interaction)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(interaction, layout.interaction_area);

    if session.feedback.is_none() && question.kind == QuestionKind::ShortAnswer {
        let inner_width = layout.interaction_area.width.saturating_sub(2) as usize;
        let (cursor_line, cursor_col) = calculate_wrapped_cursor_position(
            &session.input_buffer,
            session.cursor_position,
            inner_width.max(1),
        );
        let cursor_x = layout.interaction_area.x + 1 + cursor_col as u16;
        let cursor_y = layout.interaction_area.y + 1 + cursor_line as u16;
        f.set_cursor_position((cursor_x, cursor_y));
    }

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_line = if session.feedback.is_some() {
        Line::from(vec![
            Span::styled("Enter", key_style),
            Span::from(" Next question  "),
            Span::styled("Esc", key_style),
            Span::from(" Quit quiz"),
        ])
    } else if question.kind == QuestionKind::ShortAnswer {
        Line::from(vec![
            Span::styled("Enter", key_style),
            Span::from(" Submit  "),
            Span::styled("Esc", key_style),
            Span::from(" Quit quiz"),
        ])
    } else {
        Line::from(vec![
            Span::styled("↑/↓", key_style),
            Span::from(" Navigate  "),
            Span::styled("1-4", key_style),
            Span::from(" Jump  "),
            Span::styled("Enter", key_style),
            Span::from(" Submit  "),
            Span::styled("Esc", key_style),
            Span::from(" Quit quiz"),
        ])
    };
    let help = Paragraph::new(vec![
        help_line,
        Line::from(vec![
            Span::styled("Ctrl+C", key_style),
            Span::from(" Exit App"),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit Quiz")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Stop this quiz and return to review? Progress will be lost.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Back to Review)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)  "),
        Span::styled(
            "Ctrl+C",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
