use crate::quiz::QuizSession;
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_summary(f: &mut Frame, session: &QuizSession, status: Option<&str>) {
    let layout = calculate_summary_chunks(f.area());

    let header = Paragraph::new(format!("Quiz Complete - {}", session.quiz_title))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let (letter, description) = session.grade();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Grade: {}  -  {}", letter, description),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Score: {} / {} possible",
            session.score,
            session.total_possible()
        )),
        Line::from(format!(
            "Correct: {} / {}  ({:.0}%)",
            session.correct_answers,
            session.questions_answered,
            session.accuracy()
        )),
        Line::from(format!("Best streak: {}", session.max_streak)),
    ];

    if !session.missed.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Review these:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for &index in &session.missed {
            if let Some(question) = session.questions.get(index) {
                lines.push(Line::from(format!(
                    "  {}. {} ({})",
                    index + 1,
                    truncate_string(&question.prompt, 60),
                    question.misconception_tag
                )));
            }
        }
    }

    if let Some(status) = status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(content, layout.content_area);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("r", key_style),
            Span::from(" Retry (shuffled)  "),
            Span::styled("v", key_style),
            Span::from(" Back to review  "),
            Span::styled("m", key_style),
            Span::from(" Menu"),
        ]),
        Line::from(vec![
            Span::styled("p", key_style),
            Span::from(" Export PDF  "),
            Span::styled("w", key_style),
            Span::from(" Export DOCX  "),
            Span::styled("x", key_style),
            Span::from(" Export JSON  "),
            Span::styled("Ctrl+C", key_style),
            Span::from(" Exit App"),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
