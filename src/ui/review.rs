use crate::review::{EditField, ReviewState, editable_fields};
use crate::ui::layout::calculate_review_chunks;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_review(f: &mut Frame, state: &ReviewState) {
    let layout = calculate_review_chunks(f.area());

    let header = Paragraph::new(format!("Review Questions ({})", state.questions.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut list_lines = Vec::new();
    if state.questions.is_empty() {
        list_lines.push(Line::from("No questions. Press a to add one."));
    } else {
        for (i, question) in state.questions.iter().enumerate() {
            let line = format!(
                "{:>2}. {} {}",
                i + 1,
                question.kind.badge(),
                truncate_string(&question.prompt, 40)
            );
            if i == state.cursor {
                list_lines.push(Line::from(Span::styled(
                    format!("> {}", line),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                list_lines.push(Line::from(format!("  {}", line)));
            }
        }
    }
    let list = Paragraph::new(list_lines)
        .block(Block::default().borders(Borders::ALL).title("Questions"));
    f.render_widget(list, layout.list_area);

    let mut detail_lines = Vec::new();
    if let Some(question) = state.current() {
        let fields = editable_fields(question.kind);
        let editing_index = state.editing.as_ref().map(|e| e.field_index);

        for (i, field) in fields.iter().enumerate() {
            let value = match field {
                EditField::Prompt => question.prompt.clone(),
                EditField::Option(j) => question.options.get(*j).cloned().unwrap_or_default(),
                EditField::CorrectAnswer => question.correct_answer.clone(),
                EditField::Explanation => question.explanation.clone(),
                EditField::MisconceptionTag => question.misconception_tag.clone(),
            };

            if editing_index == Some(i) {
                let buffer = state
                    .editing
                    .as_ref()
                    .map(|e| e.buffer.clone())
                    .unwrap_or_default();
                detail_lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}: ", field.label()),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(buffer, Style::default().fg(Color::Yellow)),
                    Span::styled("█", Style::default().fg(Color::Yellow)),
                ]));
            } else {
                detail_lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}: ", field.label()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::from(value),
                ]));
            }
        }

        detail_lines.push(Line::from(""));
        detail_lines.push(Line::from(Span::styled(
            format!("Type: {}", question.kind.label()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let detail = Paragraph::new(detail_lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(detail, layout.detail_area);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut help_lines = if state.editing.is_some() {
        vec![Line::from(vec![
            Span::styled("Tab", key_style),
            Span::from(" Next field  "),
            Span::styled("Enter", key_style),
            Span::from(" Save  "),
            Span::styled("Esc", key_style),
            Span::from(" Cancel"),
        ])]
    } else {
        vec![
            Line::from(vec![
                Span::styled("↑/↓", key_style),
                Span::from(" Navigate  "),
                Span::styled("e", key_style),
                Span::from(" Edit  "),
                Span::styled("a", key_style),
                Span::from(" Add  "),
                Span::styled("d", key_style),
                Span::from(" Delete  "),
                Span::styled("t", key_style),
                Span::from(" Type  "),
                Span::styled("J/K", key_style),
                Span::from(" Move"),
            ]),
            Line::from(vec![
                Span::styled("g", key_style),
                Span::from(" Start quiz  "),
                Span::styled("p", key_style),
                Span::from(" PDF  "),
                Span::styled("w", key_style),
                Span::from(" DOCX  "),
                Span::styled("x", key_style),
                Span::from(" JSON  "),
                Span::styled("Esc", key_style),
                Span::from(" Menu"),
            ]),
        ]
    };
    if let Some(status) = &state.status {
        help_lines.truncate(1);
        help_lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let help = Paragraph::new(help_lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
