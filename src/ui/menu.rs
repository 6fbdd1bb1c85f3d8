use crate::menu::MenuState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn draw_menu(f: &mut Frame, state: &MenuState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(f.area());

    let title = Paragraph::new("Notebook Quiz")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let mut lines = Vec::new();
    if state.images.is_empty() {
        lines.push(Line::from(
            "No images found. Put notebook photos in the notebooks/ folder and press r.",
        ));
    } else {
        for (i, path) in state.images.iter().enumerate() {
            let marker = if state.selected[i] { "[x]" } else { "[ ]" };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            let line = format!("{} {}", marker, name);
            if i == state.cursor {
                lines.push(Line::from(Span::styled(
                    format!("> {}", line),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(format!("  {}", line)));
            }
        }
    }

    let images = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Notebook Pages"),
    );
    f.render_widget(images, chunks[1]);

    let plan = state.plan();
    let mut settings = vec![
        Line::from(format!(
            "Questions: {}  ({} multiple choice, {} true/false, {} short answer)",
            state.question_count, plan.multiple_choice, plan.true_false, plan.short_answer
        )),
        Line::from(format!("Language: {}", state.language_hint.label())),
    ];
    if let Some(status) = &state.status {
        settings.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let settings = Paragraph::new(settings).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Quiz Settings"),
    );
    f.render_widget(settings, chunks[2]);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![
            Span::styled("↑/↓", key_style),
            Span::from(" Navigate  "),
            Span::styled("Space", key_style),
            Span::from(" Select  "),
            Span::styled("r", key_style),
            Span::from(" Rescan  "),
            Span::styled("+/-", key_style),
            Span::from(" Question count  "),
            Span::styled("l", key_style),
            Span::from(" Language"),
        ]),
        Line::from(vec![
            Span::styled("Enter", key_style),
            Span::from(" Analyze selected  "),
            Span::styled("q", key_style),
            Span::from(" Quit"),
        ]),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}
