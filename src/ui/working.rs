use crate::models::AiStage;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn draw_working(f: &mut Frame, stage: AiStage, tick: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([Constraint::Length(3), Constraint::Length(5)])
        .split(f.area());

    let title = Paragraph::new("Working")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let label = match stage {
        AiStage::Analysis => "Reading your notebook pages...",
        AiStage::Generation => "Writing quiz questions...",
    };
    let spinner = SPINNER[tick % SPINNER.len()];
    let message = Paragraph::new(vec![
        Line::from(format!("{} {}", spinner, label)),
        Line::from(""),
        Line::from(Span::styled(
            "This can take a little while.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);
}
