use crate::models::{NotebookAnalysis, QuestionPlan};
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_analysis(
    f: &mut Frame,
    analysis: &NotebookAnalysis,
    plan: &QuestionPlan,
    error: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(f.area());

    let title = Paragraph::new("Notebook Analysis")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let mut overview = vec![
        Line::from(format!("Subject: {}", analysis.subject)),
        Line::from(format!("Grade level: {}", analysis.grade_level)),
        Line::from(format!("Concept: {}", analysis.core_concept)),
        Line::from(format!(
            "Language: {}   Confidence: {:.0}%   Pages: {}",
            analysis.language,
            analysis.confidence * 100.0,
            analysis.image_count
        )),
    ];
    if !analysis.content_summary.is_empty() {
        overview.push(Line::from(format!(
            "Summary: {}",
            truncate_string(&analysis.content_summary, 200)
        )));
    }
    if !analysis.key_terms.is_empty() {
        overview.push(Line::from(format!(
            "Key terms: {}",
            truncate_string(&analysis.key_terms.join(", "), 120)
        )));
    }
    if let Some(error) = error {
        overview.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    let overview = Paragraph::new(overview)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Overview"));
    f.render_widget(overview, chunks[1]);

    let transcript = Paragraph::new(analysis.transcribed_text.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Transcription"),
        );
    f.render_widget(transcript, chunks[2]);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help = Paragraph::new(vec![Line::from(vec![
        Span::styled("g", key_style),
        Span::from(format!(" Generate {} questions  ", plan.total())),
        Span::styled("m", key_style),
        Span::from(" Back to menu  "),
        Span::styled("Ctrl+C", key_style),
        Span::from(" Exit App"),
    ])])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn sample_analysis(content_summary: &str) -> NotebookAnalysis {
        NotebookAnalysis {
            transcribed_text: "The cell is the basic unit of life.".to_string(),
            subject: "Biology".to_string(),
            grade_level: "7".to_string(),
            core_concept: "Cell structure".to_string(),
            language: "English".to_string(),
            confidence: 0.9,
            key_terms: vec!["cell".to_string(), "nucleus".to_string()],
            visual_elements: vec![],
            content_summary: content_summary.to_string(),
            image_count: 2,
        }
    }

    fn render_to_text(analysis: &NotebookAnalysis) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| draw_analysis(f, analysis, &QuestionPlan::default(), None))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_overview_shows_content_summary() {
        let analysis = sample_analysis("Notes on cell organelles and their roles.");
        let text = render_to_text(&analysis);
        assert!(text.contains("Summary: Notes on cell organelles and their roles."));
        assert!(text.contains("Subject: Biology"));
        assert!(text.contains("Key terms: cell, nucleus"));
    }

    #[test]
    fn test_overview_skips_empty_summary() {
        let analysis = sample_analysis("");
        let text = render_to_text(&analysis);
        assert!(!text.contains("Summary:"));
    }
}
