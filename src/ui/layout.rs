use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub interaction_area: Rect,
    pub help_area: Rect,
}

pub struct ReviewLayout {
    pub header_area: Rect,
    pub list_area: Rect,
    pub detail_area: Rect,
    pub help_area: Rect,
}

pub struct SummaryLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Percentage(60),
            Constraint::Length(4),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        interaction_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_review_chunks(area: Rect) -> ReviewLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    ReviewLayout {
        header_area: chunks[0],
        list_area: body[0],
        detail_area: body[1],
        help_area: chunks[2],
    }
}

pub fn calculate_summary_chunks(area: Rect) -> SummaryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(area);

    SummaryLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        footer_area: chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_layout() {
        let area = Rect::new(0, 0, 100, 100);
        let layout = calculate_quiz_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.help_area.height, 4);
        assert!(layout.question_area.height >= 4);
        assert!(layout.interaction_area.height > 0);
    }

    #[test]
    fn test_review_layout_splits_body_in_two_columns() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = calculate_review_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.help_area.height, 4);
        assert_eq!(layout.list_area.y, layout.detail_area.y);
        assert!(layout.list_area.width < layout.detail_area.width);
    }

    #[test]
    fn test_summary_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_summary_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.footer_area.height, 4);
        // margin 1 top and bottom
        assert_eq!(layout.content_area.height, 38 - 3 - 4);
    }
}
