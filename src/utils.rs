use lazy_static::lazy_static;
use regex::Regex;
use unicode_width::UnicodeWidthChar;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[-\s]+").unwrap();
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Download-safe filename: strip punctuation, collapse separators, append
/// a YYYYMMDD stamp and the extension.
pub fn safe_filename(title: &str, date_stamp: &str, extension: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(title, "");
    let joined = SEPARATORS.replace_all(cleaned.trim(), "_");
    let base = if joined.is_empty() {
        "quiz".to_string()
    } else {
        joined.to_string()
    };
    format!("{}_{}.{}", base, date_stamp, extension)
}

/// Greedy word wrap used by the exporters. Words longer than the limit are
/// split hard so a pathological token cannot overflow a page line.
pub fn wrap_plain_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(max_chars);
            lines.push(head.to_string());
            word = tail;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Simulate how text wraps with trimming (matching ratatui Wrap { trim: true })
/// across explicit newlines and automatic width breaks. Returns
/// (line_text, start_index, end_index) per visual line.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut line_start_idx = 0;

    for (char_idx, ch) in text.char_indices() {
        if ch == '\n' {
            let trimmed = current_line.trim_end().to_string();
            lines.push((trimmed, line_start_idx, char_idx));
            current_line = String::new();
            current_width = 0;
            line_start_idx = char_idx + 1;
        } else {
            let char_width = ch.width().unwrap_or(1);
            if current_width + char_width > max_width && current_width > 0 {
                let trimmed = current_line.trim_end().to_string();
                lines.push((trimmed, line_start_idx, char_idx));
                current_line = ch.to_string();
                current_width = char_width;
                line_start_idx = char_idx;
            } else {
                current_line.push(ch);
                current_width += char_width;
            }
        }
    }

    if !current_line.is_empty() || text.ends_with('\n') {
        let trimmed = current_line.trim_end().to_string();
        lines.push((trimmed, line_start_idx, text.len()));
    }

    lines
}

/// Line and column of the cursor within wrapped text, so the terminal cursor
/// can sit where the next typed character will land.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 {
        return (0, 0);
    }

    let wrapped_lines = simulate_wrapped_lines(text, max_width);

    for (line_idx, (_, start_idx, end_idx)) in wrapped_lines.iter().enumerate() {
        if cursor_index >= *start_idx && cursor_index <= *end_idx {
            let col_in_line = cursor_index.saturating_sub(*start_idx);
            return (line_idx, col_in_line);
        }
    }

    if let Some((last_text, _, last_end)) = wrapped_lines.last()
        && cursor_index >= *last_end
    {
        return (
            wrapped_lines.len().saturating_sub(1),
            last_text.chars().count(),
        );
    }

    (0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_no_truncation() {
        assert_eq!(truncate_string("Short string", 20), "Short string");
    }

    #[test]
    fn test_truncate_string_with_truncation() {
        let result = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(result, "This is a very lo...");
        assert!(result.len() <= 20);
    }

    #[test]
    fn test_safe_filename_strips_punctuation() {
        let name = safe_filename("Long Division: with Remainders!", "20240315", "pdf");
        assert_eq!(name, "Long_Division_with_Remainders_20240315.pdf");
    }

    #[test]
    fn test_safe_filename_empty_title() {
        assert_eq!(safe_filename("  ?!  ", "20240315", "json"), "quiz_20240315.json");
    }

    #[test]
    fn test_wrap_plain_text_simple() {
        let lines = wrap_plain_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_plain_text_long_word_is_split() {
        let lines = wrap_plain_text("abcdefghijKLMNO", 10);
        assert_eq!(lines, vec!["abcdefghij", "KLMNO"]);
    }

    #[test]
    fn test_wrap_plain_text_empty() {
        assert_eq!(wrap_plain_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_cursor_position_start() {
        assert_eq!(calculate_wrapped_cursor_position("hello", 0, 10), (0, 0));
    }

    #[test]
    fn test_cursor_position_within_first_line() {
        assert_eq!(calculate_wrapped_cursor_position("hello", 3, 10), (0, 3));
    }

    #[test]
    fn test_cursor_position_after_wrap() {
        // "hello worl" / "d" with width 10
        let (line, col) = calculate_wrapped_cursor_position("hello world", 11, 10);
        assert_eq!(line, 1);
        assert_eq!(col, 1);
    }

    #[test]
    fn test_cursor_position_after_newline() {
        let (line, col) = calculate_wrapped_cursor_position("ab\ncd", 4, 10);
        assert_eq!(line, 1);
        assert_eq!(col, 1);
    }

    #[test]
    fn test_cursor_position_end_of_text() {
        let (line, col) = calculate_wrapped_cursor_position("abc", 3, 10);
        assert_eq!(line, 0);
        assert_eq!(col, 3);
    }
}
