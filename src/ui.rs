use ratatui::{prelude::*, widgets::*};

use crate::models::HttpMethod;
use crate::session::ExecutionState;

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Simple JSON syntax highlighting
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut spans = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut is_key = false;

        for (pos, c) in line.char_indices() {
            match c {
                '"' => {
                    if !current.is_empty() && !in_string {
                        spans.push(Span::raw(current.clone()));
                        current.clear();
                    }

                    if in_string {
                        // End of string
                        current.push(c);
                        let color = if is_key { Color::Cyan } else { Color::Green };
                        spans.push(Span::styled(current.clone(), Style::default().fg(color)));
                        current.clear();
                        in_string = false;
                        is_key = false;
                    } else {
                        // Start of string, a key when the closing quote is followed by ':'
                        in_string = true;
                        current.push(c);
                        is_key = line[pos + 1..]
                            .find('"')
                            .map(|end| line[pos + 1 + end + 1..].trim_start().starts_with(':'))
                            .unwrap_or(false);
                    }
                }
                _ if in_string => current.push(c),
                ':' => {
                    if !current.is_empty() {
                        spans.push(Span::raw(current.clone()));
                        current.clear();
                    }
                    spans.push(Span::styled(":", Style::default().fg(Color::White)));
                }
                '{' | '}' | '[' | ']' => {
                    if !current.is_empty() {
                        spans.push(Span::raw(current.clone()));
                        current.clear();
                    }
                    spans.push(Span::styled(
                        c.to_string(),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                't' | 'r' | 'u' | 'e' | 'f' | 'a' | 'l' | 's' | 'n' => {
                    current.push(c);
                    // Check for true, false, null
                    let trimmed = current.trim_start();
                    if trimmed == "true" || trimmed == "false" || trimmed == "null" {
                        let keyword = trimmed.to_string();
                        let indent = current.len() - keyword.len();
                        if indent > 0 {
                            spans.push(Span::raw(current[..indent].to_string()));
                        }
                        spans.push(Span::styled(keyword, Style::default().fg(Color::Magenta)));
                        current.clear();
                    }
                }
                _ => current.push(c),
            }
        }

        if !current.is_empty() {
            let trimmed = current.trim().trim_end_matches(',');
            // Color numbers
            if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
                spans.push(Span::styled(current, Style::default().fg(Color::Yellow)));
            } else {
                spans.push(Span::raw(current));
            }
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::DELETE => Color::Red,
    }
}

/// Label and color for the execution badge
pub fn state_badge(state: ExecutionState) -> Option<(&'static str, Color)> {
    match state {
        ExecutionState::Idle => None,
        ExecutionState::Sending => Some(("Sending...", Color::Yellow)),
        ExecutionState::Succeeded => Some(("OK", Color::Green)),
        ExecutionState::Failed => Some(("Failed", Color::Red)),
    }
}

/// Line and column (in chars) of a byte offset inside multi-line text
pub fn cursor_line_col(text: &str, byte_pos: usize) -> (u16, u16) {
    let before = &text[..byte_pos.min(text.len())];
    let line = before.matches('\n').count();
    let col = before
        .rsplit('\n')
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0);
    (line as u16, col as u16)
}
