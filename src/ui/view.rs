//! Frame rendering
//!
//! Layout echoes the archive's page: header, scrollable message viewport,
//! query input, footer. All state is read-only here except the scroll
//! offset, which observes the conversation each frame.

use crate::session::{Conversation, Message, Origin, SessionState};
use crate::ui::input::InputBuffer;
use crate::ui::scroll::ScrollState;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const SPEAKER: &str = "\u{26ac} CosmereArchivist \u{26ac}";
const SUBTITLE: &str = "Archive of the Shards";
const LOADING_LABEL: &str = "Consulting the archives";
const PLACEHOLDER: &str = "Speak your query to the ancient archive...";
const FOOTER: &str = "May the light of knowledge guide your path through the Cognitive Realm";

const MAX_INPUT_ROWS: usize = 6;

fn gold() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn bronze() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn draw(
    frame: &mut Frame,
    conversation: &Conversation,
    state: &SessionState,
    input: &mut InputBuffer,
    scroll: &mut ScrollState,
    tick: usize,
) {
    input.sync(&state.draft);

    let input_width = usize::from(frame.area().width.saturating_sub(2)).max(1);
    let draft_rows = wrap_chars(&state.draft, input_width).len();
    let input_height = draft_rows.clamp(1, MAX_INPUT_ROWS) as u16 + 2;

    let [header, viewport, query, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header);
    draw_messages(frame, viewport, conversation, state, scroll, tick);
    draw_input(frame, query, state, input);
    draw_footer(frame, footer);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let block = Block::new().borders(Borders::BOTTOM);
    let lines = vec![
        Line::from(Span::styled(SPEAKER, gold())).alignment(Alignment::Center),
        Line::from(Span::styled(SUBTITLE, bronze())).alignment(Alignment::Center),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_messages(
    frame: &mut Frame,
    area: Rect,
    conversation: &Conversation,
    state: &SessionState,
    scroll: &mut ScrollState,
    tick: usize,
) {
    let block = Block::bordered().border_style(bronze());
    let inner = block.inner(area);
    let width = usize::from(inner.width).max(1);

    let mut lines = Vec::new();
    for msg in conversation.messages() {
        push_message_lines(&mut lines, msg, width);
    }
    if state.is_pending() {
        push_loading_lines(&mut lines, tick);
    }

    scroll.observe(conversation.len());
    let height = usize::from(inner.height).max(1);
    let offset_back = scroll.bounded_offset(lines.len(), height);
    let scroll_top = lines
        .len()
        .saturating_sub(height)
        .saturating_sub(offset_back) as u16;

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((scroll_top, 0));
    frame.render_widget(paragraph, area);
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, msg: &Message, width: usize) {
    let (alignment, text_style) = match msg.origin {
        Origin::Agent => (Alignment::Left, Style::default()),
        Origin::User => (Alignment::Right, Style::default().fg(Color::White)),
    };

    if msg.origin == Origin::Agent {
        lines.push(Line::from(Span::styled(SPEAKER, gold())));
    }

    for raw in msg.text.split('\n') {
        if raw.is_empty() {
            lines.push(Line::default());
            continue;
        }
        for wrapped in textwrap::wrap(raw, width) {
            lines.push(
                Line::from(Span::styled(wrapped.into_owned(), text_style)).alignment(alignment),
            );
        }
    }

    if let Some(ts) = msg.timestamp {
        lines.push(
            Line::from(Span::styled(
                ts.format("%H:%M:%S").to_string(),
                bronze().add_modifier(Modifier::ITALIC),
            ))
            .alignment(alignment),
        );
    }

    lines.push(Line::default());
}

fn push_loading_lines(lines: &mut Vec<Line<'static>>, tick: usize) {
    lines.push(Line::from(Span::styled(SPEAKER, gold())));
    let dots = ".".repeat(tick % 4);
    lines.push(Line::from(Span::styled(
        format!("{LOADING_LABEL}{dots}"),
        bronze().add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::default());
}

fn draw_input(frame: &mut Frame, area: Rect, state: &SessionState, input: &InputBuffer) {
    let border_style = if state.can_submit() { gold() } else { bronze() };

    let send_label = if state.is_pending() { " ... " } else { " Seek " };
    let block = Block::bordered()
        .border_style(border_style)
        .title_bottom(Line::from(" Enter seek \u{b7} Shift+Enter newline \u{b7} Esc quit ").left_aligned())
        .title_bottom(Line::from(Span::styled(send_label, gold())).right_aligned());

    let inner = block.inner(area);
    let width = usize::from(inner.width).max(1);
    let height = usize::from(inner.height).max(1);

    let rows = wrap_chars(&state.draft, width);
    let (cursor_row, cursor_col) = cursor_position(&state.draft, input.cursor(), width);
    let scroll_top = cursor_row.saturating_sub(height - 1);

    let paragraph = if state.draft.is_empty() {
        Paragraph::new(Span::styled(
            PLACEHOLDER,
            bronze().add_modifier(Modifier::ITALIC),
        ))
        .block(block)
    } else {
        let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
        Paragraph::new(Text::from(lines))
            .block(block)
            .scroll((scroll_top as u16, 0))
    };
    frame.render_widget(paragraph, area);

    frame.set_cursor_position((
        inner.x + cursor_col as u16,
        inner.y + (cursor_row - scroll_top) as u16,
    ));
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        FOOTER,
        bronze().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(line), area);
}

/// Hard character wrap, deterministic so cursor math can mirror it
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for raw in text.split('\n') {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
        } else {
            for chunk in chars.chunks(width) {
                rows.push(chunk.iter().collect());
            }
        }
    }
    rows
}

/// Visual (row, col) of a char-index cursor under `wrap_chars` wrapping
fn cursor_position(text: &str, cursor: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let mut remaining = cursor;
    let mut row = 0;
    for raw in text.split('\n') {
        let n = raw.chars().count();
        if remaining <= n {
            row += remaining / width;
            let mut col = remaining % width;
            // Cursor at the exact end of a full row stays on that row
            if remaining == n && n > 0 && n % width == 0 {
                row -= 1;
                col = width;
            }
            return (row, col);
        }
        remaining -= n + 1;
        row += n.div_ceil(width).max(1);
    }
    (row, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GREETING;

    #[test]
    fn wrap_chars_hard_wraps_and_keeps_blank_lines() {
        assert_eq!(wrap_chars("", 4), vec![String::new()]);
        assert_eq!(
            wrap_chars("abcdef", 4),
            vec!["abcd".to_string(), "ef".to_string()]
        );
        assert_eq!(
            wrap_chars("ab\n\ncd", 4),
            vec!["ab".to_string(), String::new(), "cd".to_string()]
        );
    }

    #[test]
    fn cursor_position_tracks_wrapping() {
        assert_eq!(cursor_position("", 0, 4), (0, 0));
        assert_eq!(cursor_position("abcdef", 5, 4), (1, 1));
        assert_eq!(cursor_position("ab\ncd", 4, 4), (1, 1));
        // End of an exactly-full row stays on that row
        assert_eq!(cursor_position("abcd", 4, 4), (0, 4));
    }

    #[test]
    fn seed_greeting_renders_with_speaker_and_no_timestamp() {
        let conversation = Conversation::seeded();
        let mut lines = Vec::new();
        push_message_lines(&mut lines, &conversation.messages()[0], 40);

        assert_eq!(lines[0].spans[0].content, SPEAKER);
        let flat: String = lines
            .iter()
            .skip(1)
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.clone().into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        assert!(flat.trim().contains(GREETING));
        // No timestamp line: last line is the spacer
        assert_eq!(lines.last().unwrap().spans.len(), 0);
    }

    #[test]
    fn loading_dots_cycle_with_ticks() {
        let mut lines = Vec::new();
        push_loading_lines(&mut lines, 3);
        let label = lines[1].spans[0].content.clone().into_owned();
        assert_eq!(label, format!("{LOADING_LABEL}..."));
    }
}
