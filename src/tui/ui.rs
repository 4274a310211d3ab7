// ABOUTME: Main TUI rendering function — assembles header, chat, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::TuiState;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::status::{StatusBarParams, status_line};

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Chat area
            Constraint::Length(3), // Input area
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Header
    let header = Line::from(vec![
        Span::styled(
            " meeting-assistant ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} · {}", state.status.name, state.mode_label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // Chat area
    let chat_chunk = chunks[1];
    let visible_height = chat_chunk.height;
    let chat_paragraph =
        Paragraph::new(render_chat_lines(&state.messages)).wrap(Wrap { trim: false });

    // line_count matches ratatui's own wrapping, so the bottom of the chat is
    // never hidden by a scroll miscalculation.
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(visible_height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }
    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Input area
    let input_chunk = chunks[2];
    let mut input_block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    if state.busy {
        let title = if state.queued.is_some() {
            " line queued "
        } else {
            " consulting the panel... "
        };
        input_block = input_block.title(Span::styled(title, Style::default().fg(Color::DarkGray)));
    } else if state.input.is_empty() {
        input_block = input_block.title(Span::styled(
            " ask a question, or /help ",
            Style::default().fg(Color::DarkGray),
        ));
    }
    let input = Paragraph::new(Span::raw(state.input.clone())).block(input_block);
    frame.render_widget(input, input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();
        let prefix: String = state.input.chars().take(state.cursor_pos).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());
        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col) as u16);
        // +1 for the top border.
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        status: &state.status,
        thinking: state.thinking.as_deref(),
        busy: state.busy,
        queued: state.queued.is_some(),
    });
    frame.render_widget(Paragraph::new(status), chunks[3]);
}
