// ABOUTME: Chat widget — renders chat messages into styled ratatui Lines.
// ABOUTME: Questions, role replies, system notes, and errors each have distinct styling.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::{ChatMessage, ChatMessageKind};

/// Colour for a role's header, stable per role name.
fn role_color(name: &str) -> Color {
    const PALETTE: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Blue, Color::Yellow];
    let sum: usize = name.bytes().map(usize::from).sum();
    PALETTE[sum % PALETTE.len()]
}

/// Render a slice of chat messages into styled Lines for display.
pub fn render_chat_lines(messages: &[ChatMessage]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        match &msg.kind {
            ChatMessageKind::User => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "❯ ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(msg.content.clone()),
                ]));
            }
            ChatMessageKind::Role { name } => {
                lines.push(Line::from(Span::styled(
                    format!("⏺ {}", name),
                    Style::default()
                        .fg(role_color(name))
                        .add_modifier(Modifier::BOLD),
                )));
                for text in msg.content.split('\n') {
                    lines.push(Line::from(Span::raw(format!("  {}", text))));
                }
            }
            ChatMessageKind::System => {
                for text in msg.content.split('\n') {
                    lines.push(Line::from(Span::styled(
                        text.to_string(),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
            }
            ChatMessageKind::Error => {
                lines.push(Line::from(Span::styled(
                    format!("⚠ {}", msg.content),
                    Style::default().fg(Color::Red),
                )));
            }
        }
    }

    lines
}
