// ABOUTME: Status bar widget — meeting name and mode, seated roles with providers, busy indicator.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::agent::r#loop::MeetingStatus;
use crate::session::MeetingMode;

/// Inputs for [`status_line`].
pub struct StatusBarParams<'a> {
    pub status: &'a MeetingStatus,
    pub thinking: Option<&'a str>,
    pub busy: bool,
    pub queued: bool,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let white = Style::default().fg(Color::White);
    let status = params.status;

    let mode = match status.mode {
        MeetingMode::New => "new",
        MeetingMode::Loaded => "loaded",
    };
    let mut spans = vec![
        Span::styled(format!(" {} ", status.name), Style::default().fg(Color::Cyan)),
        Span::styled(format!("({}) ", mode), dim),
        Span::styled("| ", dim),
        Span::styled(
            format!("1: {} [{}] ", status.first_role, status.first_provider),
            white,
        ),
    ];
    match &status.second_role {
        Some((role, provider)) => spans.push(Span::styled(
            format!("2: {} [{}] ", role, provider),
            white,
        )),
        None => spans.push(Span::styled("single-role ", dim)),
    }
    if status.attachments > 0 {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(format!("{} docs ", status.attachments), white));
    }

    if params.busy {
        spans.push(Span::styled("| ", dim));
        let label = match params.thinking {
            Some(who) => format!("{} is thinking... ", who),
            None => "working... ".to_string(),
        };
        spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
        if params.queued {
            spans.push(Span::styled("(1 queued) ", dim));
        }
    }

    Line::from(spans)
}
