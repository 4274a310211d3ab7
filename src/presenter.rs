// ABOUTME: Reply presenter — turns exchanges and history into the text both front ends display.
// ABOUTME: Combined replies, the numbered transcript, role summaries, and troubleshooting hints.

use crate::agent::pipeline::{Exchange, RoleOutcome, Verdict};
use crate::error::MeetingError;
use crate::model::{HistoryEntry, RoleConfig, Seat};

/// Separator between role sections in a combined reply.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// One line describing a role outcome that produced no reply.
pub fn outcome_notice(outcome: &RoleOutcome) -> Option<String> {
    match &outcome.verdict {
        Verdict::Answered(_) => None,
        Verdict::Failed(e) => Some(format!("{} could not answer: {}", outcome.role, e)),
        Verdict::Skipped { waiting_on } => Some(format!(
            "{} skipped: waiting on {}, which did not answer",
            outcome.role, waiting_on
        )),
    }
}

/// The combined reply for one exchange: one `## role` section per answering
/// role, in seat order. Roles that did not answer contribute their notice.
pub fn combined_reply(exchange: &Exchange) -> String {
    exchange
        .outcomes()
        .map(|outcome| match outcome.reply() {
            Some(reply) => format!("## {}\n{}", outcome.role, reply),
            None => format!(
                "## {}\n{}",
                outcome.role,
                outcome_notice(outcome).unwrap_or_default()
            ),
        })
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Number the history by question: each question followed by its replies.
pub fn transcript(history: &[HistoryEntry]) -> String {
    let mut out = String::new();
    let mut index = 0;
    for entry in history {
        if entry.is_question() {
            index += 1;
            if index > 1 {
                out.push('\n');
            }
            out.push_str(&format!("{}. Question: {}\n", index, entry.user));
        } else {
            out.push_str(&format!("   {}: {}\n", entry.agent, entry.reply));
        }
    }
    out
}

/// A short description of both seats.
pub fn describe_roles(first: &RoleConfig, second: Option<&RoleConfig>) -> String {
    let mut lines = vec![describe_role(Seat::First, first)];
    match second {
        Some(role) => lines.push(describe_role(Seat::Second, role)),
        None => lines.push("Role 2: (single-role mode)".to_string()),
    }
    lines.join("\n\n")
}

fn describe_role(seat: Seat, role: &RoleConfig) -> String {
    format!(
        "Role {}: {}\n  backstory: {}\n  task: {}",
        seat.number(),
        if role.name.is_empty() { "(unnamed)" } else { role.name.as_str() },
        role.backstory,
        role.task_instruction
    )
}

/// Troubleshooting hints shown under a failure in the plain CLI.
pub fn hints(error: &MeetingError) -> &'static [&'static str] {
    match error {
        MeetingError::Configuration { .. } => &[
            "Check that OPENAI_API_KEY and GOOGLE_API_KEY are set in .env",
            "Check that both roles have a name and a task (/roles)",
        ],
        MeetingError::Provider { .. } => &[
            "Check the API keys in your .env file",
            "Check your network connection",
            "Make sure the API key has enough quota left",
        ],
        MeetingError::Parse { .. } => &["The file may be truncated or not valid JSON"],
        MeetingError::SessionNotFound(_) => &["Use /list to see saved meetings"],
        MeetingError::Io(_) => &["Check that the data directory is writable"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(seat: Seat, role: &str, reply: &str) -> RoleOutcome {
        RoleOutcome {
            seat,
            role: role.to_string(),
            verdict: Verdict::Answered(reply.to_string()),
        }
    }

    #[test]
    fn combined_reply_has_one_section_per_role() {
        let exchange = Exchange {
            question: "Lease the van?".to_string(),
            first: answered(Seat::First, "Accountant", "Leasing saves cash."),
            second: Some(answered(Seat::Second, "Lawyer", "Read clause 4.")),
        };
        assert_eq!(
            combined_reply(&exchange),
            "## Accountant\nLeasing saves cash.\n\n---\n\n## Lawyer\nRead clause 4."
        );
    }

    #[test]
    fn combined_reply_reports_failures_inline() {
        let exchange = Exchange {
            question: "q".to_string(),
            first: RoleOutcome {
                seat: Seat::First,
                role: "Accountant".to_string(),
                verdict: Verdict::Failed(MeetingError::provider("openai", "HTTP 429: quota")),
            },
            second: Some(RoleOutcome {
                seat: Seat::Second,
                role: "Lawyer".to_string(),
                verdict: Verdict::Skipped {
                    waiting_on: "Accountant".to_string(),
                },
            }),
        };
        let text = combined_reply(&exchange);
        assert!(text.contains("Accountant could not answer"));
        assert!(text.contains("HTTP 429"));
        assert!(text.contains("Lawyer skipped: waiting on Accountant"));
    }

    #[test]
    fn transcript_numbers_questions() {
        let history = vec![
            HistoryEntry::question("A?"),
            HistoryEntry::reply("A?", "CFO", "B"),
            HistoryEntry::reply("A?", "Counsel", "C"),
            HistoryEntry::question("D?"),
        ];
        assert_eq!(
            transcript(&history),
            "1. Question: A?\n   CFO: B\n   Counsel: C\n\n2. Question: D?\n"
        );
        assert_eq!(transcript(&[]), "");
    }

    #[test]
    fn provider_errors_get_network_and_quota_hints() {
        let hints = hints(&MeetingError::provider("gemini", "timeout"));
        assert_eq!(hints.len(), 3);
        assert!(hints.iter().any(|h| h.contains("quota")));
    }
}
