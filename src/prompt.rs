// ABOUTME: Layered prompt composer — assembles persona, task, transcript, documents, and question.
// ABOUTME: Output is deterministic; nothing is escaped, truncated, or deduplicated.

use crate::model::{HistoryEntry, RoleConfig};

/// Placeholder in a task instruction that is replaced by the user's question.
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// Output of an earlier role that a dependent role must take into account.
#[derive(Debug, Clone, Copy)]
pub struct Upstream<'a> {
    pub role: &'a str,
    pub reply: &'a str,
}

/// Compose the prompt for one role.
pub fn compose(
    role: &RoleConfig,
    question: &str,
    history: &[HistoryEntry],
    extra_context: Option<&str>,
) -> String {
    PromptBuilder::new(role, question)
        .history(history)
        .documents(extra_context)
        .build()
}

/// Compose the prompt for a role that follows another role's answer.
pub fn compose_with_upstream(
    role: &RoleConfig,
    question: &str,
    history: &[HistoryEntry],
    extra_context: Option<&str>,
    upstream: Option<Upstream<'_>>,
) -> String {
    PromptBuilder::new(role, question)
        .history(history)
        .documents(extra_context)
        .upstream(upstream)
        .build()
}

/// Render one history entry the way it appears in a prompt.
pub fn render_entry(entry: &HistoryEntry) -> String {
    if entry.is_question() {
        format!("User asked: {}", entry.user)
    } else {
        format!("{} replied: {}", entry.agent, entry.reply)
    }
}

/// Assembles a prompt from layers. Empty layers are skipped and the rest are
/// joined by a blank line; the question layer always comes last.
#[derive(Debug, Clone)]
pub struct PromptBuilder<'a> {
    role: &'a RoleConfig,
    question: &'a str,
    history: &'a [HistoryEntry],
    documents: Option<&'a str>,
    upstream: Option<Upstream<'a>>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(role: &'a RoleConfig, question: &'a str) -> Self {
        Self {
            role,
            question,
            history: &[],
            documents: None,
            upstream: None,
        }
    }

    pub fn history(mut self, history: &'a [HistoryEntry]) -> Self {
        self.history = history;
        self
    }

    pub fn documents(mut self, documents: Option<&'a str>) -> Self {
        self.documents = documents;
        self
    }

    pub fn upstream(mut self, upstream: Option<Upstream<'a>>) -> Self {
        self.upstream = upstream;
        self
    }

    fn persona_layer(&self) -> String {
        let mut layer = format!("You are {}.", self.role.name.trim());
        if !self.role.backstory.trim().is_empty() {
            layer.push(' ');
            layer.push_str(self.role.backstory.trim());
        }
        layer
    }

    fn task_layer(&self) -> String {
        let task = self.role.task_instruction.trim();
        if task.is_empty() {
            return String::new();
        }
        format!("Your task: {}", task.replace(QUESTION_PLACEHOLDER, self.question))
    }

    fn transcript_layer(&self) -> String {
        if self.history.is_empty() {
            return String::new();
        }
        let mut layer = String::from("Conversation so far:");
        for entry in self.history {
            layer.push('\n');
            layer.push_str(&render_entry(entry));
        }
        layer
    }

    fn documents_layer(&self) -> String {
        match self.documents {
            Some(text) if !text.trim().is_empty() => format!("Reference documents:\n{}", text),
            _ => String::new(),
        }
    }

    fn upstream_layer(&self) -> String {
        match self.upstream {
            Some(up) => format!("{} has already answered:\n{}", up.role, up.reply),
            None => String::new(),
        }
    }

    /// Concatenates all non-empty layers separated by `"\n\n"`.
    pub fn build(&self) -> String {
        let layers = [
            self.persona_layer(),
            self.task_layer(),
            self.transcript_layer(),
            self.documents_layer(),
            self.upstream_layer(),
            format!("Question: {}", self.question),
        ];

        layers
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfo() -> RoleConfig {
        RoleConfig::new("CFO", "Guards the budget.", "Assess {question} financially.")
    }

    #[test]
    fn persona_and_backstory_come_first() {
        let prompt = compose(&cfo(), "Should we hire?", &[], None);
        assert!(prompt.starts_with("You are CFO. Guards the budget."));
    }

    #[test]
    fn task_placeholder_is_substituted() {
        let prompt = compose(&cfo(), "Should we hire?", &[], None);
        assert!(prompt.contains("Your task: Assess Should we hire? financially."));
        assert!(!prompt.contains(QUESTION_PLACEHOLDER));
    }

    #[test]
    fn question_is_last_layer() {
        let history = vec![HistoryEntry::question("old?")];
        let prompt = compose(&cfo(), "new?", &history, Some("doc text"));
        assert!(prompt.ends_with("Question: new?"));
    }

    #[test]
    fn empty_history_has_no_transcript_header() {
        let prompt = compose(&cfo(), "q", &[], None);
        assert!(!prompt.contains("Conversation so far:"));
    }

    #[test]
    fn blank_documents_are_skipped() {
        let prompt = compose(&cfo(), "q", &[], Some("   "));
        assert!(!prompt.contains("Reference documents:"));
    }

    #[test]
    fn documents_embedded_verbatim() {
        let prompt = compose(&cfo(), "q", &[], Some("=== a.pdf ===\n<b>raw</b>"));
        assert!(prompt.contains("Reference documents:\n=== a.pdf ===\n<b>raw</b>"));
    }

    #[test]
    fn upstream_reply_precedes_question() {
        let prompt = compose_with_upstream(
            &RoleConfig::lawyer(),
            "q",
            &[],
            None,
            Some(Upstream {
                role: "Accountant",
                reply: "Costs are high.",
            }),
        );
        let up = prompt.find("Accountant has already answered:\nCosts are high.").unwrap();
        let q = prompt.find("Question: q").unwrap();
        assert!(up < q);
    }

    #[test]
    fn render_entry_distinguishes_sentinel() {
        assert_eq!(render_entry(&HistoryEntry::question("A?")), "User asked: A?");
        assert_eq!(
            render_entry(&HistoryEntry::reply("A?", "CFO", "B")),
            "CFO replied: B"
        );
    }
}
