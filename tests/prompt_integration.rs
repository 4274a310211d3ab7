// ABOUTME: Integration tests for the layered role prompt composer.
// ABOUTME: Verifies every history entry appears once, in order, with the question last.

use meeting_assistant::model::{HistoryEntry, RoleConfig};
use meeting_assistant::prompt::{Upstream, compose, compose_with_upstream, render_entry};

fn history(n: usize) -> Vec<HistoryEntry> {
    (0..n)
        .flat_map(|i| {
            let q = format!("question {}?", i);
            [
                HistoryEntry::question(q.clone()),
                HistoryEntry::reply(q, "Accountant", format!("answer {}", i)),
            ]
        })
        .collect()
}

#[test]
fn every_entry_rendered_once_in_order_then_question() {
    for n in [0, 1, 3, 7] {
        let entries = history(n);
        let prompt = compose(&RoleConfig::accountant(), "final?", &entries, None);

        let mut cursor = 0;
        for entry in &entries {
            let rendered = render_entry(entry);
            let found = prompt[cursor..]
                .find(&rendered)
                .unwrap_or_else(|| panic!("missing or out of order: {}", rendered));
            cursor += found + rendered.len();
            assert_eq!(prompt.matches(&rendered).count(), 1, "duplicated: {}", rendered);
        }
        let question = prompt.rfind("Question: final?").unwrap();
        assert!(question >= cursor, "question must follow every entry");
        assert!(prompt.ends_with("Question: final?"));
    }
}

#[test]
fn repeated_entries_are_not_deduplicated() {
    let entries = vec![
        HistoryEntry::question("same?"),
        HistoryEntry::question("same?"),
    ];
    let prompt = compose(&RoleConfig::accountant(), "q", &entries, None);
    assert_eq!(prompt.matches("User asked: same?").count(), 2);
}

#[test]
fn layers_separated_by_blank_lines_in_fixed_order() {
    let entries = history(1);
    let prompt = compose_with_upstream(
        &RoleConfig::lawyer(),
        "Sign it?",
        &entries,
        Some("=== lease.docx ===\nClause 4"),
        Some(Upstream {
            role: "Accountant",
            reply: "Cheap enough.",
        }),
    );

    let persona = prompt.find("You are Lawyer.").unwrap();
    let task = prompt.find("\n\nYour task: ").unwrap();
    let transcript = prompt.find("\n\nConversation so far:").unwrap();
    let documents = prompt.find("\n\nReference documents:").unwrap();
    let upstream = prompt.find("\n\nAccountant has already answered:").unwrap();
    let question = prompt.find("\n\nQuestion: Sign it?").unwrap();
    assert!(persona < task);
    assert!(task < transcript);
    assert!(transcript < documents);
    assert!(documents < upstream);
    assert!(upstream < question);
}

#[test]
fn composing_is_deterministic() {
    let entries = history(2);
    let a = compose(&RoleConfig::accountant(), "q", &entries, Some("ctx"));
    let b = compose(&RoleConfig::accountant(), "q", &entries, Some("ctx"));
    assert_eq!(a, b);
}
