// ABOUTME: Two-step consultation pipeline — first role answers, second role builds on that answer.
// ABOUTME: Steps are explicit functions joined by the FirstOpinion value; nothing runs in parallel.

use async_trait::async_trait;

use crate::agent::provider::{Binding, ProviderSet, invoke};
use crate::config::Config;
use crate::error::MeetingError;
use crate::model::{HistoryEntry, RoleConfig, Seat};
use crate::prompt::{self, Upstream};

/// What happened to one role for one question.
#[derive(Debug)]
pub enum Verdict {
    Answered(String),
    Failed(MeetingError),
    /// Not consulted because the role it depends on did not answer.
    Skipped { waiting_on: String },
}

/// One role's result for one question.
#[derive(Debug)]
pub struct RoleOutcome {
    pub seat: Seat,
    pub role: String,
    pub verdict: Verdict,
}

impl RoleOutcome {
    pub fn reply(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Answered(text) => Some(text),
            _ => None,
        }
    }
}

/// Result of the first step, handed to the second step.
#[derive(Debug)]
pub struct FirstOpinion {
    pub outcome: RoleOutcome,
}

impl FirstOpinion {
    fn upstream(&self) -> Option<Upstream<'_>> {
        self.outcome.reply().map(|reply| Upstream {
            role: &self.outcome.role,
            reply,
        })
    }
}

/// Everything one question produced.
#[derive(Debug)]
pub struct Exchange {
    pub question: String,
    pub first: RoleOutcome,
    pub second: Option<RoleOutcome>,
}

impl Exchange {
    pub fn outcomes(&self) -> impl Iterator<Item = &RoleOutcome> {
        std::iter::once(&self.first).chain(self.second.iter())
    }

    /// History entries this exchange appends: the question, then one entry
    /// per role that answered.
    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        let mut entries = vec![HistoryEntry::question(&self.question)];
        for outcome in self.outcomes() {
            if let Some(reply) = outcome.reply() {
                entries.push(HistoryEntry::reply(&self.question, &outcome.role, reply));
            }
        }
        entries
    }
}

/// Progress of one consultation, reported as it happens.
#[derive(Debug)]
pub enum Step<'a> {
    /// A role's provider call is about to be issued.
    Started {
        seat: Seat,
        role: &'a str,
        provider: String,
    },
    /// A role answered, failed, or was skipped.
    Finished(&'a RoleOutcome),
}

/// Receives [`Step`]s while [`Panel::consult`] runs.
#[async_trait]
pub trait Observer: Send + Sync {
    async fn step(&self, step: Step<'_>);
}

/// Inputs shared by both steps of one consultation.
#[derive(Debug, Clone, Copy)]
pub struct Consultation<'a> {
    pub question: &'a str,
    pub history: &'a [HistoryEntry],
    pub context: Option<&'a str>,
}

/// The seated providers: always a first seat, optionally a second.
#[derive(Debug, Clone)]
pub struct Panel {
    first: Binding,
    second: Option<Binding>,
}

impl Panel {
    pub fn new(first: Binding, second: Option<Binding>) -> Self {
        Self { first, second }
    }

    /// Bind each seat to its configured provider once, at startup.
    pub fn seat(config: &Config, providers: &ProviderSet, single_role: bool) -> Self {
        let first = providers.bind(&config.roles.first.name, &config.roles.first_provider);
        let second = (!single_role)
            .then(|| providers.bind(&config.roles.second.name, &config.roles.second_provider));
        Self { first, second }
    }

    pub fn binding(&self, seat: Seat) -> Option<&Binding> {
        match seat {
            Seat::First => Some(&self.first),
            Seat::Second => self.second.as_ref(),
        }
    }

    pub fn is_single(&self) -> bool {
        self.second.is_none()
    }

    /// Step one: consult the first role.
    pub async fn first_opinion(&self, role: &RoleConfig, request: Consultation<'_>) -> FirstOpinion {
        let prompt = prompt::compose(role, request.question, request.history, request.context);
        FirstOpinion {
            outcome: consult_role(Seat::First, role, &prompt, &self.first).await,
        }
    }

    /// Step two: consult the second role with the first role's complete
    /// answer in its prompt. Returns `None` when no second seat exists.
    pub async fn second_opinion(
        &self,
        role: &RoleConfig,
        first: &FirstOpinion,
        request: Consultation<'_>,
    ) -> Option<RoleOutcome> {
        let binding = self.second.as_ref()?;
        let Some(upstream) = first.upstream() else {
            return Some(RoleOutcome {
                seat: Seat::Second,
                role: role.name.clone(),
                verdict: Verdict::Skipped {
                    waiting_on: first.outcome.role.clone(),
                },
            });
        };
        let prompt = prompt::compose_with_upstream(
            role,
            request.question,
            request.history,
            request.context,
            Some(upstream),
        );
        Some(consult_role(Seat::Second, role, &prompt, binding).await)
    }

    /// Run both steps in order. The second role is announced only when it
    /// will actually be consulted.
    pub async fn consult(
        &self,
        first_role: &RoleConfig,
        second_role: &RoleConfig,
        request: Consultation<'_>,
        observer: &dyn Observer,
    ) -> Exchange {
        observer
            .step(Step::Started {
                seat: Seat::First,
                role: &first_role.name,
                provider: self.first.label(),
            })
            .await;
        let first = self.first_opinion(first_role, request).await;
        observer.step(Step::Finished(&first.outcome)).await;

        if let Some(binding) = &self.second
            && first.outcome.reply().is_some()
        {
            observer
                .step(Step::Started {
                    seat: Seat::Second,
                    role: &second_role.name,
                    provider: binding.label(),
                })
                .await;
        }
        let second = self.second_opinion(second_role, &first, request).await;
        if let Some(outcome) = &second {
            observer.step(Step::Finished(outcome)).await;
        }

        Exchange {
            question: request.question.to_string(),
            first: first.outcome,
            second,
        }
    }
}

async fn consult_role(seat: Seat, role: &RoleConfig, prompt: &str, binding: &Binding) -> RoleOutcome {
    let verdict = if !role.is_complete() {
        let label = if role.name.trim().is_empty() {
            format!("seat {}", seat.number())
        } else {
            role.name.clone()
        };
        Verdict::Failed(MeetingError::configuration(
            label,
            "name and task must not be empty",
        ))
    } else {
        match invoke(&role.name, prompt, binding).await {
            Ok(text) => Verdict::Answered(text),
            Err(e) => Verdict::Failed(e),
        }
    };
    RoleOutcome {
        seat,
        role: role.name.clone(),
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_entries_skip_failed_roles() {
        let exchange = Exchange {
            question: "A?".to_string(),
            first: RoleOutcome {
                seat: Seat::First,
                role: "CFO".to_string(),
                verdict: Verdict::Answered("B".to_string()),
            },
            second: Some(RoleOutcome {
                seat: Seat::Second,
                role: "Counsel".to_string(),
                verdict: Verdict::Failed(MeetingError::provider("gemini", "HTTP 500")),
            }),
        };
        let entries = exchange.history_entries();
        assert_eq!(
            entries,
            vec![HistoryEntry::question("A?"), HistoryEntry::reply("A?", "CFO", "B")]
        );
    }

    #[tokio::test]
    async fn incomplete_role_fails_without_calling_provider() {
        let panel = Panel::new(
            Binding::Unavailable {
                provider: "openai".to_string(),
                reason: "unused".to_string(),
            },
            None,
        );
        let role = RoleConfig::new("", "", "");
        let first = panel
            .first_opinion(
                &role,
                Consultation {
                    question: "q",
                    history: &[],
                    context: None,
                },
            )
            .await;
        match first.outcome.verdict {
            Verdict::Failed(MeetingError::Configuration { role, reason }) => {
                assert_eq!(role, "seat 1");
                assert!(reason.contains("must not be empty"));
            }
            other => panic!("expected configuration failure, got {:?}", other),
        }
        assert!(panel.is_single());
    }
}
