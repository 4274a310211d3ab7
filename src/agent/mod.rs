// ABOUTME: Agent module — provider clients, the two-step consultation pipeline, and the meeting worker.
// ABOUTME: Everything that talks to a hosted LLM goes through the LlmClient trait in provider.

pub mod gemini;
pub mod r#loop;
pub mod openai;
pub mod pipeline;
pub mod provider;

pub use pipeline::{Consultation, Exchange, FirstOpinion, Observer, Panel, RoleOutcome, Step, Verdict};
pub use provider::{Binding, LlmClient, ProviderSet, create_client, invoke};
pub use r#loop::{AgentEvent, MeetingDesk, MeetingStatus, UserEvent, run_meeting_loop};
