// ABOUTME: LLM provider factory — the completion client trait and per-role bindings.
// ABOUTME: Builds clients from environment credentials; a missing key leaves the role unavailable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::agent::gemini::GeminiClient;
use crate::agent::openai::OpenAiClient;
use crate::config::{Config, ProviderSettings, ProvidersConfig};
use crate::error::{MeetingError, Result};

/// A hosted model that turns one prompt into one completion.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name as used in config (e.g. `openai`).
    fn provider(&self) -> &str;

    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    /// Send a single prompt and return the raw text response.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// The provider handle a role is bound to.
#[derive(Clone)]
pub enum Binding {
    Ready(Arc<dyn LlmClient>),
    Unavailable { provider: String, reason: String },
}

impl Binding {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Short `provider/model` label for status displays.
    pub fn label(&self) -> String {
        match self {
            Self::Ready(client) => format!("{}/{}", client.provider(), client.model()),
            Self::Unavailable { provider, .. } => format!("{} (unavailable)", provider),
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(client) => f
                .debug_struct("Ready")
                .field("provider", &client.provider())
                .field("model", &client.model())
                .finish(),
            Self::Unavailable { provider, reason } => f
                .debug_struct("Unavailable")
                .field("provider", provider)
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Send `prompt` for `role_name` through `binding`.
///
/// An unavailable binding fails with [`MeetingError::Configuration`] before
/// anything is sent. Provider failures are returned as-is: no retry, no
/// fallback, no timeout beyond the HTTP client's own.
pub async fn invoke(role_name: &str, prompt: &str, binding: &Binding) -> Result<String> {
    match binding {
        Binding::Unavailable { provider, reason } => Err(MeetingError::configuration(
            role_name,
            format!("{provider}: {reason}"),
        )),
        Binding::Ready(client) => {
            info!(
                role = role_name,
                provider = client.provider(),
                model = client.model(),
                prompt_chars = prompt.chars().count(),
                "requesting completion"
            );
            let reply = client.complete(prompt).await;
            match &reply {
                Ok(text) => {
                    info!(role = role_name, reply_chars = text.chars().count(), "completion received")
                }
                Err(e) => warn!(role = role_name, error = %e, "completion failed"),
            }
            reply
        }
    }
}

/// Create a client for the named provider using the given credential.
pub fn create_client(settings: &ProviderSettings, api_key: String) -> Result<Arc<dyn LlmClient>> {
    let http = reqwest::Client::new();
    match settings.name.as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::new(http, settings, api_key))),
        "gemini" => Ok(Arc::new(GeminiClient::new(http, settings, api_key))),
        other => Err(MeetingError::configuration(
            other,
            format!(
                "unknown LLM provider '{}'. Expected one of: {}",
                other,
                ProvidersConfig::KNOWN.join(", ")
            ),
        )),
    }
}

/// One binding per known provider, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ProviderSet {
    bindings: HashMap<String, Binding>,
    fallback: Option<String>,
}

impl ProviderSet {
    /// Build bindings from credentials in the process environment.
    pub fn from_env(config: &Config) -> Self {
        Self::from_lookup(config, |var| std::env::var(var).ok())
    }

    /// Build bindings with an explicit credential lookup (for testing).
    pub fn from_lookup(config: &Config, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut bindings = HashMap::new();
        for name in ProvidersConfig::KNOWN {
            let Some(settings) = config.providers.resolve(name) else {
                continue;
            };
            let binding = match lookup(&settings.api_key_env).filter(|k| !k.trim().is_empty()) {
                Some(key) => match create_client(&settings, key) {
                    Ok(client) => Binding::Ready(client),
                    Err(e) => Binding::Unavailable {
                        provider: name.to_string(),
                        reason: e.to_string(),
                    },
                },
                None => {
                    warn!(
                        provider = name,
                        env = %settings.api_key_env,
                        "credential not found; roles bound to this provider are unavailable"
                    );
                    Binding::Unavailable {
                        provider: name.to_string(),
                        reason: format!("{} is not set", settings.api_key_env),
                    }
                }
            };
            bindings.insert(name.to_string(), binding);
        }
        Self {
            bindings,
            fallback: config.providers.fallback.clone(),
        }
    }

    /// Register a binding directly.
    pub fn insert(&mut self, provider: impl Into<String>, binding: Binding) {
        self.bindings.insert(provider.into(), binding);
    }

    pub fn with_fallback(mut self, fallback: Option<String>) -> Self {
        self.fallback = fallback;
        self
    }

    /// All bindings, sorted by provider name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Binding)> {
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Resolve the binding for a seat backed by `provider`.
    ///
    /// When that provider is unavailable and a ready fallback is configured,
    /// the fallback is returned instead and the swap is logged. Callers do
    /// this once when seating roles, so the swap never happens per call.
    pub fn bind(&self, role_name: &str, provider: &str) -> Binding {
        let primary = self.bindings.get(provider).cloned().unwrap_or_else(|| {
            Binding::Unavailable {
                provider: provider.to_string(),
                reason: format!(
                    "unknown LLM provider '{}'. Expected one of: {}",
                    provider,
                    ProvidersConfig::KNOWN.join(", ")
                ),
            }
        });
        if primary.is_ready() {
            return primary;
        }
        if let Some(fallback) = self.fallback.as_deref().filter(|f| *f != provider)
            && let Some(binding) = self.bindings.get(fallback)
            && binding.is_ready()
        {
            warn!(
                role = role_name,
                preferred = provider,
                fallback,
                "preferred provider unavailable at startup; using fallback"
            );
            return binding.clone();
        }
        primary
    }
}
