use ferret_core::TeaserSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Character budget for a teaser, ellipsis included.
pub const DEFAULT_TEASER_BUDGET: usize = 300;

/// Content beyond this many chars is not sent to the service.
const MAX_CONTENT_CHARS: usize = 4000;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct Teaser {
    pub text: String,
    pub source: TeaserSource,
}

#[derive(Debug, Error)]
enum SummarizeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("service returned no summary text")]
    EmptyCompletion,
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Teaser strategy, picked once at configuration time: a remote
/// text-generation service when credentials exist, plain truncation when
/// they don't. The remote path still falls back to truncation per call, so
/// `summarize` always produces a teaser and never blocks past its timeout.
pub enum Summarizer {
    Remote(RemoteSummarizer),
    TruncateOnly { budget: usize },
}

impl Summarizer {
    pub fn remote(config: RemoteConfig, budget: usize) -> Result<Self, reqwest::Error> {
        Ok(Self::Remote(RemoteSummarizer::new(config, budget)?))
    }

    pub fn truncate_only(budget: usize) -> Self {
        Self::TruncateOnly { budget }
    }

    pub fn budget(&self) -> usize {
        match self {
            Self::Remote(remote) => remote.budget,
            Self::TruncateOnly { budget } => *budget,
        }
    }

    pub async fn summarize(&self, title: &str, body_text: &str) -> Teaser {
        match self {
            Self::Remote(remote) => match remote.generate(title, body_text).await {
                Ok(text) => Teaser {
                    text,
                    source: TeaserSource::Generated,
                },
                Err(err) => {
                    tracing::warn!(%title, error = %err, "summarization failed, truncating");
                    Teaser {
                        text: truncate_teaser(body_text, remote.budget),
                        source: TeaserSource::Truncated,
                    }
                }
            },
            Self::TruncateOnly { budget } => Teaser {
                text: truncate_teaser(body_text, *budget),
                source: TeaserSource::Truncated,
            },
        }
    }
}

pub struct RemoteSummarizer {
    client: reqwest::Client,
    config: RemoteConfig,
    budget: usize,
}

impl RemoteSummarizer {
    fn new(config: RemoteConfig, budget: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            budget,
        })
    }

    async fn generate(&self, title: &str, body_text: &str) -> Result<String, SummarizeError> {
        let content: String = body_text.chars().take(MAX_CONTENT_CHARS).collect();
        let user_prompt = format!("Summarize the content of the page titled {title}: {content}");
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You write one-sentence teaser summaries of web pages \
                              for a search results list. Plain text only.",
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SummarizeError::Status(resp.status().as_u16()));
        }

        let parsed: ChatResponse = resp.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(SummarizeError::EmptyCompletion)?;
        Ok(text)
    }
}

/// Truncate `body_text` to `budget` chars at a word boundary, appending an
/// ellipsis. Total length never exceeds the budget, and any input produces
/// a teaser: empty text gives an empty teaser.
pub fn truncate_teaser(body_text: &str, budget: usize) -> String {
    let text = body_text.trim();
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let max_text = budget.saturating_sub(ELLIPSIS.len());
    let byte_end = text
        .char_indices()
        .nth(max_text)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let slice = &text[..byte_end];
    let cut = match slice.rfind(char::is_whitespace) {
        Some(idx) if !slice[..idx].trim().is_empty() => idx,
        // one unbroken word longer than the budget: hard cut
        _ => byte_end,
    };
    let mut teaser = slice[..cut].trim_end().to_string();
    teaser.push_str(ELLIPSIS);
    teaser
}
