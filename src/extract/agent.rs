//! Agent-based extraction
//!
//! The agent is an external collaborator: it receives rendered instructions
//! and a [`PageSource`] it can pull minimized page HTML from, and answers with
//! a document we keep as opaque JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Placeholder replaced by the seed URL when a template is rendered
pub const URL_PLACEHOLDER: &str = "{url}";

/// Instructions used when the configuration does not supply a template
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Extract product URLs in JSON format from the website at {url}.\n\n\
Return a list of all product page URLs found on the site in JSON format without any additional text.";

/// Errors reported by an extraction agent
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("No extraction agent configured")]
    NotConfigured,

    #[error("Agent failed: {0}")]
    Failed(String),
}

/// Something an agent can read minimized page HTML from
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Minimized HTML for `url`, or `None` if it could not be fetched
    async fn page_html(&self, url: &str) -> Option<String>;
}

/// An LLM-driven extraction agent
#[async_trait]
pub trait ExtractionAgent: Send + Sync {
    /// Runs the agent to completion and returns its final output text
    async fn run(&self, instructions: &str, pages: &dyn PageSource) -> Result<String, AgentError>;
}

/// Instructions for the agent, with a `{url}` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitutes every `{url}` with `url`
    pub fn render(&self, url: &str) -> String {
        self.0.replace(URL_PLACEHOLDER, url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT_TEMPLATE)
    }
}

/// What an agent returned
///
/// Output that parses as JSON is kept as parsed; anything else is kept as a
/// JSON string holding the raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AgentOutput(Value);

impl AgentOutput {
    pub fn from_raw(raw: &str) -> Self {
        match serde_json::from_str(raw.trim()) {
            Ok(value) => Self(value),
            Err(_) => {
                tracing::debug!("Agent output is not JSON, keeping it as text");
                Self(Value::String(raw.to_string()))
            }
        }
    }

    /// Returns true if the output was valid JSON
    pub fn is_structured(&self) -> bool {
        !self.0.is_string()
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Renders the template for `seed` and runs `agent` against `pages`
///
/// # Returns
///
/// * `Ok(AgentOutput)` - The agent's answer
/// * `Err(AgentError)` - The agent failed
pub async fn run_agent(
    agent: &dyn ExtractionAgent,
    template: &PromptTemplate,
    seed: &str,
    pages: &dyn PageSource,
) -> Result<AgentOutput, AgentError> {
    let instructions = template.render(seed);
    tracing::info!("Running extraction agent for {}", seed);

    let raw = agent.run(&instructions, pages).await?;
    let output = AgentOutput::from_raw(&raw);

    tracing::info!(
        "Agent finished for {} ({} output)",
        seed,
        if output.is_structured() { "JSON" } else { "text" }
    );
    Ok(output)
}
