use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

// =============================================================================
// Prompt
// =============================================================================

/// One chat turn: a system preamble plus the user content.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

// =============================================================================
// StreamEvent
// =============================================================================

/// Incremental output from a streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One text delta, in emission order.
    Token(String),
    /// End of stream. Always sent last, even when the stream carried no tokens.
    Done,
}

// =============================================================================
// ChatClient
// =============================================================================

/// Generation-provider boundary. Two request shapes: a blocking completion
/// that returns the whole response, and a streaming completion that pushes
/// `StreamEvent`s to the caller's channel as deltas arrive.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Stream a completion into `tx`. Sends `StreamEvent::Done` after the
    /// provider's end marker. A dropped receiver is not an error.
    async fn complete_streaming(
        &self,
        prompt: &Prompt,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()>;
}
