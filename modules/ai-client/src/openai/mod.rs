mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::traits::{ChatClient, Prompt, StreamEvent};

use client::OpenAiClient;
use types::{ChatRequest, WireMessage};

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    temperature: Option<f32>,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature: Some(0.0),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    fn request(&self, prompt: &Prompt) -> ChatRequest {
        let mut request = ChatRequest::new(&self.model)
            .message(WireMessage::system(&prompt.system))
            .message(WireMessage::user(&prompt.user));
        if let Some(temp) = self.temperature {
            request = request.temperature(temp);
        }
        request
    }
}

#[async_trait]
impl ChatClient for OpenAi {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let response = self.client().chat(&self.request(prompt)).await?;
        response
            .text()
            .ok_or_else(|| anyhow!("No response from OpenAI"))
    }

    async fn complete_streaming(
        &self,
        prompt: &Prompt,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()> {
        let request = self.request(prompt).streaming();
        self.client().chat_stream(&request, tx).await
    }
}
