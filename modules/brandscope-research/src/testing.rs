// Test mocks for the research pipeline.
//
// One mock per trait boundary:
// - MockSearcher (WebSearcher) — scripted ranked hits or a hard failure
// - MockChat (ChatClient) — scripted completion text and stream chunks
// - MockJob (CollectJob) — per-platform write/fail/skip behavior, records launches
// - RecordingNotifier (ProgressNotifier) — in-memory event log
//
// Plus small helpers for states and search hits.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

use ai_client::{ChatClient, Prompt, StreamEvent};
use brandscope_common::{Platform, ProgressEvent, Subject};

use crate::collector::CollectJob;
use crate::notifier::ProgressNotifier;
use crate::searcher::{SearchHit, WebSearcher};
use crate::state::ResearchState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn state_for(name: &str) -> ResearchState {
    ResearchState::with_run_id(Subject::named(name), "test-run".to_string())
}

pub fn hits(urls: &[&str]) -> Vec<SearchHit> {
    urls.iter().map(|u| SearchHit::new(*u, "")).collect()
}

// ---------------------------------------------------------------------------
// MockSearcher
// ---------------------------------------------------------------------------

/// Returns the scripted hits for any query, or fails the search outright.
pub struct MockSearcher {
    results: Option<Vec<SearchHit>>,
}

impl MockSearcher {
    pub fn returning(results: Vec<SearchHit>) -> Self {
        Self {
            results: Some(results),
        }
    }

    pub fn failing() -> Self {
        Self { results: None }
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, _query: &str, _max_results: u32) -> Result<Vec<SearchHit>> {
        match &self.results {
            Some(results) => Ok(results.clone()),
            None => Err(anyhow!("search provider unreachable")),
        }
    }
}

// ---------------------------------------------------------------------------
// MockChat
// ---------------------------------------------------------------------------

/// Scripted generation provider. Unscripted shapes fail, which is exactly
/// what the fallback paths under test need.
pub struct MockChat {
    completion: Option<String>,
    stream_chunks: Option<Vec<String>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self {
            completion: None,
            stream_chunks: None,
        }
    }

    /// Script the non-streaming completion (pass 1).
    pub fn on_complete(mut self, text: impl Into<String>) -> Self {
        self.completion = Some(text.into());
        self
    }

    /// Script the streaming completion (pass 2) as a sequence of deltas.
    pub fn on_stream(mut self, chunks: &[&str]) -> Self {
        self.stream_chunks = Some(chunks.iter().map(|c| c.to_string()).collect());
        self
    }
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChat {
    async fn complete(&self, _prompt: &Prompt) -> Result<String> {
        match &self.completion {
            Some(text) => Ok(text.clone()),
            None => Err(anyhow!("generation provider unavailable")),
        }
    }

    async fn complete_streaming(
        &self,
        _prompt: &Prompt,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<()> {
        match &self.stream_chunks {
            Some(chunks) => {
                for chunk in chunks {
                    let _ = tx.send(StreamEvent::Token(chunk.clone())).await;
                }
                let _ = tx.send(StreamEvent::Done).await;
                Ok(())
            }
            None => Err(anyhow!("generation provider unavailable")),
        }
    }
}

// ---------------------------------------------------------------------------
// MockJob
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum JobBehavior {
    /// Exit zero after writing this artifact content.
    WriteArtifact(String),
    /// Exit non-zero without writing anything.
    FailExit,
    /// Exit zero but leave no artifact behind.
    ExitWithoutArtifact,
}

/// Per-platform scripted collection job. Records every launch so tests can
/// assert exactly which sources ran. Unscripted platforms fail.
pub struct MockJob {
    behaviors: HashMap<Platform, JobBehavior>,
    launched: Mutex<Vec<Platform>>,
}

impl MockJob {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            launched: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, platform: Platform, behavior: JobBehavior) -> Self {
        self.behaviors.insert(platform, behavior);
        self
    }

    pub fn launched(&self) -> Vec<Platform> {
        self.launched.lock().unwrap().clone()
    }
}

impl Default for MockJob {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectJob for MockJob {
    async fn run(&self, platform: Platform, _url: &str, artifact_path: &Path) -> Result<()> {
        self.launched.lock().unwrap().push(platform);
        match self.behaviors.get(&platform) {
            Some(JobBehavior::WriteArtifact(content)) => {
                if let Some(parent) = artifact_path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(artifact_path, content).await?;
                Ok(())
            }
            Some(JobBehavior::ExitWithoutArtifact) => Ok(()),
            Some(JobBehavior::FailExit) | None => {
                Err(anyhow!("{platform} job exited with status 1"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// Captures every event in delivery order.
pub struct RecordingNotifier {
    events: Mutex<Vec<(String, ProgressEvent)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<(String, ProgressEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn status_tags(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.status_tag())
            .collect()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressNotifier for RecordingNotifier {
    async fn notify(&self, run_id: &str, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap()
            .push((run_id.to_string(), event));
    }
}
