//! The fixed, linear stage sequence: Grounding → Discovery → Collection →
//! Synthesis. Exactly one pass per run, no branching, no retry at this
//! level. Failures are contained per-stage and recorded in state — partial
//! reputational data is still useful, so the pipeline always runs to the
//! terminal stage.

pub mod collection;
pub mod discovery;
pub mod grounding;
pub mod synthesis;


use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use tracing::{info, warn};

use brandscope_common::ProgressEvent;

use crate::notifier::ProgressNotifier;
use crate::state::ResearchState;

// ---------------------------------------------------------------------------
// Stage contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    Grounding,
    Discovery,
    Collection,
    Synthesis,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Grounding => "Grounding",
            StageName::Discovery => "Discovery",
            StageName::Collection => "Collection",
            StageName::Synthesis => "Synthesis",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a stage reports back. Stages never raise past their own boundary:
/// anything that went wrong is absorbed into state and surfaced here as a
/// tagged outcome instead of an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Ok,
    /// The stage completed with reduced data (e.g. search provider down).
    Degraded(String),
    /// The stage could not produce its output at all. The run still
    /// continues to the next stage boundary.
    Failed(String),
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> StageName;
    async fn run(&self, state: &mut ResearchState) -> StageOutcome;
}

/// State as observed at one stage boundary.
#[derive(Debug, Clone)]
pub struct StageSnapshot {
    pub stage: StageName,
    pub outcome: StageOutcome,
    pub state: ResearchState,
}

// ---------------------------------------------------------------------------
// Pipeline driver
// ---------------------------------------------------------------------------

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    notifier: Arc<dyn ProgressNotifier>,
}

impl Pipeline {
    pub fn new(notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self {
            stages: Vec::new(),
            notifier,
        }
    }

    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    async fn step(&self, stage: &dyn Stage, state: &mut ResearchState) -> StageOutcome {
        let name = stage.name();
        self.notifier
            .notify(
                &state.run_id,
                ProgressEvent::processing(
                    format!("Running {name} for {}", state.subject_name()),
                    name.as_str(),
                ),
            )
            .await;

        let outcome = stage.run(state).await;
        match &outcome {
            StageOutcome::Ok => info!(stage = %name, "Stage complete"),
            StageOutcome::Degraded(reason) => {
                warn!(stage = %name, reason, "Stage degraded");
                state.append_log(format!("{name} degraded: {reason}"));
            }
            StageOutcome::Failed(reason) => {
                warn!(stage = %name, reason, "Stage failed");
                state.append_log(format!("{name} failed: {reason}"));
            }
        }
        outcome
    }

    /// Drive the state through every stage, yielding a snapshot at each
    /// stage boundary. Lazy: nothing runs until the stream is polled.
    pub fn execute(self, mut state: ResearchState) -> impl Stream<Item = StageSnapshot> {
        async_stream::stream! {
            for stage in &self.stages {
                let outcome = self.step(stage.as_ref(), &mut state).await;
                yield StageSnapshot {
                    stage: stage.name(),
                    outcome,
                    state: state.clone(),
                };
            }
        }
    }

    /// Run every stage and return the final state, without snapshot
    /// observation.
    pub async fn run(self, mut state: ResearchState) -> ResearchState {
        for stage in &self.stages {
            self.step(stage.as_ref(), &mut state).await;
        }
        state
    }
}
