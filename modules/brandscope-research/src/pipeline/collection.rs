//! Collection — fan out to per-source jobs and record what came back.

use std::sync::Arc;

use async_trait::async_trait;

use brandscope_common::{Platform, ProgressEvent, RunStatus};

use crate::collector::CollectionRunner;
use crate::notifier::ProgressNotifier;
use crate::pipeline::{Stage, StageName, StageOutcome};
use crate::state::ResearchState;

pub struct Collection {
    runner: CollectionRunner,
    notifier: Arc<dyn ProgressNotifier>,
}

impl Collection {
    pub fn new(runner: CollectionRunner, notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self { runner, notifier }
    }
}

#[async_trait]
impl Stage for Collection {
    fn name(&self) -> StageName {
        StageName::Collection
    }

    async fn run(&self, state: &mut ResearchState) -> StageOutcome {
        state.status = RunStatus::Collecting;
        let name = state.subject_name().to_string();

        self.notifier
            .notify(
                &state.run_id,
                ProgressEvent::processing(
                    format!("Collecting scraped data for {name}"),
                    "Collecting",
                ),
            )
            .await;

        let launched = state.source_links.len();
        let artifacts = self.runner.run_all(&state.source_links).await;

        // Narrative summary, one line per platform we were asked about.
        let mut summary = vec![format!("Collecting scraped data for {name}:")];
        for platform in Platform::ALL {
            if !state.source_links.contains_key(&platform) {
                summary.push(format!("- {platform}: not discovered, skipped"));
            } else if artifacts.contains_key(&platform) {
                summary.push(format!("- {platform}: artifact collected"));
            } else {
                summary.push(format!("- {platform}: no data found"));
            }
        }
        state.append_log(summary.join("\n"));

        let collected = artifacts.len();
        state.artifacts = artifacts;

        if launched == 0 {
            StageOutcome::Ok
        } else if collected < launched {
            StageOutcome::Degraded(format!("{collected} of {launched} sources collected"))
        } else {
            StageOutcome::Ok
        }
    }
}
