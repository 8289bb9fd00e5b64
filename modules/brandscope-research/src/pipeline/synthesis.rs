//! Synthesis — run the two-pass editor and settle the run's terminal state.
//!
//! The terminal notification always fires from here: `editor_complete` with
//! the full report on success, `error` when both passes came back empty.

use std::sync::Arc;

use async_trait::async_trait;

use brandscope_common::{ProgressEvent, RunStatus};

use crate::editor::ReportEditor;
use crate::notifier::ProgressNotifier;
use crate::pipeline::{Stage, StageName, StageOutcome};
use crate::state::ResearchState;

pub struct Synthesis {
    editor: ReportEditor,
    notifier: Arc<dyn ProgressNotifier>,
}

impl Synthesis {
    pub fn new(editor: ReportEditor, notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self { editor, notifier }
    }
}

#[async_trait]
impl Stage for Synthesis {
    fn name(&self) -> StageName {
        StageName::Synthesis
    }

    async fn run(&self, state: &mut ResearchState) -> StageOutcome {
        state.status = RunStatus::Synthesizing;
        let name = state.subject_name().to_string();

        let report = self.editor.synthesize(state).await;

        if report.is_empty() {
            state.report.clear();
            state.status = RunStatus::Failed;
            state.append_log(format!("Report synthesis failed for {name}"));
            self.notifier
                .notify(
                    &state.run_id,
                    ProgressEvent::Error {
                        message: format!("Report synthesis failed for {name}"),
                    },
                )
                .await;
            return StageOutcome::Failed("synthesis produced an empty report".to_string());
        }

        state.report = report.clone();
        state.status = RunStatus::Complete;
        state.append_log(format!(
            "Compiled final report for {name} ({} chars)",
            report.len()
        ));

        self.notifier
            .notify(
                &state.run_id,
                ProgressEvent::EditorComplete {
                    message: "Research report completed".to_string(),
                    step: "Editor".to_string(),
                    report,
                    subject: name,
                },
            )
            .await;

        StageOutcome::Ok
    }
}
