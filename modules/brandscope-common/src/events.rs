//! Progress events pushed to run observers.
//!
//! Fire-and-forget: delivery is never acknowledged and a lost event never
//! fails the pipeline. The `status` tag mirrors what observers key on.

use serde::{Deserialize, Serialize};

/// One status update for a run, delivered in the order the pipeline and
/// editor produced it (single writer, strictly sequential).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A stage or substep is underway.
    Processing {
        message: String,
        step: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        substep: Option<String>,
    },

    /// A sentence-sized increment of the report as the cleanup pass streams.
    ReportChunk {
        message: String,
        step: String,
        chunk: String,
    },

    /// Terminal event on success, carrying the full report.
    EditorComplete {
        message: String,
        step: String,
        report: String,
        subject: String,
    },

    /// Terminal event on failure.
    Error { message: String },
}

impl ProgressEvent {
    pub fn processing(message: impl Into<String>, step: impl Into<String>) -> Self {
        ProgressEvent::Processing {
            message: message.into(),
            step: step.into(),
            substep: None,
        }
    }

    pub fn substep(
        message: impl Into<String>,
        step: impl Into<String>,
        substep: impl Into<String>,
    ) -> Self {
        ProgressEvent::Processing {
            message: message.into(),
            step: step.into(),
            substep: Some(substep.into()),
        }
    }

    /// The wire-level `status` tag.
    pub fn status_tag(&self) -> &'static str {
        match self {
            ProgressEvent::Processing { .. } => "processing",
            ProgressEvent::ReportChunk { .. } => "report_chunk",
            ProgressEvent::EditorComplete { .. } => "editor_complete",
            ProgressEvent::Error { .. } => "error",
        }
    }

    /// True for the events that end a run's event stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::EditorComplete { .. } | ProgressEvent::Error { .. }
        )
    }
}
