//! Research state — the single mutable record that flows through every
//! pipeline stage within one run.
//!
//! The driver owns it exclusively; each stage receives it by `&mut` for the
//! duration of its own execution window, so no two stages ever touch it
//! concurrently. Later stages only ever append to fields an earlier stage
//! populated (`references`, `log`).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use brandscope_common::{Platform, Reference, RunStatus, Subject};

#[derive(Debug, Clone, Serialize)]
pub struct ResearchState {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub subject: Subject,

    /// Platform → discovered profile URL. Written once by Discovery.
    pub source_links: HashMap<Platform, String>,

    /// Platform → raw collected payload. Keys are always a subset of
    /// `source_links` keys.
    pub artifacts: HashMap<Platform, String>,

    /// Citations accumulated across stages, in discovery order.
    pub references: Vec<Reference>,

    /// Append-only narrative of what each stage did. Audit only — no stage
    /// reads it back for control decisions.
    pub log: Vec<String>,

    /// Final synthesized document. Non-empty iff `status == Complete`.
    pub report: String,

    pub status: RunStatus,
}

impl ResearchState {
    pub fn new(subject: Subject) -> Self {
        Self::with_run_id(subject, Uuid::new_v4().to_string())
    }

    pub fn with_run_id(subject: Subject, run_id: String) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            subject,
            source_links: HashMap::new(),
            artifacts: HashMap::new(),
            references: Vec::new(),
            log: Vec::new(),
            report: String::new(),
            status: RunStatus::Pending,
        }
    }

    pub fn append_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    pub fn subject_name(&self) -> &str {
        self.subject.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending_and_empty() {
        let state = ResearchState::new(Subject::named("Acme"));
        assert_eq!(state.status, RunStatus::Pending);
        assert!(state.source_links.is_empty());
        assert!(state.artifacts.is_empty());
        assert!(state.report.is_empty());
        assert!(!state.run_id.is_empty());
    }

    #[test]
    fn log_is_append_only_in_order() {
        let mut state = ResearchState::new(Subject::named("Acme"));
        state.append_log("first");
        state.append_log("second");
        assert_eq!(state.log, vec!["first", "second"]);
    }
}
