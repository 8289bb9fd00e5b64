//! Grounding — normalize the subject identity before anything external runs.

use async_trait::async_trait;

use crate::pipeline::{Stage, StageName, StageOutcome};
use crate::state::ResearchState;

pub struct Grounding;

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Stage for Grounding {
    fn name(&self) -> StageName {
        StageName::Grounding
    }

    async fn run(&self, state: &mut ResearchState) -> StageOutcome {
        let subject = &mut state.subject;
        subject.name = Some(
            normalized(subject.name.as_deref()).unwrap_or_else(|| "Unknown Company".to_string()),
        );
        subject.url = normalized(subject.url.as_deref());
        subject.industry = normalized(subject.industry.as_deref());
        subject.hq_location = normalized(subject.hq_location.as_deref());

        state.append_log(format!(
            "Grounded subject {} for research run {}",
            state.subject.display_name(),
            state.run_id
        ));
        StageOutcome::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandscope_common::Subject;

    #[tokio::test]
    async fn blank_name_normalizes_to_unknown_company() {
        let mut state = ResearchState::new(Subject {
            name: Some("   ".into()),
            url: Some(" https://acme.com ".into()),
            industry: Some("".into()),
            hq_location: None,
        });

        let outcome = Grounding.run(&mut state).await;

        assert_eq!(outcome, StageOutcome::Ok);
        assert_eq!(state.subject.name.as_deref(), Some("Unknown Company"));
        assert_eq!(state.subject.url.as_deref(), Some("https://acme.com"));
        assert_eq!(state.subject.industry, None);
        assert_eq!(state.log.len(), 1);
    }
}
