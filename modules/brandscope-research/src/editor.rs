//! Report synthesis: two sequential passes over the collected artifacts.
//!
//! Pass 1 (draft compilation) is generous — it feeds everything we collected
//! to the model and keeps the raw concatenation as its fallback. Pass 2
//! (cleanup sweep) is strict — it re-emits the draft under the fixed section
//! structure, streaming sentence-sized chunks to observers as they arrive.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use ai_client::{ChatClient, Prompt, StreamEvent};
use brandscope_common::{Platform, ProgressEvent, Subject};

use crate::notifier::ProgressNotifier;
use crate::references::format_references_section;
use crate::state::ResearchState;

/// Minimum buffered length before a sentence terminator triggers a flush.
pub const MIN_FLUSH_LEN: usize = 10;

const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '\n'];

const STEP: &str = "Editor";

/// Flush once the buffer has a sentence boundary and enough text that
/// observers see roughly sentence-sized increments rather than fragments.
pub fn should_flush(buffer: &str) -> bool {
    buffer.len() > MIN_FLUSH_LEN && buffer.contains(&SENTENCE_TERMINATORS[..])
}

/// Concatenate available artifacts as `{platform}` header blocks, in fixed
/// platform order so reruns produce identical drafts. Absent platforms are
/// omitted, not padded.
pub fn concat_artifacts(artifacts: &HashMap<Platform, String>) -> String {
    let mut chunks = Vec::new();
    for platform in Platform::ALL {
        if let Some(content) = artifacts.get(&platform) {
            chunks.push(format!("{platform}\n{content}"));
        }
    }
    chunks.join("\n")
}

pub struct ReportEditor {
    client: Arc<dyn ChatClient>,
    notifier: Arc<dyn ProgressNotifier>,
}

impl ReportEditor {
    pub fn new(client: Arc<dyn ChatClient>, notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self { client, notifier }
    }

    /// Run both passes. Returns the final document, which is empty only
    /// when both passes failed outright.
    pub async fn synthesize(&self, state: &ResearchState) -> String {
        let subject = state.subject_name().to_string();
        let run_id = state.run_id.clone();

        self.notifier
            .notify(
                &run_id,
                ProgressEvent::substep(
                    format!("Starting report compilation for {subject}"),
                    STEP,
                    "initialization",
                ),
            )
            .await;

        self.notifier
            .notify(
                &run_id,
                ProgressEvent::substep("Compiling initial research report", STEP, "compilation"),
            )
            .await;
        let draft = self.compile_draft(state).await;
        if draft.trim().is_empty() {
            error!("Draft compilation produced no content");
            return String::new();
        }

        self.notifier
            .notify(
                &run_id,
                ProgressEvent::substep("Cleaning up and organizing report", STEP, "cleanup"),
            )
            .await;
        self.notifier
            .notify(
                &run_id,
                ProgressEvent::substep("Formatting final report", STEP, "format"),
            )
            .await;
        let report = self.content_sweep(&run_id, &subject, &draft).await;

        info!(chars = report.len(), "Final report compiled");
        report.trim().to_string()
    }

    /// Pass 1: one non-streaming completion over everything we collected
    /// plus the references block. Provider failure degrades to the raw
    /// concatenation so collected data is never dropped.
    async fn compile_draft(&self, state: &ResearchState) -> String {
        let combined = concat_artifacts(&state.artifacts);
        let reference_text = format_references_section(&state.references);

        let prompt = Prompt::new(
            "You are an expert report editor that looks for useful information about a brand \
             and compiles research briefings into comprehensive reputation reports.",
            compile_prompt(&state.subject, &combined, &state.source_links),
        );

        match self.client.complete(&prompt).await {
            Ok(draft) => {
                let draft = draft.trim().to_string();
                if reference_text.is_empty() {
                    draft
                } else {
                    format!("{draft}\n\n{reference_text}")
                }
            }
            Err(e) => {
                warn!(error = %e, "Draft compilation failed, falling back to raw artifacts");
                combined.trim().to_string()
            }
        }
    }

    /// Pass 2: streaming cleanup sweep. Chunks flush to observers at
    /// sentence boundaries; provider failure returns the draft unchanged.
    async fn content_sweep(&self, run_id: &str, subject: &str, draft: &str) -> String {
        let prompt = Prompt::new(
            "You are an expert markdown formatter that ensures consistent document structure.",
            sweep_prompt(subject, draft),
        );

        let (tx, rx) = mpsc::channel(32);
        let (outcome, accumulated) = tokio::join!(
            self.client.complete_streaming(&prompt, tx),
            self.consume_stream(run_id, rx),
        );

        match outcome {
            Ok(()) => accumulated.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "Cleanup sweep failed, keeping draft");
                draft.trim().to_string()
            }
        }
    }

    /// Drain the token stream, flushing the buffer to observers whenever it
    /// holds a sentence terminator and has grown past `MIN_FLUSH_LEN`. The
    /// final (possibly short) buffer flushes once more at stream end.
    async fn consume_stream(&self, run_id: &str, mut rx: mpsc::Receiver<StreamEvent>) -> String {
        let mut accumulated = String::new();
        let mut buffer = String::new();

        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Token(token) => {
                    accumulated.push_str(&token);
                    buffer.push_str(&token);
                    if should_flush(&buffer) {
                        self.flush_chunk(run_id, std::mem::take(&mut buffer)).await;
                    }
                }
                StreamEvent::Done => break,
            }
        }

        if !buffer.is_empty() {
            self.flush_chunk(run_id, buffer).await;
        }

        accumulated
    }

    async fn flush_chunk(&self, run_id: &str, chunk: String) {
        self.notifier
            .notify(
                run_id,
                ProgressEvent::ReportChunk {
                    message: "Formatting final report".to_string(),
                    step: STEP.to_string(),
                    chunk,
                },
            )
            .await;
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

fn social_links_line(links: &HashMap<Platform, String>) -> String {
    let mut parts = Vec::new();
    for platform in Platform::ALL {
        if let Some(url) = links.get(&platform) {
            parts.push(format!("{platform}: {url}"));
        }
    }
    if parts.is_empty() {
        "none discovered".to_string()
    } else {
        parts.join(", ")
    }
}

fn compile_prompt(subject: &Subject, combined: &str, links: &HashMap<Platform, String>) -> String {
    let name = subject.display_name();
    let industry = subject.industry.as_deref().unwrap_or("Unknown");
    let hq = subject.hq_location.as_deref().unwrap_or("Unknown");

    format!(
        "You are compiling a comprehensive research report about {name} \
         (industry: {industry}, headquarters: {hq}).\n\n\
         Collected material:\n{combined}\n\n\
         Create a comprehensive and focused report on brand {name} that:\n\
         1. Integrates information from all sources into a cohesive non-repetitive narrative\n\
         2. Logically organizes information with clear section headers\n\
         3. Uses these official social media profiles as context to identify the right brand: \
         {links}\n\
         4. Names competitors of {name} with general social media stats, only where confident\n\
         5. Introduces the brand: industry, founding, stores, ownership, products, only where \
         confident\n\
         6. In the engagement section, gives general stats first, then per-platform tables of \
         likes, comments and shares for recent posts, with explanations and insights\n\n\
         Strictly enforce this EXACT document structure:\n\n\
         # {name} Reputation Report\n\n\
         ## Social Media & User Engagement\n\
         [content with ### subsections]\n\n\
         ## Competitors\n\
         [content with ### subsections]\n\n\
         Return the report in clean markdown format",
        links = social_links_line(links),
    )
}

fn sweep_prompt(name: &str, draft: &str) -> String {
    format!(
        "You are an expert briefing editor. You are given a report on {name}.\n\n\
         Current report:\n{draft}\n\n\
         1. Remove redundant or repetitive information\n\
         2. Remove information that is not relevant to {name}\n\
         3. Remove sections lacking substantial content\n\n\
         Critical rules:\n\
         1. The document MUST start with \"# {name} Reputation Report\"\n\
         2. The document MUST ONLY use these exact ## headers in this order:\n\
         - ## Social Media & User Engagement\n\
         - ## Competitors\n\
         3. NO OTHER ## HEADERS ARE ALLOWED\n\
         4. Use ### for subsections\n\
         5. Never use code blocks (```)\n\
         6. Never use more than one blank line between sections\n\n\
         Return the polished report in flawless markdown format"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNotifier;

    fn chunks_from(events: &[(String, ProgressEvent)]) -> Vec<String> {
        events
            .iter()
            .filter_map(|(_, e)| match e {
                ProgressEvent::ReportChunk { chunk, .. } => Some(chunk.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn flush_needs_both_length_and_terminator() {
        assert!(!should_flush("short."));
        assert!(!should_flush("no terminator here at all"));
        assert!(should_flush("long enough sentence."));
        assert!(should_flush("newline counts here\n"));
        // Exactly at the threshold is not enough.
        assert!(!should_flush("0123456.89"));
    }

    #[test]
    fn concat_keeps_fixed_platform_order() {
        let artifacts = HashMap::from([
            (Platform::Facebook, "fb data".to_string()),
            (Platform::Youtube, "yt data".to_string()),
        ]);
        let combined = concat_artifacts(&artifacts);
        assert_eq!(combined, "youtube\nyt data\nfacebook\nfb data");
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        assert_eq!(concat_artifacts(&HashMap::new()), "");
    }

    #[tokio::test]
    async fn stream_flushes_at_sentence_boundaries() {
        let notifier = Arc::new(RecordingNotifier::new());
        let client: Arc<dyn ChatClient> = Arc::new(crate::testing::MockChat::new());
        let editor = ReportEditor::new(client, notifier.clone());

        let (tx, rx) = mpsc::channel(8);
        let feeder = async {
            for token in ["# Acme Repu", "tation Report. ", "More text", " follows"] {
                tx.send(StreamEvent::Token(token.to_string())).await.unwrap();
            }
            tx.send(StreamEvent::Done).await.unwrap();
            drop(tx);
        };
        let (_, accumulated) = tokio::join!(feeder, editor.consume_stream("run-1", rx));

        assert_eq!(
            accumulated,
            "# Acme Reputation Report. More text follows"
        );
        let chunks = chunks_from(&notifier.events());
        // First flush once the terminator has been seen past the threshold,
        // then the forced flush of the remainder at stream end.
        assert_eq!(
            chunks,
            vec![
                "# Acme Reputation Report. ".to_string(),
                "More text follows".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn terminator_free_stream_flushes_only_at_end() {
        let notifier = Arc::new(RecordingNotifier::new());
        let client: Arc<dyn ChatClient> = Arc::new(crate::testing::MockChat::new());
        let editor = ReportEditor::new(client, notifier.clone());

        let (tx, rx) = mpsc::channel(8);
        let feeder = async {
            for token in ["abc", "def", "ghi"] {
                tx.send(StreamEvent::Token(token.to_string())).await.unwrap();
            }
            tx.send(StreamEvent::Done).await.unwrap();
        };
        let (_, accumulated) = tokio::join!(feeder, editor.consume_stream("run-1", rx));

        assert_eq!(accumulated, "abcdefghi");
        assert_eq!(chunks_from(&notifier.events()), vec!["abcdefghi".to_string()]);
    }

    #[tokio::test]
    async fn sweep_failure_keeps_draft_with_references() {
        let notifier = Arc::new(RecordingNotifier::new());
        // Draft compilation is scripted, the streaming sweep is not.
        let client: Arc<dyn ChatClient> =
            Arc::new(crate::testing::MockChat::new().on_complete("Draft body."));
        let editor = ReportEditor::new(client, notifier.clone());

        let mut state = crate::testing::state_for("Acme");
        state
            .artifacts
            .insert(Platform::Youtube, "yt posts".to_string());
        state.references.push(
            brandscope_common::Reference::new("https://www.youtube.com/@acme").with_title("Acme"),
        );

        let report = editor.synthesize(&state).await;
        assert_eq!(
            report,
            "Draft body.\n\n## References\n\n* [Acme](https://www.youtube.com/@acme)"
        );
        // Nothing streamed when the sweep never produced a token.
        assert!(chunks_from(&notifier.events()).is_empty());
    }

    #[tokio::test]
    async fn synthesize_announces_each_substep_in_order() {
        let notifier = Arc::new(RecordingNotifier::new());
        let client: Arc<dyn ChatClient> = Arc::new(
            crate::testing::MockChat::new()
                .on_complete("Draft body.")
                .on_stream(&["# Acme Reputation Report"]),
        );
        let editor = ReportEditor::new(client, notifier.clone());

        let state = crate::testing::state_for("Acme");
        editor.synthesize(&state).await;

        let substeps: Vec<String> = notifier
            .events()
            .iter()
            .filter_map(|(_, e)| match e {
                ProgressEvent::Processing {
                    substep: Some(s), ..
                } => Some(s.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            substeps,
            vec!["initialization", "compilation", "cleanup", "format"]
        );
    }

    #[tokio::test]
    async fn dropped_sender_still_flushes_remainder() {
        let notifier = Arc::new(RecordingNotifier::new());
        let client: Arc<dyn ChatClient> = Arc::new(crate::testing::MockChat::new());
        let editor = ReportEditor::new(client, notifier.clone());

        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Token("partial".to_string()))
            .await
            .unwrap();
        drop(tx); // provider died mid-stream, no Done marker
        let accumulated = editor.consume_stream("run-1", rx).await;

        assert_eq!(accumulated, "partial");
        assert_eq!(chunks_from(&notifier.events()), vec!["partial".to_string()]);
    }
}
