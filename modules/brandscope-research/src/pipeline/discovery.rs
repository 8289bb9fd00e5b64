//! Discovery — resolve the brand's official profile links.
//!
//! One site-scoped search, then URL-shape classification into the three
//! platform buckets. First match wins per platform; the heuristic can pick
//! a stale profile and we keep it that way deliberately — disambiguation
//! would need brand-side signals this stage does not have. Fails open: a
//! provider error yields an empty link map and the run continues.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

use brandscope_common::{Platform, ProgressEvent, Reference, RunStatus};

use crate::notifier::ProgressNotifier;
use crate::pipeline::{Stage, StageName, StageOutcome};
use crate::searcher::{SearchHit, WebSearcher};
use crate::state::ResearchState;

/// At most one link per platform.
pub const MAX_SOURCES: usize = 3;

const SEARCH_RESULTS: u32 = 10;

pub struct Discovery {
    searcher: Arc<dyn WebSearcher>,
    notifier: Arc<dyn ProgressNotifier>,
}

impl Discovery {
    pub fn new(searcher: Arc<dyn WebSearcher>, notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self { searcher, notifier }
    }
}

/// Classify ranked hits into platform buckets by URL shape.
///
/// - YouTube: first channel-shaped link (`/channel/`, `/@handle`, `/c/`).
/// - Facebook: first link whose path is a single segment (a page, not a
///   post or a photo album).
/// - TikTok: first link without a `/video/` segment.
pub fn classify_links(hits: &[SearchHit]) -> HashMap<Platform, String> {
    let mut links = HashMap::new();

    for hit in hits {
        if links.len() >= MAX_SOURCES {
            break;
        }
        let Ok(parsed) = Url::parse(&hit.url) else {
            continue;
        };
        let host = parsed.host_str().unwrap_or("");
        let path = parsed.path();

        if host.ends_with("youtube.com") {
            let channel_shaped = path.starts_with("/channel/")
                || path.starts_with("/@")
                || path.starts_with("/c/");
            if channel_shaped {
                links
                    .entry(Platform::Youtube)
                    .or_insert_with(|| hit.url.clone());
            }
        } else if host.ends_with("facebook.com") {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            if segments.len() == 1 {
                links
                    .entry(Platform::Facebook)
                    .or_insert_with(|| hit.url.clone());
            }
        } else if host.ends_with("tiktok.com") && !path.contains("/video/") {
            links
                .entry(Platform::Tiktok)
                .or_insert_with(|| hit.url.clone());
        }
    }

    links
}

#[async_trait]
impl Stage for Discovery {
    fn name(&self) -> StageName {
        StageName::Discovery
    }

    async fn run(&self, state: &mut ResearchState) -> StageOutcome {
        state.status = RunStatus::Discovering;
        let name = state.subject_name().to_string();

        let query =
            format!("site:facebook.com OR site:youtube.com OR site:tiktok.com {name}");

        let hits = match self.searcher.search(&query, SEARCH_RESULTS).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Link discovery search failed");
                state.append_log(format!("Discovery search failed for {name}: {e}"));
                return StageOutcome::Degraded("search provider unavailable".to_string());
            }
        };

        let links = classify_links(&hits);
        info!(count = links.len(), "Discovered profile links");

        for platform in Platform::ALL {
            let Some(url) = links.get(&platform) else {
                continue;
            };
            state
                .references
                .push(Reference::new(url.clone()).with_title(format!("{platform} profile")));
            self.notifier
                .notify(
                    &state.run_id,
                    ProgressEvent::substep(
                        format!("{platform}: {url}"),
                        StageName::Discovery.as_str(),
                        "link_discovered",
                    ),
                )
                .await;
        }

        state.append_log(format!(
            "Discovery found {} profile link(s) for {name}",
            links.len()
        ));
        state.source_links = links;

        if state.source_links.is_empty() {
            StageOutcome::Degraded("no profile links discovered".to_string())
        } else {
            StageOutcome::Ok
        }
    }
}
