//! Collection fan-out: one external job per discovered source, full join
//! barrier, per-run artifact namespace.
//!
//! A job is an opaque unit of work that writes a plain-text artifact to a
//! well-known path and exits. A job's failure never fails the batch — the
//! platform's entry is simply absent from the result map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tracing::{info, warn};

use brandscope_common::{BrandScopeError, Platform};

// ---------------------------------------------------------------------------
// CollectJob
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
pub trait CollectJob: Send + Sync {
    /// Collect one source. Expected side effect: a plain-text artifact at
    /// `artifact_path`. Non-zero exit or a missing artifact counts as a
    /// failure of this source only.
    async fn run(&self, platform: Platform, url: &str, artifact_path: &Path) -> Result<()>;
}

/// Production job: launches one external scrape script per platform.
/// The script receives the profile URL and the artifact path as arguments.
pub struct ScriptJob {
    bin: String,
    script_dir: PathBuf,
}

impl ScriptJob {
    pub fn new(bin: String, script_dir: PathBuf) -> Self {
        Self { bin, script_dir }
    }

    fn script_path(&self, platform: Platform) -> PathBuf {
        self.script_dir
            .join(format!("{}_scrape.py", platform.artifact_stem()))
    }
}

#[async_trait::async_trait]
impl CollectJob for ScriptJob {
    async fn run(&self, platform: Platform, url: &str, artifact_path: &Path) -> Result<()> {
        let script = self.script_path(platform);
        let output = tokio::process::Command::new(&self.bin)
            .arg(&script)
            .arg(url)
            .arg(artifact_path)
            .output()
            .await
            .map_err(|e| {
                BrandScopeError::Collection(format!("failed to launch {}: {e}", script.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BrandScopeError::Collection(format!(
                "{platform} job exited with {}: {}",
                output.status,
                stderr.trim()
            ))
            .into());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ArtifactStore
// ---------------------------------------------------------------------------

/// Per-run artifact namespace: `{data_dir}/runs/{run_id}/`. Namespacing by
/// run id keeps concurrent runs for different subjects from clobbering each
/// other's artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn for_run(data_dir: &Path, run_id: &str) -> Self {
        Self {
            dir: data_dir.join("runs").join(run_id),
        }
    }

    pub fn path(&self, platform: Platform) -> PathBuf {
        self.dir.join(format!("{}.txt", platform.artifact_stem()))
    }

    /// Remove any previous artifacts for the targeted platforms so a rerun
    /// of the same run id cannot read stale data.
    pub async fn clear<I: IntoIterator<Item = Platform>>(&self, platforms: I) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        for platform in platforms {
            match tokio::fs::remove_file(self.path(platform)).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Read a platform's artifact. Missing or blank files read as absent.
    pub async fn read(&self, platform: Platform) -> Option<String> {
        let content = tokio::fs::read_to_string(self.path(platform)).await.ok()?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CollectionRunner
// ---------------------------------------------------------------------------

pub struct CollectionRunner {
    job: Arc<dyn CollectJob>,
    store: ArtifactStore,
}

impl CollectionRunner {
    pub fn new(job: Arc<dyn CollectJob>, store: ArtifactStore) -> Self {
        Self { job, store }
    }

    /// Launch one job per entry in `links` and wait for every one of them
    /// to terminate before reading artifacts back. Platforms absent from
    /// `links` are never launched. Individual failures are logged and show
    /// up as absent entries; this never returns an error.
    pub async fn run_all(&self, links: &HashMap<Platform, String>) -> HashMap<Platform, String> {
        if links.is_empty() {
            info!("No source links discovered, skipping collection");
            return HashMap::new();
        }

        if let Err(e) = self.store.clear(links.keys().copied()).await {
            warn!(error = %e, "Failed to clear artifact namespace");
            return HashMap::new();
        }

        let jobs = links.iter().map(|(&platform, url)| {
            let job = Arc::clone(&self.job);
            let path = self.store.path(platform);
            async move {
                let outcome = job.run(platform, url, &path).await;
                (platform, outcome)
            }
        });

        // Full barrier: every launched job terminates before any read-back.
        let outcomes = join_all(jobs).await;

        let mut artifacts = HashMap::new();
        for (platform, outcome) in outcomes {
            if let Err(e) = outcome {
                warn!(platform = %platform, error = %e, "Collection job failed");
                continue;
            }
            match self.store.read(platform).await {
                Some(content) => {
                    info!(platform = %platform, bytes = content.len(), "Artifact collected");
                    artifacts.insert(platform, content);
                }
                None => {
                    warn!(platform = %platform, "Job exited cleanly but wrote no artifact");
                }
            }
        }
        artifacts
    }
}
