use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use brandscope_common::{Config, RunStatus, Subject};
use brandscope_research::collector::{ArtifactStore, CollectionRunner, ScriptJob};
use brandscope_research::editor::ReportEditor;
use brandscope_research::notifier::{NullNotifier, ProgressNotifier, WebhookNotifier};
use brandscope_research::pipeline::collection::Collection;
use brandscope_research::pipeline::discovery::Discovery;
use brandscope_research::pipeline::grounding::Grounding;
use brandscope_research::pipeline::synthesis::Synthesis;
use brandscope_research::searcher::SerpApiSearcher;
use brandscope_research::{Pipeline, ResearchState};

/// Research a brand's social-media reputation and print the report.
#[derive(Parser, Debug)]
#[command(name = "brandscope")]
struct Args {
    /// Brand name to research.
    name: String,

    /// Canonical brand website.
    #[arg(long)]
    url: Option<String>,

    /// Industry the brand operates in.
    #[arg(long)]
    industry: Option<String>,

    /// Headquarters location.
    #[arg(long)]
    hq_location: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("brandscope=info".parse()?))
        .init();

    info!("BrandScope research starting...");

    let args = Args::parse();
    let config = Config::from_env();
    config.log_redacted();

    let http = reqwest::Client::new();

    let notifier: Arc<dyn ProgressNotifier> = match config.observer_webhook_url.clone() {
        Some(url) => Arc::new(WebhookNotifier::new(url, http.clone())),
        None => Arc::new(NullNotifier),
    };

    let searcher = Arc::new(SerpApiSearcher::new(config.serp_api_key.clone(), http));
    let chat = Arc::new(OpenAi::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));

    let subject = Subject {
        name: Some(args.name),
        url: args.url,
        industry: args.industry,
        hq_location: args.hq_location,
    };
    let state = ResearchState::new(subject);
    info!(run_id = state.run_id.as_str(), "Run created");

    let store = ArtifactStore::for_run(&config.data_dir, &state.run_id);
    let job = Arc::new(ScriptJob::new(
        config.collect_bin.clone(),
        config.collect_script_dir.clone(),
    ));

    let pipeline = Pipeline::new(notifier.clone())
        .stage(Grounding)
        .stage(Discovery::new(searcher, notifier.clone()))
        .stage(Collection::new(
            CollectionRunner::new(job, store),
            notifier.clone(),
        ))
        .stage(Synthesis::new(
            ReportEditor::new(chat, notifier.clone()),
            notifier,
        ));

    let final_state = pipeline.run(state).await;

    for line in &final_state.log {
        info!("{line}");
    }

    match final_state.status {
        RunStatus::Complete => {
            println!("{}", final_state.report);
            Ok(())
        }
        status => {
            anyhow::bail!("research run ended with status {status}")
        }
    }
}
