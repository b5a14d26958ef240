//! Pipeline binary: analyze one video from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use framewatch_pipeline::{analyze_video, PipelineConfig, TracingReporter};
use framewatch_store::AnalysisStore;
use framewatch_vlm::{PromptTemplate, VlmClient, VlmClientConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("framewatch=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(env_filter)
        .init();

    let Some(video_path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: framewatch-pipeline <video-file>");
        return ExitCode::from(2);
    };

    let config = PipelineConfig::from_env();
    let store = AnalysisStore::new(&config.output_dir);

    let template_path =
        std::env::var("VLM_PROMPT_FILE").unwrap_or_else(|_| "prompts.json".to_string());
    let template = match PromptTemplate::from_file(&template_path) {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to load prompt template from {template_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let classifier = match VlmClient::new(VlmClientConfig::from_env(), &template) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create classifier client: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Analyzing {}", video_path.display());

    match analyze_video(&classifier, &store, &config, &video_path, &TracingReporter).await {
        Ok(outcome) => {
            let summary = &outcome.document.analysis_summary;
            info!(
                "Done: {} frames analyzed, {:.1}% flagged, average score {:.2}",
                summary.total_frames, summary.nsfw_percentage, summary.average_nsfw_score
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Analysis failed: {e}");
            ExitCode::FAILURE
        }
    }
}
