use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_llm::OpenAiChatClient;
use paperweave_pipeline::{runner_for, AnalysisReport, Engine};
use paperweave_telemetry::{CsvTelemetry, TelemetrySink};

#[derive(Parser)]
#[command(name = "paperweave", about = "Multi-agent scientific paper analysis", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Chat model to use for every agent.
    #[arg(long, global = true, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Per-agent call budget in seconds.
    #[arg(long, global = true, default_value_t = 45)]
    timeout: u64,

    /// Upper bound on critic-driven summarizer retries.
    #[arg(long, global = true, default_value_t = 1)]
    max_critic_loops: u32,

    #[arg(long, global = true, default_value_t = 256)]
    max_tokens: u32,

    #[arg(long, global = true, default_value_t = 0.1)]
    temperature: f32,

    /// CSV file collecting one telemetry row per run.
    #[arg(long, global = true, default_value = "telemetry.csv")]
    telemetry: PathBuf,

    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct InputArgs {
    /// UTF-8 text file with the paper content (PDF extraction happens
    /// upstream of this tool).
    file: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one document with a single engine.
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Pipeline engine: sequential, graph, or bootstrap.
        #[arg(long, default_value = "graph")]
        engine: Engine,

        /// Print the full result record as JSON instead of a digest.
        #[arg(long)]
        json: bool,
    },
    /// Run every engine on the same document, one after another, and print
    /// a comparison digest.
    Compare {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn pipeline_config(cli: &Cli) -> PipelineConfig {
    PipelineConfig {
        model: cli.model.clone(),
        max_tokens: cli.max_tokens,
        temperature: cli.temperature,
        timeout: Duration::from_secs(cli.timeout),
        max_critic_loops: cli.max_critic_loops,
        truncate_chars: None,
    }
}

fn print_digest(report: &AnalysisReport) {
    println!("engine:        {}", report.engine);
    println!("latency:       {:.2}s", report.latency_s);
    println!("critic score:  {:.3} (loops: {})", report.critic_score, report.critic_loops);
    println!(
        "quality:       f1={:.3} rouge-l={:.3} judge={:.1}/5 aggregate={:.3}",
        report.quality_f1, report.quality_rouge_l, report.judge_score, report.judge_aggregate
    );
    println!("trace:         {}", report.execution_trace.join(" -> "));
    if !report.confidence.is_empty() {
        println!("confidence:    {}", report.confidence);
    }
    if !report.meta.is_empty() {
        println!("\n{}", report.meta);
    }
}

async fn analyze(
    cli: &Cli,
    file: &PathBuf,
    engine: Engine,
    json: bool,
) -> Result<(), PaperweaveError> {
    let raw_text = std::fs::read_to_string(file)?;
    tracing::debug!(chars = raw_text.chars().count(), "document loaded");
    let llm: Arc<dyn ChatLlm> = Arc::new(OpenAiChatClient::from_env()?);
    let telemetry: Arc<dyn TelemetrySink> = Arc::new(CsvTelemetry::new(&cli.telemetry));
    let runner = runner_for(engine, llm, pipeline_config(cli), telemetry)?;

    let report = runner.run(&raw_text).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_digest(&report);
    }
    Ok(())
}

async fn compare(cli: &Cli, file: &PathBuf) -> Result<(), PaperweaveError> {
    let raw_text = std::fs::read_to_string(file)?;
    let llm: Arc<dyn ChatLlm> = Arc::new(OpenAiChatClient::from_env()?);
    let telemetry: Arc<dyn TelemetrySink> = Arc::new(CsvTelemetry::new(&cli.telemetry));

    // Engines run strictly one after another over the same document; the
    // comparison is about output quality and latency, not throughput.
    for engine in [Engine::Sequential, Engine::Graph, Engine::Bootstrap] {
        let runner = runner_for(
            engine,
            Arc::clone(&llm),
            pipeline_config(cli),
            Arc::clone(&telemetry),
        )?;
        match runner.run(&raw_text).await {
            Ok(report) => {
                println!(
                    "{:<12} latency={:<8.2} summary_chars={:<6} meta_chars={:<6} f1={:.3}",
                    report.engine,
                    report.latency_s,
                    report.summary.chars().count(),
                    report.meta.chars().count(),
                    report.quality_f1,
                );
            }
            Err(error) => {
                println!("{:<12} failed: {error}", engine.name());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let outcome = match &cli.command {
        Command::Analyze {
            input,
            engine,
            json,
        } => analyze(&cli, &input.file, *engine, *json).await,
        Command::Compare { input } => compare(&cli, &input.file).await,
    };

    if let Err(error) = outcome {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
