use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_telemetry::TelemetrySink;

use crate::report::AnalysisReport;
use crate::run::GraphPipeline;
use crate::textprep::truncate_text;

const MAX_DEMOS: usize = 2;
const DEMO_TEXT_CHARS: usize = 400;

/// One line of the dev set: an input text and the summary a good run
/// produced for it.
#[derive(Clone, Debug, Deserialize)]
pub struct DevExample {
    pub text: String,
    #[serde(default)]
    pub summary: String,
}

/// Loads a JSONL dev set. Blank lines are skipped; malformed lines fail the
/// load, since a silently shrunken dev set would defeat the point.
pub fn load_dev_set(path: &Path) -> Result<Vec<DevExample>, PaperweaveError> {
    let raw = std::fs::read_to_string(path)?;
    let mut examples = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        examples.push(serde_json::from_str::<DevExample>(line)?);
    }
    Ok(examples)
}

fn demo_preamble(examples: &[DevExample]) -> Option<String> {
    let demos: Vec<String> = examples
        .iter()
        .filter(|example| !example.summary.trim().is_empty())
        .take(MAX_DEMOS)
        .map(|example| {
            format!(
                "EXAMPLE NOTES:\n{}\nEXAMPLE SUMMARY:\n{}",
                truncate_text(example.text.trim(), DEMO_TEXT_CHARS),
                example.summary.trim()
            )
        })
        .collect();
    if demos.is_empty() {
        None
    } else {
        Some(format!(
            "Follow the style of these worked examples.\n\n{}",
            demos.join("\n\n")
        ))
    }
}

/// Graph engine with few-shot demos prepended to the summarizer prompt.
/// The demos are harvested once at construction; a missing dev set file
/// degrades to the plain graph engine rather than failing the build.
pub struct BootstrapPipeline {
    inner: GraphPipeline,
}

impl BootstrapPipeline {
    pub fn new(
        llm: Arc<dyn ChatLlm>,
        config: PipelineConfig,
        dev_set_path: &Path,
    ) -> Result<Self, PaperweaveError> {
        let preamble = if dev_set_path.exists() {
            demo_preamble(&load_dev_set(dev_set_path)?)
        } else {
            tracing::warn!(
                path = %dev_set_path.display(),
                "dev set not found, bootstrap runs without demos"
            );
            None
        };
        let mut inner = GraphPipeline::new(llm, config)?.with_engine_label("bootstrap");
        if let Some(preamble) = preamble {
            inner = inner.with_summarizer_preamble(preamble);
        }
        Ok(Self { inner })
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.inner = self.inner.with_telemetry(telemetry);
        self
    }

    pub async fn run(&self, raw_text: &str) -> Result<AnalysisReport, PaperweaveError> {
        self.inner.run(raw_text).await
    }
}

#[async_trait::async_trait]
impl crate::engine::PipelineRunner for BootstrapPipeline {
    fn engine(&self) -> crate::engine::Engine {
        crate::engine::Engine::Bootstrap
    }

    async fn run(&self, raw_text: &str) -> Result<AnalysisReport, PaperweaveError> {
        BootstrapPipeline::run(self, raw_text).await
    }
}
