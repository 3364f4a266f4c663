use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_graph::GraphError;
use paperweave_telemetry::{NullSink, TelemetryRow, TelemetrySink};

use crate::dot::annotated_dot;
use crate::graph::{build_workflow, AgentSet};
use crate::report::AnalysisReport;
use crate::signal::extract_confidence_line;
use crate::state::{round2, PipelineState};
use crate::textprep::build_analysis_context;

/// Runs shorter than this after cleanup are rejected before any node runs.
pub(crate) const MIN_CONTEXT_CHARS: usize = 100;

/// The graph engine: deterministic, timeout-guarded walk over the analysis
/// workflow, with conditional recovery and a bounded critic retry loop.
pub struct GraphPipeline {
    llm: Arc<dyn ChatLlm>,
    config: PipelineConfig,
    telemetry: Arc<dyn TelemetrySink>,
    engine_label: &'static str,
    summarizer_preamble: Option<String>,
}

impl GraphPipeline {
    pub fn new(llm: Arc<dyn ChatLlm>, config: PipelineConfig) -> Result<Self, PaperweaveError> {
        config.validate()?;
        Ok(Self {
            llm,
            config,
            telemetry: Arc::new(NullSink),
            engine_label: "graph",
            summarizer_preamble: None,
        })
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub(crate) fn with_engine_label(mut self, label: &'static str) -> Self {
        self.engine_label = label;
        self
    }

    pub(crate) fn with_summarizer_preamble(mut self, preamble: String) -> Self {
        self.summarizer_preamble = Some(preamble);
        self
    }

    pub async fn run(&self, raw_text: &str) -> Result<AnalysisReport, PaperweaveError> {
        let run_id = Uuid::new_v4().to_string();

        let cleaned = build_analysis_context(raw_text);
        if cleaned.trim().chars().count() < MIN_CONTEXT_CHARS {
            tracing::warn!(
                chars = cleaned.trim().chars().count(),
                "input rejected before graph execution"
            );
            return Ok(AnalysisReport::invalid_input(run_id, self.engine_label));
        }

        let workflow = build_workflow(
            AgentSet::new(Arc::clone(&self.llm), self.summarizer_preamble.clone()),
            &self.config,
        )
        .map_err(walk_failure)?;

        let started = Instant::now();
        let mut state = PipelineState::new(raw_text, self.config.clone());
        workflow.invoke(&mut state).await.map_err(walk_failure)?;
        let latency_s = round2(started.elapsed().as_secs_f64());

        let extracted = extract_confidence_line(&state.meta);
        if !extracted.is_empty() {
            state.confidence = extracted;
        }

        let dot = annotated_dot(workflow.topology(), &state);
        let report = AnalysisReport::from_graph_state(
            &state,
            run_id,
            self.engine_label,
            latency_s,
            Some(dot),
        );
        log_telemetry(self.telemetry.as_ref(), &report);
        Ok(report)
    }
}

/// Timeouts never reach this point; they are sentinel values, not errors.
/// Everything that does — transport failures, malformed wiring — fails the
/// run, with node failures unwrapped to their cause.
fn walk_failure(error: GraphError) -> PaperweaveError {
    match error {
        GraphError::NodeFailed { source, .. } => source,
        other => PaperweaveError::Custom(other.to_string()),
    }
}

pub(crate) fn log_telemetry(sink: &dyn TelemetrySink, report: &AnalysisReport) {
    let row = TelemetryRow {
        run_id: report.run_id.clone(),
        engine: report.engine.clone(),
        input_chars: report.input_chars,
        summary_len: report.summary.chars().count(),
        meta_len: report.meta.chars().count(),
        latency_s: report.latency_s,
        reader_s: report.reader_s,
        results_extractor_s: report.results_extractor_s,
        summarizer_s: report.summarizer_s,
        critic_s: report.critic_s,
        integrator_s: report.integrator_s,
        critic_score: report.critic_score,
        critic_loops: report.critic_loops,
        quality_f1: report.quality_f1,
        judge_score: report.judge_score,
        judge_aggregate: report.judge_aggregate,
        quant_signal: report.quant_signal.clone(),
        extracted_metrics_count: report.extracted_metrics_count,
        confidence: report.confidence.clone(),
    };
    if let Err(error) = sink.log_row(&row) {
        tracing::warn!(error = %error, "telemetry write failed, continuing");
    }
}
