use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use paperweave_agents::{Critic, Integrator, Reader, Summarizer};
use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_telemetry::{NullSink, TelemetrySink};

use crate::report::AnalysisReport;
use crate::run::{log_telemetry, MIN_CONTEXT_CHARS};
use crate::signal::{
    count_numeric_results, detect_quantitative_signal, extract_confidence_line,
};
use crate::state::round2;
use crate::textprep::build_analysis_context;

/// The linear engine: reader -> summarizer -> critic -> integrator, no
/// routing, no retries, no recovery, no timeout guard. Kept as the baseline
/// the graph engine is compared against.
pub struct SequentialPipeline {
    reader: Reader,
    summarizer: Summarizer,
    critic: Critic,
    integrator: Integrator,
    config: PipelineConfig,
    telemetry: Arc<dyn TelemetrySink>,
}

impl SequentialPipeline {
    pub fn new(llm: Arc<dyn ChatLlm>, config: PipelineConfig) -> Result<Self, PaperweaveError> {
        config.validate()?;
        Ok(Self {
            reader: Reader::new(Arc::clone(&llm)),
            summarizer: Summarizer::new(Arc::clone(&llm)),
            critic: Critic::new(Arc::clone(&llm)),
            integrator: Integrator::new(llm),
            config,
            telemetry: Arc::new(NullSink),
        })
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub async fn run(&self, raw_text: &str) -> Result<AnalysisReport, PaperweaveError> {
        let run_id = Uuid::new_v4().to_string();
        let mut execution_trace = vec!["retriever".to_string()];

        let context = build_analysis_context(raw_text);
        if context.trim().chars().count() < MIN_CONTEXT_CHARS {
            tracing::warn!(
                chars = context.trim().chars().count(),
                "input rejected before sequential execution"
            );
            return Ok(AnalysisReport::invalid_input(run_id, "sequential"));
        }
        let quant = detect_quantitative_signal(&context);

        let total_started = Instant::now();

        let started = Instant::now();
        execution_trace.push("reader".to_string());
        let notes = self.reader.run(&context, &self.config).await?;
        let reader_s = round2(started.elapsed().as_secs_f64());
        let extracted_metrics_count = count_numeric_results(&notes);

        let started = Instant::now();
        execution_trace.push("summarizer".to_string());
        let summary = self.summarizer.run(&notes, &self.config).await?;
        let summarizer_s = round2(started.elapsed().as_secs_f64());

        let started = Instant::now();
        execution_trace.push("critic".to_string());
        let critic = self.critic.run(&notes, &summary, &self.config).await?;
        let critic_s = round2(started.elapsed().as_secs_f64());

        let started = Instant::now();
        execution_trace.push("integrator".to_string());
        let meta = self
            .integrator
            .run(&notes, &summary, &critic, &self.config)
            .await?;
        let integrator_s = round2(started.elapsed().as_secs_f64());

        let latency_s = round2(total_started.elapsed().as_secs_f64());
        let confidence = extract_confidence_line(&meta);

        let report = AnalysisReport {
            run_id,
            engine: "sequential".to_string(),
            structured: notes,
            summary,
            critic,
            meta,
            confidence,
            reader_s,
            summarizer_s,
            critic_s,
            integrator_s,
            latency_s,
            input_chars: context.chars().count(),
            quant_signal: quant.signal.as_str().to_string(),
            quant_signal_label: quant.label,
            quant_keyword_hits: quant.keyword_hits,
            quant_number_samples: quant.number_samples,
            extracted_metrics_count,
            execution_trace,
            ..AnalysisReport::default()
        };
        log_telemetry(self.telemetry.as_ref(), &report);
        Ok(report)
    }
}
