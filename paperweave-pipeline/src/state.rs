use serde::{Deserialize, Serialize};

use paperweave_core::PipelineConfig;

use crate::graph::Stage;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuantSignal {
    Yes,
    Maybe,
    #[default]
    No,
}

impl QuantSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantSignal::Yes => "YES",
            QuantSignal::Maybe => "MAYBE",
            QuantSignal::No => "NO",
        }
    }
}

/// Outcome of the quantitative-signal heuristic over the analysis context.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantReport {
    pub signal: QuantSignal,
    pub label: String,
    pub keyword_hits: Vec<String>,
    pub number_samples: Vec<String>,
}

/// The single mutable record threaded through every node of a run. Created
/// fresh per run, owned exclusively by that run, mutated in place by each
/// node the executor visits, and turned into an [`AnalysisReport`] at the
/// end. The embedded `config` is immutable by convention.
///
/// [`AnalysisReport`]: crate::AnalysisReport
#[derive(Clone, Debug)]
pub struct PipelineState {
    pub config: PipelineConfig,
    /// Raw input. Set once, never mutated afterwards.
    pub input_text: String,
    /// Cleaned working text. Written only by the retriever node.
    pub analysis_context: String,
    /// Reader output; the recovery node may merge into it, never replace it.
    pub notes: String,
    /// Rewritten on every critic-driven retry iteration.
    pub summary: String,
    pub summary_translated: String,
    pub translator_note: String,
    pub keywords: String,
    pub keyword_note: String,
    pub critic: String,
    /// Derived from the critic text by the post-critic routing predicate.
    pub critic_score: f64,
    /// Retry iterations taken so far. Bounded by `config.max_critic_loops`.
    pub critic_loops: u32,
    /// Integrator output. Written exactly once, last.
    pub meta: String,
    pub confidence: String,
    pub reader_s: f64,
    pub results_extractor_s: f64,
    pub summarizer_s: f64,
    pub translator_s: f64,
    pub keyword_s: f64,
    pub critic_s: f64,
    pub integrator_s: f64,
    /// Every node visited, in order. Duplicates appear on loop-back.
    pub execution_trace: Vec<String>,
    /// Destination of every routing decision, in order.
    pub routing_trace: Vec<String>,
    pub quant: QuantReport,
    /// Quantitative-looking lines in the notes' Results section.
    pub extracted_metrics_count: usize,
    pub recovered_results: String,
    /// Recovery fires at most once per run; this flag is the guard.
    pub recovery_attempted: bool,
    pub quality_f1: f64,
    pub quality_rouge_l: f64,
    pub judge_score: f64,
    pub judge_aggregate: f64,
}

impl PipelineState {
    pub fn new(input_text: impl Into<String>, config: PipelineConfig) -> Self {
        Self {
            config,
            input_text: input_text.into(),
            analysis_context: String::new(),
            notes: String::new(),
            summary: String::new(),
            summary_translated: String::new(),
            translator_note: String::new(),
            keywords: String::new(),
            keyword_note: String::new(),
            critic: String::new(),
            critic_score: 0.0,
            critic_loops: 0,
            meta: String::new(),
            confidence: String::new(),
            reader_s: 0.0,
            results_extractor_s: 0.0,
            summarizer_s: 0.0,
            translator_s: 0.0,
            keyword_s: 0.0,
            critic_s: 0.0,
            integrator_s: 0.0,
            execution_trace: Vec::new(),
            routing_trace: Vec::new(),
            quant: QuantReport::default(),
            extracted_metrics_count: 0,
            recovered_results: String::new(),
            recovery_attempted: false,
            quality_f1: 0.0,
            quality_rouge_l: 0.0,
            judge_score: 0.0,
            judge_aggregate: 0.0,
        }
    }

    pub(crate) fn trace(&mut self, stage: Stage) {
        self.execution_trace.push(stage.name().to_string());
    }

    pub(crate) fn route(&mut self, stage: Stage) {
        self.routing_trace.push(stage.name().to_string());
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
