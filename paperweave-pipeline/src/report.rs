use serde::{Deserialize, Serialize};

use crate::state::PipelineState;

/// Flat, serializable result of one pipeline run — everything a consumer
/// needs without reaching back into the state record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub run_id: String,
    pub engine: String,
    /// The reader's structured notes.
    pub structured: String,
    pub summary: String,
    pub summary_translated: String,
    pub translator_note: String,
    pub keywords: String,
    pub keyword_note: String,
    pub critic: String,
    pub meta: String,
    pub confidence: String,
    pub reader_s: f64,
    pub results_extractor_s: f64,
    pub summarizer_s: f64,
    pub translator_s: f64,
    pub keyword_s: f64,
    pub critic_s: f64,
    pub integrator_s: f64,
    pub latency_s: f64,
    pub input_chars: usize,
    pub critic_score: f64,
    pub critic_loops: u32,
    pub quality_f1: f64,
    pub quality_rouge_l: f64,
    pub judge_score: f64,
    pub judge_aggregate: f64,
    pub quant_signal: String,
    pub quant_signal_label: String,
    pub quant_keyword_hits: Vec<String>,
    pub quant_number_samples: Vec<String>,
    pub extracted_metrics_count: usize,
    pub recovery_attempted: bool,
    pub execution_trace: Vec<String>,
    pub routing_trace: Vec<String>,
    pub graph_dot: Option<String>,
}

impl AnalysisReport {
    pub(crate) fn from_graph_state(
        state: &PipelineState,
        run_id: String,
        engine: &str,
        latency_s: f64,
        graph_dot: Option<String>,
    ) -> Self {
        let input_chars = if state.analysis_context.is_empty() {
            state.input_text.chars().count()
        } else {
            state.analysis_context.chars().count()
        };
        Self {
            run_id,
            engine: engine.to_string(),
            structured: state.notes.clone(),
            summary: state.summary.clone(),
            summary_translated: state.summary_translated.clone(),
            translator_note: state.translator_note.clone(),
            keywords: state.keywords.clone(),
            keyword_note: state.keyword_note.clone(),
            critic: state.critic.clone(),
            meta: state.meta.clone(),
            confidence: state.confidence.clone(),
            reader_s: state.reader_s,
            results_extractor_s: state.results_extractor_s,
            summarizer_s: state.summarizer_s,
            translator_s: state.translator_s,
            keyword_s: state.keyword_s,
            critic_s: state.critic_s,
            integrator_s: state.integrator_s,
            latency_s,
            input_chars,
            critic_score: state.critic_score,
            critic_loops: state.critic_loops,
            quality_f1: state.quality_f1,
            quality_rouge_l: state.quality_rouge_l,
            judge_score: state.judge_score,
            judge_aggregate: state.judge_aggregate,
            quant_signal: state.quant.signal.as_str().to_string(),
            quant_signal_label: state.quant.label.clone(),
            quant_keyword_hits: state.quant.keyword_hits.clone(),
            quant_number_samples: state.quant.number_samples.clone(),
            extracted_metrics_count: state.extracted_metrics_count,
            recovery_attempted: state.recovery_attempted,
            execution_trace: state.execution_trace.clone(),
            routing_trace: state.routing_trace.clone(),
            graph_dot,
        }
    }

    /// Error-shaped result for input that failed the validation gate: an
    /// explanatory `meta`, all timings zero, no nodes executed.
    pub(crate) fn invalid_input(run_id: String, engine: &str) -> Self {
        Self {
            run_id,
            engine: engine.to_string(),
            structured: "[Input empty or too short]".to_string(),
            meta: "No valid text detected. Provide more content or disable truncation."
                .to_string(),
            ..Self::default()
        }
    }

    /// Result shape for a pipeline variant compiled out of this build.
    pub(crate) fn disabled(run_id: String, engine: &str, reason: &str) -> Self {
        Self {
            run_id,
            engine: engine.to_string(),
            meta: format!("{engine} pipeline is disabled: {reason}"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_serialize_to_flat_json() {
        let report = AnalysisReport {
            run_id: "r-1".to_string(),
            engine: "graph".to_string(),
            summary: "a summary".to_string(),
            execution_trace: vec!["retriever".to_string(), "reader".to_string()],
            ..AnalysisReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["engine"], "graph");
        assert_eq!(json["execution_trace"][1], "reader");
        assert!(json["graph_dot"].is_null());
    }

    #[test]
    fn invalid_input_shape_matches_the_contract() {
        let report = AnalysisReport::invalid_input("r-2".to_string(), "graph");
        assert_eq!(report.structured, "[Input empty or too short]");
        assert!(!report.meta.is_empty());
        assert_eq!(report.latency_s, 0.0);
        assert!(report.execution_trace.is_empty());
    }
}
