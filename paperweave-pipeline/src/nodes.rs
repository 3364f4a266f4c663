use std::time::Instant;

use paperweave_agents::{Critic, Integrator, Judge, Reader, ResultsExtractor, Summarizer};
use paperweave_core::{run_with_timeout, PaperweaveError};
use paperweave_graph::GraphNode;

use crate::graph::Stage;
use crate::quality::{rank_keywords, rouge_l_f1, unigram_f1};
use crate::signal::{
    count_numeric_results, detect_quantitative_signal, merge_recovered_results, parse_judge_score,
};
use crate::state::{round2, round3, PipelineState};
use crate::textprep::{build_analysis_context, truncate_text};

const TRANSLATED_SUMMARY_CHARS: usize = 400;
const KEYWORD_LIMIT: usize = 8;

/// Cleans the raw input into the analysis context and records the
/// quantitative-signal diagnosis used by post-reader routing.
pub(crate) struct RetrieverNode;

#[async_trait::async_trait]
impl GraphNode<PipelineState> for RetrieverNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Retriever);
        let preprocessed = match state.config.truncate_chars {
            Some(limit) => truncate_text(&state.input_text, limit),
            None => state.input_text.clone(),
        };
        state.analysis_context = build_analysis_context(&preprocessed);
        state.quant = detect_quantitative_signal(&state.analysis_context);
        Ok(())
    }
}

pub(crate) struct ReaderNode {
    pub agent: Reader,
}

#[async_trait::async_trait]
impl GraphNode<PipelineState> for ReaderNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Reader);
        let started = Instant::now();
        let agent = self.agent.clone();
        let config = state.config.clone();
        let input = if state.analysis_context.is_empty() {
            state.input_text.clone()
        } else {
            state.analysis_context.clone()
        };
        state.notes = run_with_timeout(config.timeout, async move {
            agent.run(&input, &config).await
        })
        .await?;
        state.reader_s = round2(started.elapsed().as_secs_f64());
        state.extracted_metrics_count = count_numeric_results(&state.notes);
        Ok(())
    }
}

/// Recovery detour: re-prompts a metric-only extraction over the source text
/// and fills gaps in the notes' Results section. Fires at most once per run.
pub(crate) struct ResultsExtractorNode {
    pub agent: ResultsExtractor,
}

#[async_trait::async_trait]
impl GraphNode<PipelineState> for ResultsExtractorNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::ResultsExtractor);
        let started = Instant::now();
        let agent = self.agent.clone();
        let config = state.config.clone();
        let context = state.analysis_context.clone();
        let recovered = run_with_timeout(config.timeout, async move {
            agent.run(&context, &config).await
        })
        .await?;
        state.notes = merge_recovered_results(&state.notes, &recovered);
        state.recovered_results = recovered;
        state.recovery_attempted = true;
        state.results_extractor_s = round2(started.elapsed().as_secs_f64());
        Ok(())
    }
}

/// Re-invoked on every retry iteration, always from the current notes. The
/// critique decides *whether* to retry; it is never injected into the
/// summarizer prompt.
pub(crate) struct SummarizerNode {
    pub agent: Summarizer,
}

#[async_trait::async_trait]
impl GraphNode<PipelineState> for SummarizerNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Summarizer);
        let started = Instant::now();
        let agent = self.agent.clone();
        let config = state.config.clone();
        let notes = state.notes.clone();
        state.summary = run_with_timeout(config.timeout, async move {
            agent.run(&notes, &config).await
        })
        .await?;
        state.summarizer_s = round2(started.elapsed().as_secs_f64());
        Ok(())
    }
}

pub(crate) struct TranslatorNode;

#[async_trait::async_trait]
impl GraphNode<PipelineState> for TranslatorNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Translator);
        let started = Instant::now();
        if state.summary.trim().is_empty() {
            state.summary_translated = "Translator skipped: empty summary".to_string();
            state.translator_note = "translator skipped (no summary to translate)".to_string();
        } else {
            state.summary_translated = format!(
                "[translated] {}",
                truncate_text(&state.summary, TRANSLATED_SUMMARY_CHARS)
            );
            state.translator_note = format!(
                "translator produced a {}-char tagged variant",
                state.summary_translated.chars().count()
            );
        }
        state.translator_s = round2(started.elapsed().as_secs_f64());
        Ok(())
    }
}

pub(crate) struct KeywordNode;

#[async_trait::async_trait]
impl GraphNode<PipelineState> for KeywordNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Keyword);
        let started = Instant::now();
        let mut keywords = rank_keywords(&state.summary, KEYWORD_LIMIT);
        let mut note = String::new();
        if keywords.is_empty() {
            keywords = rank_keywords(&state.notes, KEYWORD_LIMIT);
            note = "keyword extraction fell back to notes".to_string();
        }
        if keywords.is_empty() {
            keywords = rank_keywords(&state.analysis_context, KEYWORD_LIMIT);
            note = "keyword extraction fell back to analysis context".to_string();
        }
        if keywords.is_empty() {
            state.keywords = "Keywords: none".to_string();
            state.keyword_note = "no keyword source yielded tokens".to_string();
        } else {
            state.keywords = format!("Keywords: {}", keywords.join(", "));
            state.keyword_note = note;
        }
        state.keyword_s = round2(started.elapsed().as_secs_f64());
        Ok(())
    }
}

pub(crate) struct CriticNode {
    pub agent: Critic,
}

#[async_trait::async_trait]
impl GraphNode<PipelineState> for CriticNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Critic);
        let started = Instant::now();
        let agent = self.agent.clone();
        let config = state.config.clone();
        let notes = state.notes.clone();
        let summary = state.summary.clone();
        state.critic = run_with_timeout(config.timeout, async move {
            agent.run(&notes, &summary, &config).await
        })
        .await?;
        state.critic_s = round2(started.elapsed().as_secs_f64());
        Ok(())
    }
}

pub(crate) struct QualityNode;

#[async_trait::async_trait]
impl GraphNode<PipelineState> for QualityNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Quality);
        state.quality_f1 = unigram_f1(&state.notes, &state.summary);
        state.quality_rouge_l = rouge_l_f1(&state.notes, &state.summary);
        Ok(())
    }
}

/// Holistic 0-5 score from a lightweight judge prompt. Unlike the other
/// agent nodes, a failed call is not fatal: any failure scores 0.
pub(crate) struct JudgeNode {
    pub agent: Judge,
}

#[async_trait::async_trait]
impl GraphNode<PipelineState> for JudgeNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Judge);
        let agent = self.agent.clone();
        let config = state.config.clone();
        let notes = state.notes.clone();
        let summary = state.summary.clone();
        let reply = run_with_timeout(config.timeout, async move {
            agent.run(&notes, &summary, &config).await
        })
        .await;
        state.judge_score = match reply {
            Ok(text) => parse_judge_score(&text),
            Err(error) => {
                tracing::warn!(error = %error, "judge call failed, scoring 0");
                0.0
            }
        };
        Ok(())
    }
}

/// Mean of the strictly positive members of {quality_f1, judge_score/5,
/// critic_score}; 0 when none are positive.
pub(crate) struct AggregatorNode;

#[async_trait::async_trait]
impl GraphNode<PipelineState> for AggregatorNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Aggregator);
        let signals = [
            state.quality_f1,
            state.judge_score / 5.0,
            state.critic_score,
        ];
        let positive: Vec<f64> = signals.into_iter().filter(|value| *value > 0.0).collect();
        state.judge_aggregate = if positive.is_empty() {
            0.0
        } else {
            round3(positive.iter().sum::<f64>() / positive.len() as f64)
        };
        Ok(())
    }
}

pub(crate) struct IntegratorNode {
    pub agent: Integrator,
}

#[async_trait::async_trait]
impl GraphNode<PipelineState> for IntegratorNode {
    async fn run(&self, state: &mut PipelineState) -> Result<(), PaperweaveError> {
        state.trace(Stage::Integrator);
        let started = Instant::now();
        let agent = self.agent.clone();
        let config = state.config.clone();
        let notes = state.notes.clone();
        let summary = state.summary.clone();
        let critic = state.critic.clone();
        state.meta = run_with_timeout(config.timeout, async move {
            agent.run(&notes, &summary, &critic, &config).await
        })
        .await?;
        state.integrator_s = round2(started.elapsed().as_secs_f64());
        Ok(())
    }
}
