use paperweave_graph::Transition;

use crate::graph::Stage;
use crate::signal::extract_critic_score;
use crate::state::{PipelineState, QuantSignal};

/// Summaries shorter than this skip the lexical-overlap metrics and go
/// straight to the judge.
const QUALITY_MIN_SUMMARY_CHARS: usize = 100;

/// Retry when the critic score falls strictly below this; 0.5 itself does
/// not retry.
const RETRY_THRESHOLD: f64 = 0.5;

/// Post-reader branch: take the one-shot recovery detour when quantitative
/// content was expected but the reader came back without any.
pub(crate) fn post_reader_route(state: &mut PipelineState) -> Transition<Stage> {
    let expects_metrics = matches!(state.quant.signal, QuantSignal::Yes | QuantSignal::Maybe);
    let destination = if expects_metrics
        && state.extracted_metrics_count < 1
        && !state.recovery_attempted
    {
        Stage::ResultsExtractor
    } else {
        Stage::Summarizer
    };
    state.route(destination);
    tracing::debug!(
        signal = state.quant.signal.as_str(),
        metrics = state.extracted_metrics_count,
        destination = destination.name(),
        "post-reader routing"
    );
    Transition::To(destination)
}

/// Post-critic branch: derive the critic score, loop back to the summarizer
/// while the score is poor and the loop budget allows, otherwise move on —
/// through the quality metrics when the summary is long enough to make them
/// meaningful, directly to the judge when it is not.
pub(crate) fn post_critic_route(state: &mut PipelineState) -> Transition<Stage> {
    let fallback = (state.quality_f1 > 0.0).then_some(state.quality_f1);
    state.critic_score = extract_critic_score(&state.critic, fallback);

    let destination = if state.critic_score < RETRY_THRESHOLD
        && state.critic_loops < state.config.max_critic_loops
    {
        state.critic_loops += 1;
        Stage::Summarizer
    } else if state.summary.chars().count() >= QUALITY_MIN_SUMMARY_CHARS {
        Stage::Quality
    } else {
        Stage::Judge
    };
    state.route(destination);
    tracing::debug!(
        score = state.critic_score,
        loops = state.critic_loops,
        destination = destination.name(),
        "post-critic routing"
    );
    Transition::To(destination)
}

#[cfg(test)]
mod tests {
    use paperweave_core::PipelineConfig;

    use super::*;
    use crate::state::QuantReport;

    fn base_state() -> PipelineState {
        PipelineState::new("input", PipelineConfig::default())
    }

    #[test]
    fn reader_routes_to_recovery_when_metrics_are_missing() {
        let mut state = base_state();
        state.quant = QuantReport {
            signal: QuantSignal::Maybe,
            ..QuantReport::default()
        };
        state.extracted_metrics_count = 0;
        assert_eq!(
            post_reader_route(&mut state),
            Transition::To(Stage::ResultsExtractor)
        );
        assert_eq!(state.routing_trace, vec!["results_extractor"]);
    }

    #[test]
    fn reader_skips_recovery_when_metrics_were_found() {
        let mut state = base_state();
        state.quant.signal = QuantSignal::Yes;
        state.extracted_metrics_count = 2;
        assert_eq!(post_reader_route(&mut state), Transition::To(Stage::Summarizer));
    }

    #[test]
    fn reader_skips_recovery_without_a_signal() {
        let mut state = base_state();
        state.quant.signal = QuantSignal::No;
        state.extracted_metrics_count = 0;
        assert_eq!(post_reader_route(&mut state), Transition::To(Stage::Summarizer));
    }

    #[test]
    fn recovery_never_fires_twice() {
        let mut state = base_state();
        state.quant.signal = QuantSignal::Yes;
        state.extracted_metrics_count = 0;
        state.recovery_attempted = true;
        assert_eq!(post_reader_route(&mut state), Transition::To(Stage::Summarizer));
    }

    #[test]
    fn low_critic_score_loops_back_until_the_bound() {
        let mut state = base_state();
        state.config.max_critic_loops = 2;
        state.critic = "Coherence: 1".to_string();

        assert_eq!(post_critic_route(&mut state), Transition::To(Stage::Summarizer));
        assert_eq!(state.critic_loops, 1);
        assert_eq!(post_critic_route(&mut state), Transition::To(Stage::Summarizer));
        assert_eq!(state.critic_loops, 2);
        // Budget exhausted: proceeds regardless of score.
        assert_eq!(post_critic_route(&mut state), Transition::To(Stage::Judge));
        assert_eq!(state.critic_loops, 2);
    }

    #[test]
    fn boundary_score_of_half_does_not_retry() {
        let mut state = base_state();
        state.critic = "no numbers in this critique".to_string();
        let transition = post_critic_route(&mut state);
        assert_eq!(state.critic_score, 0.5);
        assert_eq!(transition, Transition::To(Stage::Judge));
        assert_eq!(state.critic_loops, 0);
    }

    #[test]
    fn good_score_with_a_long_summary_routes_through_quality() {
        let mut state = base_state();
        state.critic = "Coherence: 4".to_string();
        state.summary = "s".repeat(150);
        assert_eq!(post_critic_route(&mut state), Transition::To(Stage::Quality));
    }

    #[test]
    fn good_score_with_a_short_summary_skips_quality() {
        let mut state = base_state();
        state.critic = "Coherence: 4".to_string();
        state.summary = "tiny".to_string();
        assert_eq!(post_critic_route(&mut state), Transition::To(Stage::Judge));
    }

    #[test]
    fn unparseable_critique_uses_the_quality_fallback() {
        let mut state = base_state();
        state.critic = "eloquent but numberless".to_string();
        state.quality_f1 = 0.3;
        state.config.max_critic_loops = 1;
        let transition = post_critic_route(&mut state);
        assert_eq!(state.critic_score, 0.3);
        assert_eq!(transition, Transition::To(Stage::Summarizer));
    }
}
