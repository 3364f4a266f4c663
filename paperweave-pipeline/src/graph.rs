use std::fmt;
use std::sync::Arc;

use paperweave_agents::{Critic, Integrator, Judge, Reader, ResultsExtractor, Summarizer};
use paperweave_core::{ChatLlm, PipelineConfig};
use paperweave_graph::{
    ExecutableGraph, ExecutionConfig, GraphBuilder, GraphError, Transition,
};

use crate::nodes::{
    AggregatorNode, CriticNode, IntegratorNode, JudgeNode, KeywordNode, QualityNode, ReaderNode,
    ResultsExtractorNode, RetrieverNode, SummarizerNode, TranslatorNode,
};
use crate::routing::{post_critic_route, post_reader_route};
use crate::state::PipelineState;

/// The nodes of the analysis workflow. The integrator is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Retriever,
    Reader,
    ResultsExtractor,
    Summarizer,
    Translator,
    Keyword,
    Critic,
    Quality,
    Judge,
    Aggregator,
    Integrator,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Retriever => "retriever",
            Stage::Reader => "reader",
            Stage::ResultsExtractor => "results_extractor",
            Stage::Summarizer => "summarizer",
            Stage::Translator => "translator",
            Stage::Keyword => "keyword",
            Stage::Critic => "critic",
            Stage::Quality => "quality",
            Stage::Judge => "judge",
            Stage::Aggregator => "aggregator",
            Stage::Integrator => "integrator",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The agents a workflow needs, all sharing one LLM handle.
pub(crate) struct AgentSet {
    pub reader: Reader,
    pub results_extractor: ResultsExtractor,
    pub summarizer: Summarizer,
    pub critic: Critic,
    pub judge: Judge,
    pub integrator: Integrator,
}

impl AgentSet {
    pub fn new(llm: Arc<dyn ChatLlm>, summarizer_preamble: Option<String>) -> Self {
        let mut summarizer = Summarizer::new(Arc::clone(&llm));
        if let Some(preamble) = summarizer_preamble {
            summarizer = summarizer.with_preamble(preamble);
        }
        Self {
            reader: Reader::new(Arc::clone(&llm)),
            results_extractor: ResultsExtractor::new(Arc::clone(&llm)),
            summarizer,
            critic: Critic::new(Arc::clone(&llm)),
            judge: Judge::new(Arc::clone(&llm)),
            integrator: Integrator::new(llm),
        }
    }
}

/// Worst-case node visits: the fixed chain plus one retry cycle
/// (summarizer, translator, keyword, critic) per allowed loop, with slack
/// for the recovery detour.
fn step_budget(config: &PipelineConfig) -> usize {
    12 + config.max_critic_loops as usize * 4 + 4
}

/// Assembles the executable workflow:
///
/// ```text
/// retriever -> reader -> [results_extractor ->] summarizer -> translator
///   -> keyword -> critic -> (summarizer retry | quality -> judge | judge)
///   -> aggregator -> integrator -> END
/// ```
pub(crate) fn build_workflow(
    agents: AgentSet,
    config: &PipelineConfig,
) -> Result<ExecutableGraph<PipelineState, Stage>, GraphError> {
    GraphBuilder::new()
        .add_node(Stage::Retriever, RetrieverNode)
        .add_node(
            Stage::Reader,
            ReaderNode {
                agent: agents.reader,
            },
        )
        .add_node(
            Stage::ResultsExtractor,
            ResultsExtractorNode {
                agent: agents.results_extractor,
            },
        )
        .add_node(
            Stage::Summarizer,
            SummarizerNode {
                agent: agents.summarizer,
            },
        )
        .add_node(Stage::Translator, TranslatorNode)
        .add_node(Stage::Keyword, KeywordNode)
        .add_node(
            Stage::Critic,
            CriticNode {
                agent: agents.critic,
            },
        )
        .add_node(Stage::Quality, QualityNode)
        .add_node(
            Stage::Judge,
            JudgeNode {
                agent: agents.judge,
            },
        )
        .add_node(Stage::Aggregator, AggregatorNode)
        .add_node(
            Stage::Integrator,
            IntegratorNode {
                agent: agents.integrator,
            },
        )
        .entry(Stage::Retriever)
        .add_edge(Stage::Retriever, Stage::Reader)
        .add_conditional_edge(
            Stage::Reader,
            &[
                Transition::To(Stage::ResultsExtractor),
                Transition::To(Stage::Summarizer),
            ],
            Box::new(post_reader_route),
        )
        .add_edge(Stage::ResultsExtractor, Stage::Summarizer)
        .add_edge(Stage::Summarizer, Stage::Translator)
        .add_edge(Stage::Translator, Stage::Keyword)
        .add_edge(Stage::Keyword, Stage::Critic)
        .add_conditional_edge(
            Stage::Critic,
            &[
                Transition::To(Stage::Summarizer),
                Transition::To(Stage::Quality),
                Transition::To(Stage::Judge),
            ],
            Box::new(post_critic_route),
        )
        .add_edge(Stage::Quality, Stage::Judge)
        .add_edge(Stage::Judge, Stage::Aggregator)
        .add_edge(Stage::Aggregator, Stage::Integrator)
        .add_edge_to_end(Stage::Integrator)
        .execution_config(ExecutionConfig {
            max_steps: step_budget(config),
        })
        .build()
}
