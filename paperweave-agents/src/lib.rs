mod critic;
mod integrator;
mod judge;
mod reader;
mod results_extractor;
mod summarizer;

pub use critic::Critic;
pub use integrator::Integrator;
pub use judge::Judge;
pub use reader::Reader;
pub use results_extractor::ResultsExtractor;
pub use summarizer::Summarizer;

use paperweave_core::{ChatRequest, Message, PipelineConfig};

pub(crate) fn chat_request(config: &PipelineConfig, prompt: String) -> ChatRequest {
    ChatRequest {
        model: config.model.clone(),
        messages: vec![Message::user(prompt)],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}
