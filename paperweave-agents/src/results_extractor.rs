use std::sync::Arc;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_prompt::PromptTemplate;

use crate::chat_request;

const RESULTS_EXTRACTOR_PROMPT: &str = "\
Extract ONLY the quantitative results from the TEXT below. Return bullets \
in the pattern:\n\
- <Task/Dataset>: <Metric>=<Value>\n\
Include model, dataset, and split when the text provides them. Use values \
exactly as written; never compute or round. Ignore years, section numbers, \
and page numbers. If the text reports no quantitative results, write \
exactly: No quantitative metrics reported in provided text.\n\n\
TEXT:\n{{content}}";

/// Recovery agent: a metric-only second pass over the source text, used when
/// the reader came back without the expected quantitative results.
#[derive(Clone)]
pub struct ResultsExtractor {
    llm: Arc<dyn ChatLlm>,
}

impl ResultsExtractor {
    pub fn new(llm: Arc<dyn ChatLlm>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        text: &str,
        config: &PipelineConfig,
    ) -> Result<String, PaperweaveError> {
        let prompt = PromptTemplate::new(RESULTS_EXTRACTOR_PROMPT).render(&[("content", text)])?;
        let response = self.llm.complete(chat_request(config, prompt)).await?;
        Ok(response.content.trim().to_string())
    }
}
