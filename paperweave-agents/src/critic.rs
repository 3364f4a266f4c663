use std::sync::Arc;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_prompt::PromptTemplate;

use crate::chat_request;

const CRITIC_PROMPT: &str = "\
You are a rigorous scientific reviewer. Judge the SUMMARY only against the \
NOTES (the ground truth). Penalize any claim not supported by NOTES.\n\n\
RUBRIC (0-5 integers):\n\
- Coherence: logical flow, no contradictions.\n\
- Groundedness: claims are supported by NOTES.\n\
- Coverage: objective, method, results, limitations are covered.\n\
- Specificity: salient details included when NOTES provide them, especially \
metrics if present.\n\n\
OUTPUT FORMAT (exactly, no extra text):\n\
Coherence: <0-5>\n\
Groundedness: <0-5>\n\
Coverage: <0-5>\n\
Specificity: <0-5>\n\
Improvements:\n\
- <short fix #1>\n\
- <short fix #2>\n\n\
NOTES:\n{{notes}}\n\nSUMMARY:\n{{summary}}";

/// Scores a summary against the notes with an embedded 0-5 rubric.
#[derive(Clone)]
pub struct Critic {
    llm: Arc<dyn ChatLlm>,
}

impl Critic {
    pub fn new(llm: Arc<dyn ChatLlm>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        notes: &str,
        summary: &str,
        config: &PipelineConfig,
    ) -> Result<String, PaperweaveError> {
        let prompt =
            PromptTemplate::new(CRITIC_PROMPT).render(&[("notes", notes), ("summary", summary)])?;
        let response = self.llm.complete(chat_request(config, prompt)).await?;
        Ok(response.content.trim().to_string())
    }
}
