use std::sync::Arc;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_prompt::PromptTemplate;

use crate::chat_request;

const JUDGE_PROMPT: &str = "\
Score the SUMMARY against NOTES for coherence, groundedness, and coverage. \
Return a single integer 0-5 (0=worst, 5=best). No extra text.\n\n\
NOTES:\n{{notes}}\n\nSUMMARY:\n{{summary}}";

/// Lightweight LLM-as-a-judge: a single holistic 0-5 integer.
/// The caller parses and clamps the reply; any failure scores 0.
#[derive(Clone)]
pub struct Judge {
    llm: Arc<dyn ChatLlm>,
}

impl Judge {
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
            PromptTemplate::new(JUDGE_PROMPT).render(&[("notes", notes), ("summary", summary)])?;
        let response = self.llm.complete(chat_request(config, prompt)).await?;
        Ok(response.content.trim().to_string())
    }
}
