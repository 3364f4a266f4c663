use std::sync::Arc;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_prompt::PromptTemplate;

use crate::chat_request;

const SUMMARIZER_PROMPT: &str = "\
Produce a concise scientific summary (200-300 words) of the paper described \
in the NOTES. Cover, in this order: Objective -> Method (what/how) -> \
Results (numbers if present; otherwise say 'not reported') -> Limitations \
-> 3-5 Practical Takeaways (bulleted). Avoid speculation or citations. Do \
NOT invent metrics; if NOTES have no numbers, write 'not reported'.\n\n\
NOTES:\n{{notes}}";

/// Turns structured notes into a prose summary. An optional preamble (e.g.
/// few-shot demos harvested from a dev set) is prepended verbatim.
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn ChatLlm>,
    preamble: Option<String>,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn ChatLlm>) -> Self {
        Self {
            llm,
            preamble: None,
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub async fn run(
        &self,
        notes: &str,
        config: &PipelineConfig,
    ) -> Result<String, PaperweaveError> {
        let mut prompt = PromptTemplate::new(SUMMARIZER_PROMPT).render(&[("notes", notes)])?;
        if let Some(preamble) = &self.preamble {
            prompt = format!("{preamble}\n\n{prompt}");
        }
        let response = self.llm.complete(chat_request(config, prompt)).await?;
        Ok(response.content.trim().to_string())
    }
}
