use std::sync::Arc;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_prompt::PromptTemplate;

use crate::chat_request;

const INTEGRATOR_PROMPT: &str = "\
Create a final Meta Summary. Combine SUMMARY with CRITIC. Base everything \
on NOTES. Do not invent facts, metrics, numbers, or citations.\n\n\
Start with Title:\n\
Title: <copy exactly from NOTES Title; if 'not reported', write 'not reported'>\n\n\
Then output:\n\
1) Five bullets with **bold labels**: Objective, Method, Results, \
Limitations, Takeaways\n\
2) Two open technical questions\n\
3) One-line Confidence: High if all rubric scores >=4, Medium if any score \
is 3, Low if any score is <=2. Mention missing or weak numeric evidence if \
relevant. Format: Confidence: <High/Medium/Low> - <one short reason>.\n\n\
Results rules: if NOTES Results has quantitative metrics, copy them with \
context and do not change numbers. If NOTES Results says 'No quantitative \
metrics reported in provided text.', write that exact sentence and no \
performance numbers. If CRITIC flags unsupported claims, drop them or mark \
as 'not reported'.\n\n\
NOTES:\n{{notes}}\n\nSUMMARY:\n{{summary}}\n\nCRITIC:\n{{critic}}";

/// Fuses notes, summary and critique into the final meta-summary.
#[derive(Clone)]
pub struct Integrator {
    llm: Arc<dyn ChatLlm>,
}

impl Integrator {
    pub fn new(llm: Arc<dyn ChatLlm>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        notes: &str,
        summary: &str,
        critic: &str,
        config: &PipelineConfig,
    ) -> Result<String, PaperweaveError> {
        let prompt = PromptTemplate::new(INTEGRATOR_PROMPT).render(&[
            ("notes", notes),
            ("summary", summary),
            ("critic", critic),
        ])?;
        let response = self.llm.complete(chat_request(config, prompt)).await?;
        Ok(response.content.trim().to_string())
    }
}
