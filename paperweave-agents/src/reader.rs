use std::sync::Arc;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_prompt::PromptTemplate;

use crate::chat_request;

const READER_PROMPT: &str = "\
You are a careful scientific note-taker. Work only with the TEXT below. \
Do not invent facts. Do not include author info. \
If a field is missing in TEXT, write 'not reported'. Do not guess.\n\n\
Return notes in this Markdown schema:\n\n\
Title: <copy exactly from TEXT, join multi-line titles with spaces, or 'not reported'>\n\
Objective: <1-2 sentences or 'not reported'>\n\
Methods: <technique/model, training/eval setup, tooling, or 'not reported'>\n\
Datasets/Corpora: <names or 'not reported'>\n\
Results:\n\
<EITHER list quantitative outcomes as bullets in the pattern \
<Task/Dataset>: <Metric>=<Value> OR write exactly: No quantitative metrics \
reported in provided text.>\n\
Metrics (BLEU/F1/Acc/etc): <metric names only, no values, or 'not reported'>\n\
Contributions: <main contribution, secondary, or 'not reported'>\n\
Limitations: <short phrase or 'not reported'>\n\
Applications/Use-cases: <short phrase or 'not reported'>\n\
Notes: <any other important detail or 'not reported'>\n\n\
Results rules: look for tables, scores, percentages, p-values, ROUGE, BLEU, \
F1, Acc, EM, AUC. If metrics exist, extract at least two results with \
context (model, dataset, split). Use values exactly as written; never \
compute, round, or guess. Do not treat years, section numbers, or page \
numbers as results.\n\n\
TEXT:\n{{content}}";

/// Extracts structured notes from cleaned paper text.
#[derive(Clone)]
pub struct Reader {
    llm: Arc<dyn ChatLlm>,
}

impl Reader {
    pub fn new(llm: Arc<dyn ChatLlm>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        text: &str,
        config: &PipelineConfig,
    ) -> Result<String, PaperweaveError> {
        let prompt = PromptTemplate::new(READER_PROMPT).render(&[("content", text)])?;
        let response = self.llm.complete(chat_request(config, prompt)).await?;
        Ok(response.content.trim().to_string())
    }
}
