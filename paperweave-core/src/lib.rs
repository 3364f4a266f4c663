mod config;
mod error;
mod llm;
mod timeout;

pub use config::PipelineConfig;
pub use error::PaperweaveError;
pub use llm::{ChatLlm, ChatRequest, ChatResponse, Message, Role};
pub use timeout::{run_with_timeout, TIMEOUT_SENTINEL};
