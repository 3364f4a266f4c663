use std::sync::{Arc, Mutex};

use paperweave_agents::{Critic, Integrator, Judge, Reader, Summarizer};
use paperweave_core::{ChatLlm, ChatRequest, ChatResponse, PaperweaveError, PipelineConfig};

/// Records every request and echoes a fixed reply.
struct Capture {
    requests: Mutex<Vec<ChatRequest>>,
}

impl Capture {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        requests
            .last()
            .and_then(|request| request.messages.last())
            .map(|message| message.content.clone())
            .unwrap_or_default()
    }

    fn last_request(&self) -> ChatRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl ChatLlm for Capture {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, PaperweaveError> {
        self.requests.lock().unwrap().push(request);
        Ok(ChatResponse {
            content: "  reply  ".to_string(),
        })
    }
}

fn config() -> PipelineConfig {
    PipelineConfig {
        model: "test-model".to_string(),
        max_tokens: 128,
        temperature: 0.0,
        ..PipelineConfig::default()
    }
}

#[tokio::test]
async fn reader_binds_the_text_and_trims_the_reply() {
    let capture = Capture::new();
    let reader = Reader::new(capture.clone());
    let reply = reader.run("the paper text", &config()).await.unwrap();

    assert_eq!(reply, "reply");
    let prompt = capture.last_prompt();
    assert!(prompt.contains("TEXT:\nthe paper text"));
    assert!(!prompt.contains("{{"));

    let request = capture.last_request();
    assert_eq!(request.model, "test-model");
    assert_eq!(request.max_tokens, 128);
}

#[tokio::test]
async fn critic_and_judge_bind_notes_and_summary() {
    let capture = Capture::new();
    Critic::new(capture.clone())
        .run("the notes", "the summary", &config())
        .await
        .unwrap();
    let prompt = capture.last_prompt();
    assert!(prompt.contains("NOTES:\nthe notes"));
    assert!(prompt.contains("SUMMARY:\nthe summary"));

    Judge::new(capture.clone())
        .run("judge notes", "judge summary", &config())
        .await
        .unwrap();
    let prompt = capture.last_prompt();
    assert!(prompt.contains("judge notes"));
    assert!(prompt.contains("Return a single integer 0-5"));
}

#[tokio::test]
async fn integrator_binds_all_three_inputs() {
    let capture = Capture::new();
    Integrator::new(capture.clone())
        .run("n", "s", "c", &config())
        .await
        .unwrap();
    let prompt = capture.last_prompt();
    assert!(prompt.contains("NOTES:\nn"));
    assert!(prompt.contains("SUMMARY:\ns"));
    assert!(prompt.contains("CRITIC:\nc"));
}

#[tokio::test]
async fn summarizer_preamble_is_prepended_verbatim() {
    let capture = Capture::new();
    Summarizer::new(capture.clone())
        .with_preamble("WORKED EXAMPLES GO HERE")
        .run("the notes", &config())
        .await
        .unwrap();
    let prompt = capture.last_prompt();
    assert!(prompt.starts_with("WORKED EXAMPLES GO HERE\n\n"));
    assert!(prompt.contains("NOTES:\nthe notes"));
}
