use std::str::FromStr;
use std::sync::Arc;

use paperweave_core::{ChatLlm, PaperweaveError, PipelineConfig};
use paperweave_telemetry::TelemetrySink;

use crate::report::AnalysisReport;
use crate::run::GraphPipeline;
use crate::sequential::SequentialPipeline;

/// Default dev-set location for the bootstrap engine, matching the layout
/// the CLI documents.
#[cfg(feature = "bootstrap")]
const DEFAULT_DEV_SET: &str = "dev-set/dev.jsonl";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    Sequential,
    Graph,
    /// Graph engine with few-shot demos harvested from a dev set. Only
    /// functional when built with the `bootstrap` feature; otherwise the
    /// factory hands out a fixed disabled-result producer.
    Bootstrap,
}

impl Engine {
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Sequential => "sequential",
            Engine::Graph => "graph",
            Engine::Bootstrap => "bootstrap",
        }
    }
}

impl FromStr for Engine {
    type Err = PaperweaveError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Engine::Sequential),
            "graph" => Ok(Engine::Graph),
            "bootstrap" => Ok(Engine::Bootstrap),
            other => Err(PaperweaveError::InvalidConfig(format!(
                "unknown engine '{other}' (expected sequential, graph, or bootstrap)"
            ))),
        }
    }
}

/// A ready-to-run pipeline, whichever engine backs it.
#[async_trait::async_trait]
pub trait PipelineRunner: Send + Sync {
    fn engine(&self) -> Engine;
    async fn run(&self, raw_text: &str) -> Result<AnalysisReport, PaperweaveError>;
}

#[async_trait::async_trait]
impl PipelineRunner for GraphPipeline {
    fn engine(&self) -> Engine {
        Engine::Graph
    }

    async fn run(&self, raw_text: &str) -> Result<AnalysisReport, PaperweaveError> {
        GraphPipeline::run(self, raw_text).await
    }
}

#[async_trait::async_trait]
impl PipelineRunner for SequentialPipeline {
    fn engine(&self) -> Engine {
        Engine::Sequential
    }

    async fn run(&self, raw_text: &str) -> Result<AnalysisReport, PaperweaveError> {
        SequentialPipeline::run(self, raw_text).await
    }
}

/// Stand-in for an engine variant this build cannot run. Returns a clearly
/// labeled result with zeroed numerics instead of failing the caller.
#[cfg(not(feature = "bootstrap"))]
struct DisabledRunner {
    engine: Engine,
    reason: &'static str,
}

#[cfg(not(feature = "bootstrap"))]
#[async_trait::async_trait]
impl PipelineRunner for DisabledRunner {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn run(&self, _raw_text: &str) -> Result<AnalysisReport, PaperweaveError> {
        Ok(AnalysisReport::disabled(
            uuid::Uuid::new_v4().to_string(),
            self.engine.name(),
            self.reason,
        ))
    }
}

/// Capability-checked factory: decides once, at startup, whether an engine
/// is available in this build and hands out either the real pipeline or a
/// disabled-result producer.
pub fn runner_for(
    engine: Engine,
    llm: Arc<dyn ChatLlm>,
    config: PipelineConfig,
    telemetry: Arc<dyn TelemetrySink>,
) -> Result<Box<dyn PipelineRunner>, PaperweaveError> {
    match engine {
        Engine::Sequential => Ok(Box::new(
            SequentialPipeline::new(llm, config)?.with_telemetry(telemetry),
        )),
        Engine::Graph => Ok(Box::new(
            GraphPipeline::new(llm, config)?.with_telemetry(telemetry),
        )),
        #[cfg(feature = "bootstrap")]
        Engine::Bootstrap => Ok(Box::new(
            crate::bootstrap::BootstrapPipeline::new(
                llm,
                config,
                std::path::Path::new(DEFAULT_DEV_SET),
            )?
            .with_telemetry(telemetry),
        )),
        #[cfg(not(feature = "bootstrap"))]
        Engine::Bootstrap => {
            let _ = (llm, config, telemetry);
            Ok(Box::new(DisabledRunner {
                engine: Engine::Bootstrap,
                reason: "built without the `bootstrap` feature",
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_names_round_trip() {
        for engine in [Engine::Sequential, Engine::Graph, Engine::Bootstrap] {
            assert_eq!(engine.name().parse::<Engine>().unwrap(), engine);
        }
        assert!("pregel".parse::<Engine>().is_err());
    }

    #[cfg(not(feature = "bootstrap"))]
    #[tokio::test]
    async fn bootstrap_without_the_feature_is_disabled_not_fatal() {
        use paperweave_core::{ChatRequest, ChatResponse};
        use paperweave_telemetry::NullSink;

        struct Inert;

        #[async_trait::async_trait]
        impl ChatLlm for Inert {
            async fn complete(
                &self,
                _request: ChatRequest,
            ) -> Result<ChatResponse, PaperweaveError> {
                Ok(ChatResponse {
                    content: String::new(),
                })
            }
        }

        let runner = runner_for(
            Engine::Bootstrap,
            Arc::new(Inert),
            PipelineConfig::default(),
            Arc::new(NullSink),
        )
        .unwrap();
        let report = runner.run("any input at all").await.unwrap();
        assert_eq!(report.engine, "bootstrap");
        assert!(report.meta.contains("disabled"));
        assert_eq!(report.latency_s, 0.0);
        assert_eq!(report.judge_aggregate, 0.0);
        assert!(report.execution_trace.is_empty());
    }
}
