//! Facade crate: one dependency pulling in the paperweave stack, with the
//! heavier layers behind feature flags.

pub use paperweave_agents as agents;
pub use paperweave_core::*;
pub use paperweave_prompt as prompt;

#[cfg(feature = "graph")]
pub use paperweave_graph as graph;
#[cfg(feature = "llm")]
pub use paperweave_llm as llm;
#[cfg(feature = "pipeline")]
pub use paperweave_pipeline as pipeline;
#[cfg(feature = "pipeline")]
pub use paperweave_telemetry as telemetry;
