use thiserror::Error;

use paperweave_core::PaperweaveError;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("missing node: {node}")]
    MissingNode { node: String },
    #[error("node '{node}' has no outgoing edge")]
    MissingEdge { node: String },
    #[error("entry point is not set")]
    MissingEntry,
    #[error("node '{node}' failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: PaperweaveError,
    },
    #[error("max steps exceeded: reached {reached}, limit {max}")]
    MaxStepsExceeded { max: usize, reached: usize },
}
