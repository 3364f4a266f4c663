mod error;
mod executor;
mod node;
mod topology;

pub use error::GraphError;
pub use executor::{
    ExecutableGraph, ExecutionConfig, GraphBuilder, Router, Transition,
};
pub use node::{GraphNode, NodeKey};
pub use topology::{EdgeKind, Topology};
