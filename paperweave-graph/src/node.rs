use std::fmt::{Debug, Display};
use std::hash::Hash;

use paperweave_core::PaperweaveError;

/// Identifier of a node in a graph. Callers supply an enum; stringly-typed
/// ids are deliberately not supported.
pub trait NodeKey:
    Copy + Eq + Hash + Debug + Display + Send + Sync + 'static
{
}

impl<T> NodeKey for T where T: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// A step in the execution graph. Runs strictly sequentially with exclusive
/// access to the shared state; there is never more than one node mutating a
/// run's state at a time.
#[async_trait::async_trait]
pub trait GraphNode<S: Send>: Send + Sync {
    async fn run(&self, state: &mut S) -> Result<(), PaperweaveError>;
}
