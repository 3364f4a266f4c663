use std::collections::HashMap;

use crate::node::{GraphNode, NodeKey};
use crate::topology::{EdgeKind, Topology};
use crate::GraphError;

/// Where a walk goes after a node completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition<N> {
    To(N),
    End,
}

/// A routing predicate: inspects (and may annotate) the state, then names the
/// next node. All retry semantics live here, never in the executor.
pub type Router<S, N> = Box<dyn Fn(&mut S) -> Transition<N> + Send + Sync>;

enum Edge<S, N> {
    Direct(Transition<N>),
    Conditional {
        router: Router<S, N>,
        /// Declared destinations, for validation and topology rendering.
        branches: Vec<Transition<N>>,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct ExecutionConfig {
    /// Backstop against runaway cycles. Routing predicates are expected to
    /// bound their own loops; this limit exists so a buggy predicate still
    /// terminates.
    pub max_steps: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { max_steps: 50 }
    }
}

pub struct GraphBuilder<S: Send, N: NodeKey> {
    nodes: Vec<(N, Box<dyn GraphNode<S>>)>,
    edges: HashMap<N, Edge<S, N>>,
    entry: Option<N>,
    config: ExecutionConfig,
}

impl<S: Send, N: NodeKey> Default for GraphBuilder<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send, N: NodeKey> GraphBuilder<S, N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: HashMap::new(),
            entry: None,
            config: ExecutionConfig::default(),
        }
    }

    pub fn add_node(mut self, id: N, node: impl GraphNode<S> + 'static) -> Self {
        self.nodes.push((id, Box::new(node)));
        self
    }

    pub fn entry(mut self, id: N) -> Self {
        self.entry = Some(id);
        self
    }

    pub fn add_edge(mut self, from: N, to: N) -> Self {
        self.edges.insert(from, Edge::Direct(Transition::To(to)));
        self
    }

    pub fn add_edge_to_end(mut self, from: N) -> Self {
        self.edges.insert(from, Edge::Direct(Transition::End));
        self
    }

    /// Adds a conditional edge. `branches` must list every destination the
    /// router can return; undeclared targets fail validation at build time
    /// and would otherwise surface as `MissingNode` mid-walk.
    pub fn add_conditional_edge(
        mut self,
        from: N,
        branches: &[Transition<N>],
        router: Router<S, N>,
    ) -> Self {
        self.edges.insert(
            from,
            Edge::Conditional {
                router,
                branches: branches.to_vec(),
            },
        );
        self
    }

    pub fn execution_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ExecutableGraph<S, N>, GraphError> {
        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        let mut nodes = HashMap::new();
        let mut order = Vec::new();
        for (id, node) in self.nodes {
            if nodes.insert(id, node).is_none() {
                order.push(id);
            }
        }

        if !nodes.contains_key(&entry) {
            return Err(GraphError::MissingNode {
                node: entry.to_string(),
            });
        }
        for id in &order {
            let edge = self.edges.get(id).ok_or_else(|| GraphError::MissingEdge {
                node: id.to_string(),
            })?;
            let targets: Vec<Transition<N>> = match edge {
                Edge::Direct(target) => vec![*target],
                Edge::Conditional { branches, .. } => branches.clone(),
            };
            for target in targets {
                if let Transition::To(to) = target {
                    if !nodes.contains_key(&to) {
                        return Err(GraphError::MissingNode {
                            node: to.to_string(),
                        });
                    }
                }
            }
        }

        let topology = Topology::from_edges(
            order.iter().map(|id| id.to_string()).collect(),
            order
                .iter()
                .filter_map(|id| self.edges.get(id).map(|edge| (id, edge)))
                .flat_map(|(id, edge)| {
                    let (kind, targets): (EdgeKind, Vec<Transition<N>>) = match edge {
                        Edge::Direct(target) => (EdgeKind::Fixed, vec![*target]),
                        Edge::Conditional { branches, .. } => {
                            (EdgeKind::Conditional, branches.clone())
                        }
                    };
                    targets.into_iter().filter_map(move |target| match target {
                        Transition::To(to) => Some((id.to_string(), to.to_string(), kind)),
                        Transition::End => None,
                    })
                })
                .collect(),
        );

        Ok(ExecutableGraph {
            nodes,
            edges: self.edges,
            entry,
            config: self.config,
            topology,
        })
    }
}

pub struct ExecutableGraph<S: Send, N: NodeKey> {
    nodes: HashMap<N, Box<dyn GraphNode<S>>>,
    edges: HashMap<N, Edge<S, N>>,
    entry: N,
    config: ExecutionConfig,
    topology: Topology,
}

impl<S: Send, N: NodeKey> ExecutableGraph<S, N> {
    /// Walks the graph from the entry node until a terminal transition,
    /// mutating `state` in place. Node errors fail the walk immediately; the
    /// executor performs no retries of its own.
    pub async fn invoke(&self, state: &mut S) -> Result<(), GraphError> {
        let mut current = self.entry;
        let mut steps = 0usize;
        loop {
            steps += 1;
            if steps > self.config.max_steps {
                return Err(GraphError::MaxStepsExceeded {
                    max: self.config.max_steps,
                    reached: steps,
                });
            }

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::MissingNode {
                    node: current.to_string(),
                })?;
            tracing::debug!(node = %current, step = steps, "executing node");
            node.run(state)
                .await
                .map_err(|source| GraphError::NodeFailed {
                    node: current.to_string(),
                    source,
                })?;

            let edge = self
                .edges
                .get(&current)
                .ok_or_else(|| GraphError::MissingEdge {
                    node: current.to_string(),
                })?;
            let next = match edge {
                Edge::Direct(target) => *target,
                Edge::Conditional { router, .. } => router(state),
            };
            match next {
                Transition::End => return Ok(()),
                Transition::To(to) => {
                    tracing::debug!(from = %current, to = %to, "transition");
                    current = to;
                }
            }
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }
}
