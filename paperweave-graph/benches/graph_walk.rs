use std::fmt;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tokio::runtime::Runtime;

use paperweave_core::PaperweaveError;
use paperweave_graph::{ExecutableGraph, ExecutionConfig, GraphBuilder, GraphNode, Transition};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Loop {
    Inc,
    Done,
}

impl fmt::Display for Loop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Loop::Inc => "inc",
            Loop::Done => "done",
        })
    }
}

#[derive(Default)]
struct LoopState {
    count: u32,
}

struct Inc;

#[async_trait::async_trait]
impl GraphNode<LoopState> for Inc {
    async fn run(&self, state: &mut LoopState) -> Result<(), PaperweaveError> {
        state.count += 1;
        Ok(())
    }
}

struct Done;

#[async_trait::async_trait]
impl GraphNode<LoopState> for Done {
    async fn run(&self, _state: &mut LoopState) -> Result<(), PaperweaveError> {
        Ok(())
    }
}

fn build_graph(iterations: u32) -> ExecutableGraph<LoopState, Loop> {
    GraphBuilder::new()
        .add_node(Loop::Inc, Inc)
        .add_node(Loop::Done, Done)
        .entry(Loop::Inc)
        .add_conditional_edge(
            Loop::Inc,
            &[Transition::To(Loop::Inc), Transition::To(Loop::Done)],
            Box::new(move |state: &mut LoopState| {
                if state.count < iterations {
                    Transition::To(Loop::Inc)
                } else {
                    Transition::To(Loop::Done)
                }
            }),
        )
        .add_edge_to_end(Loop::Done)
        .execution_config(ExecutionConfig {
            max_steps: iterations as usize + 2,
        })
        .build()
        .expect("bench graph")
}

fn bench_graph_walk(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let graph = build_graph(100);

    c.bench_function("walk_100_iteration_cycle", |b| {
        b.iter_batched(
            LoopState::default,
            |mut state| {
                runtime.block_on(graph.invoke(&mut state)).expect("walk");
                state
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_graph_walk);
criterion_main!(benches);
