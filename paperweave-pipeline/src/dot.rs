use std::fmt::Write;

use paperweave_graph::{EdgeKind, Topology};

use crate::state::PipelineState;

fn node_annotation(name: &str, state: &PipelineState) -> String {
    match name {
        "retriever" => "Retriever/Preprocess\\nAnalysis Context".to_string(),
        "reader" => format!("Reader - Notes\\n{:.2}s", state.reader_s),
        "results_extractor" => format!(
            "Results Extractor\\n{:.2}s",
            state.results_extractor_s
        ),
        "summarizer" => format!("Summarizer - Summary\\n{:.2}s", state.summarizer_s),
        "translator" => "Translator".to_string(),
        "keyword" => "Keywords".to_string(),
        "critic" => format!(
            "Critic - Review\\nScore: {:.2}\\n{:.2}s",
            state.critic_score, state.critic_s
        ),
        "quality" => format!(
            "Quality\\nF1: {:.3} / ROUGE-L: {:.3}",
            state.quality_f1, state.quality_rouge_l
        ),
        "judge" => format!("LLM Judge\\n{:.1}/5", state.judge_score),
        "aggregator" => format!("Aggregate\\n{:.3}", state.judge_aggregate),
        "integrator" => format!("Integrator - Meta Summary\\n{:.2}s", state.integrator_s),
        other => other.to_string(),
    }
}

/// Renders the executed topology as Graphviz DOT, annotated with this run's
/// timings, critic score and loop count.
pub(crate) fn annotated_dot(topology: &Topology, state: &PipelineState) -> String {
    let mut out = String::new();
    out.push_str("digraph G {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str(
        "  node [shape=box, style=\"rounded,filled\", color=\"#667eea\", fillcolor=\"#f0f4ff\", fontname=\"Inter\"];\n",
    );
    out.push_str("  edge [color=\"#9ca3af\"];\n\n");

    let _ = writeln!(
        out,
        "  input [label=\"Input\\n(raw text)\", fillcolor=\"#e0e7ff\"];"
    );
    for name in topology.node_names() {
        let _ = writeln!(
            out,
            "  {name} [label=\"{}\"];",
            node_annotation(&name, state)
        );
    }
    let _ = writeln!(
        out,
        "  output [label=\"Output\\n(notes, summary, critic, meta)\", fillcolor=\"#e0e7ff\"];"
    );
    out.push('\n');

    out.push_str("  input -> retriever;\n");
    for (from, to, kind) in topology.edges() {
        match kind {
            EdgeKind::Fixed => {
                let _ = writeln!(out, "  {from} -> {to};");
            }
            EdgeKind::Conditional if from == "critic" && to == "summarizer" => {
                let _ = writeln!(
                    out,
                    "  {from} -> {to} [label=\"rework (score < 0.5, loops: {})\", style=\"dotted\"];",
                    state.critic_loops
                );
            }
            EdgeKind::Conditional => {
                let _ = writeln!(out, "  {from} -> {to} [style=\"dotted\"];");
            }
        }
    }
    out.push_str("  integrator -> output;\n");
    out.push_str("}\n");
    out
}
