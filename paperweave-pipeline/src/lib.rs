#[cfg(feature = "bootstrap")]
mod bootstrap;
mod dot;
mod engine;
mod graph;
mod nodes;
mod quality;
mod report;
mod routing;
mod run;
mod sequential;
mod signal;
mod state;
mod textprep;

#[cfg(feature = "bootstrap")]
pub use bootstrap::{load_dev_set, BootstrapPipeline, DevExample};
pub use engine::{runner_for, Engine, PipelineRunner};
pub use graph::Stage;
pub use quality::{rank_keywords, rouge_l_f1, unigram_f1};
pub use report::AnalysisReport;
pub use run::GraphPipeline;
pub use sequential::SequentialPipeline;
pub use signal::{
    count_numeric_results, detect_quantitative_signal, extract_confidence_line,
    extract_critic_score, RESULTS_PLACEHOLDER,
};
pub use state::{PipelineState, QuantReport, QuantSignal};
pub use textprep::{build_analysis_context, truncate_text};
