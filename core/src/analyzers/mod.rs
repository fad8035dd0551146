//! Analyzers module - the common steganalysis interface

mod registry;
mod r#trait;

pub use registry::{create_default_registry, AnalyzerRegistry};
pub use r#trait::{Analyzer, AnalyzerResult, Details, Metrics};

pub(crate) use r#trait::{clamp_confidence, round_to};
