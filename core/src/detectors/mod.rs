//! Steganalysis techniques
//!
//! Each module implements one statistical heuristic over the color samples
//! of a pixel buffer. None of them reads alpha.

pub mod chi_square;
pub mod histogram;
pub mod pairs;
pub mod pattern;
pub mod rs;

pub use chi_square::ChiSquareAnalyzer;
pub use histogram::HistogramAnalyzer;
pub use pairs::PairsOfValuesAnalyzer;
pub use pattern::PatternRecognizer;
pub use rs::RsAnalyzer;
