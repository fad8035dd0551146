//! Analyzer Registry - holds the techniques a pipeline runs

use super::r#trait::Analyzer;
use std::sync::Arc;

/// Ordered registry of analyzers.
///
/// Registration order is preserved so that pipeline output is stable.
/// Registering a second analyzer with an existing key replaces the first.
pub struct AnalyzerRegistry {
    analyzers: Vec<Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self {
            analyzers: Vec::new(),
        }
    }

    /// Register an analyzer
    pub fn register<A: Analyzer + 'static>(&mut self, analyzer: A) {
        let analyzer: Arc<dyn Analyzer> = Arc::new(analyzer);
        match self
            .analyzers
            .iter_mut()
            .find(|existing| existing.key() == analyzer.key())
        {
            Some(slot) => *slot = analyzer,
            None => self.analyzers.push(analyzer),
        }
    }

    /// Get an analyzer by key
    pub fn get(&self, key: &str) -> Option<Arc<dyn Analyzer>> {
        self.analyzers.iter().find(|a| a.key() == key).cloned()
    }

    /// List all registered analyzer keys
    pub fn list(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.key()).collect()
    }

    pub fn analyzers(&self) -> &[Arc<dyn Analyzer>] {
        &self.analyzers
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry with all built-in analyzers
pub fn create_default_registry() -> AnalyzerRegistry {
    use crate::detectors::*;

    let mut registry = AnalyzerRegistry::new();

    registry.register(chi_square::ChiSquareAnalyzer::new());
    registry.register(rs::RsAnalyzer::new());
    registry.register(histogram::HistogramAnalyzer::new());
    registry.register(pattern::PatternRecognizer::new());
    registry.register(pairs::PairsOfValuesAnalyzer::new());

    registry
}
