//! Embedding method identification
//!
//! Resolves a best-guess technique label for images already judged as
//! detected. The pattern recognizer is trusted first, then chi-square.

use crate::analyzers::Details;
use crate::catalog::Signature;
use crate::detectors::{chi_square, pattern};

pub const UNKNOWN_METHOD: &str = "UNKNOWN METHOD";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodIdentifier {
    pattern_threshold: f64,
    chi_square_threshold: f64,
}

impl MethodIdentifier {
    pub fn new() -> Self {
        Self {
            pattern_threshold: 30.0,
            chi_square_threshold: 60.0,
        }
    }

    pub fn identify(&self, details: &Details) -> String {
        let pattern = details
            .get(pattern::KEY)
            .filter(|r| r.confidence > self.pattern_threshold)
            .and_then(|r| r.detected_pattern());
        if let Some(signature) = pattern {
            return signature.method_label();
        }

        // Chi-square is most sensitive to naive replacement
        if details
            .get(chi_square::KEY)
            .is_some_and(|r| r.confidence > self.chi_square_threshold)
        {
            return Signature::LsbReplacement.method_label();
        }

        UNKNOWN_METHOD.to_string()
    }
}

impl Default for MethodIdentifier {
    fn default() -> Self {
        Self::new()
    }
}
