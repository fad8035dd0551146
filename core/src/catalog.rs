//! Embedding method catalog
//!
//! Static reference table of the embedding techniques the pattern
//! recognizer knows how to score. Read-only for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature key of a known embedding technique
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Signature {
    LsbReplacement,
    LsbMatching,
    F5,
    Steghide,
    Hugo,
    DctBased,
}

impl Signature {
    /// All signatures in catalog order
    pub const ALL: [Signature; 6] = [
        Signature::LsbReplacement,
        Signature::LsbMatching,
        Signature::F5,
        Signature::Steghide,
        Signature::Hugo,
        Signature::DctBased,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Signature::LsbReplacement => "lsb_replacement",
            Signature::LsbMatching => "lsb_matching",
            Signature::F5 => "f5",
            Signature::Steghide => "steghide",
            Signature::Hugo => "hugo",
            Signature::DctBased => "dct_based",
        }
    }

    /// Lowercase label with underscores as spaces, e.g. `lsb replacement`
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Uppercase label reported as the detected method, e.g. `LSB REPLACEMENT`
    pub fn method_label(&self) -> String {
        self.label().to_uppercase()
    }

    /// Catalog entry describing this technique
    pub fn method(&self) -> &'static EmbeddingMethod {
        // ALL and EMBEDDING_METHODS share the same order
        &EMBEDDING_METHODS[*self as usize]
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative detectability of a technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Detectability {
    High,
    Medium,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Low,
}

impl fmt::Display for Detectability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Detectability::High => "High",
            Detectability::Medium => "Medium",
            Detectability::LowMedium => "Low-Medium",
            Detectability::Low => "Low",
        };
        f.write_str(s)
    }
}

/// A known embedding technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmbeddingMethod {
    pub name: &'static str,
    pub detectability: Detectability,
    pub signature: Signature,
}

pub static EMBEDDING_METHODS: [EmbeddingMethod; 6] = [
    EmbeddingMethod {
        name: "LSB Replacement",
        detectability: Detectability::High,
        signature: Signature::LsbReplacement,
    },
    EmbeddingMethod {
        name: "LSB Matching",
        detectability: Detectability::Medium,
        signature: Signature::LsbMatching,
    },
    EmbeddingMethod {
        name: "F5",
        detectability: Detectability::Medium,
        signature: Signature::F5,
    },
    EmbeddingMethod {
        name: "Steghide",
        detectability: Detectability::LowMedium,
        signature: Signature::Steghide,
    },
    EmbeddingMethod {
        name: "HUGO",
        detectability: Detectability::Low,
        signature: Signature::Hugo,
    },
    EmbeddingMethod {
        name: "DCT-based",
        detectability: Detectability::Medium,
        signature: Signature::DctBased,
    },
];
