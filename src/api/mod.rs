//! Wire payloads for the generation backend.
//!
//! The backend wraps the upstream generation result verbatim, so the
//! response keys carry the upstream's capitalized field names. Everything
//! past the top level is optional on the wire; extraction tolerates any
//! missing piece and reports it as an absent part rather than a decode
//! failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod client;

#[derive(Serialize, Debug, Clone)]
pub struct GenerateRequest {
    pub q: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<GenerationResult>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerationResult {
    #[serde(rename = "Candidates", default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    #[serde(rename = "Content", default)]
    pub content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CandidateContent {
    // Parts may mix strings with structured values; only string parts are
    // displayable text.
    #[serde(rename = "Parts", default)]
    pub parts: Vec<Value>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { q: prompt.into() }
    }
}

impl GenerateResponse {
    /// Display text per the first-candidate-first-part rule. Returns `None`
    /// when any link in the chain is missing or the first part is not a
    /// string.
    pub fn first_part(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .as_str()
    }
}
