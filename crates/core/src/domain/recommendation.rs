use crate::domain::contract::{self, PartPick};
use crate::domain::part::PartCategory;
use crate::domain::product::CandidateProduct;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendation: String,
    pub products: Vec<CandidateProduct>,
}

/// What the completion call returned, resolved by a strict parse attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Structured(Vec<PartPick>),
    RawText(String),
}

impl Recommendation {
    pub fn missing_parts(&self) -> Vec<PartCategory> {
        match self {
            Recommendation::Structured(picks) => contract::missing_parts(picks),
            Recommendation::RawText(_) => Vec::new(),
        }
    }

    /// Payload string sent to the client; structured picks are re-encoded as a bare array.
    pub fn into_payload(self) -> String {
        match self {
            Recommendation::Structured(picks) => serde_json::to_string(&picks)
                .unwrap_or_else(|_| String::from("[]")),
            Recommendation::RawText(text) => text,
        }
    }
}
