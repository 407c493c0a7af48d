use crate::domain::part::PartCategory;
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One category entry in the JSON array the model is asked to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartPick {
    pub part: String,
    pub candidates: Vec<PickedCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedCandidate {
    pub name: String,
    pub reason: String,
}

impl PartPick {
    pub fn validate_and_normalize(self) -> anyhow::Result<PartPick> {
        let part = self.part.trim().to_string();
        ensure!(!part.is_empty(), "part must be non-empty");

        let mut candidates = Vec::with_capacity(self.candidates.len());
        for c in self.candidates {
            let name = c.name.trim().to_string();
            ensure!(!name.is_empty(), "candidate name must be non-empty (part={part})");
            candidates.push(PickedCandidate {
                name,
                reason: c.reason.trim().to_string(),
            });
        }
        ensure!(
            !candidates.is_empty(),
            "part {part} must have at least one candidate"
        );

        Ok(PartPick { part, candidates })
    }
}

/// Mandatory categories that no pick covers, in canonical order.
pub fn missing_parts(picks: &[PartPick]) -> Vec<PartCategory> {
    let covered: BTreeSet<&str> = picks
        .iter()
        .filter_map(|p| PartCategory::from_label(&p.part))
        .map(PartCategory::label)
        .collect();

    PartCategory::ALL
        .into_iter()
        .filter(|c| !covered.contains(c.label()))
        .collect()
}
