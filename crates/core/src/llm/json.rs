use crate::domain::contract::PartPick;
use crate::domain::recommendation::Recommendation;
use anyhow::{bail, Context};
use serde_json::Value;

pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```).
        let mut inner = trimmed;
        if let Some(after_first) = inner.splitn(2, '\n').nth(1) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    // Best-effort extraction: first opening bracket to the last matching closer.
    let start = trimmed.find(|c: char| c == '[' || c == '{')?;
    let closer = if trimmed[start..].starts_with('[') { ']' } else { '}' };
    let end = trimmed.rfind(closer)?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

/// Strictly parses the `[{part, candidates:[{name, reason}]}]` shape.
///
/// JSON mode forces an object at the top level, so a single pick object or an object
/// wrapping the array under any key is accepted as well.
pub fn parse_part_picks(text: &str) -> anyhow::Result<Vec<PartPick>> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());
    let value = serde_json::from_str::<Value>(&json_str)
        .with_context(|| format!("LLM output is not valid JSON: {json_str}"))?;

    let picks_value = match value {
        Value::Array(_) => value,
        Value::Object(map) if map.contains_key("part") => Value::Array(vec![Value::Object(map)]),
        Value::Object(map) => match map.into_iter().find(|(_, v)| v.is_array()) {
            Some((_, v)) => v,
            None => bail!("LLM output object has no array of picks"),
        },
        other => bail!("LLM output is neither an array nor an object: {other}"),
    };

    let picks = serde_json::from_value::<Vec<PartPick>>(picks_value)
        .context("LLM output does not match the part/candidates schema")?;
    anyhow::ensure!(!picks.is_empty(), "LLM output contains no picks");

    picks
        .into_iter()
        .map(PartPick::validate_and_normalize)
        .collect()
}

/// Never fails: anything that is not the documented shape is kept as opaque text.
pub fn classify(text: &str) -> Recommendation {
    match parse_part_picks(text) {
        Ok(picks) => Recommendation::Structured(picks),
        Err(err) => {
            tracing::debug!(error = %err, "completion is not structured; keeping raw text");
            Recommendation::RawText(text.trim().to_string())
        }
    }
}
