/// Heuristic asset scorer
///
/// Deterministic stand-in for the production ML scorer. Scores a document
/// on three features (structure, numeric density, domain keywords) plus an
/// optional metadata bonus, scaled to 0..100.

use serde_json::{json, Map, Value};

/// Domain terms counted by the keyword feature
pub const ASSET_TERMS: [&str; 13] = [
    "asset",
    "ownership",
    "valuation",
    "contract",
    "liability",
    "revenue",
    "token",
    "fraction",
    "rights",
    "obligation",
    "lease",
    "yield",
    "cashflow",
];

fn numeric_density(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    digits as f64 / total as f64
}

fn keyword_hits(text: &str) -> usize {
    let lowered = text.to_lowercase();
    ASSET_TERMS
        .iter()
        .filter(|term| lowered.contains(*term))
        .count()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Score a document, returning the 0..100 score and its breakdown
///
/// Feature weights: 40% structure, 30% numeric density, 30% keywords.
/// Metadata contributes at most a 10-point bonus; the combined score is
/// clamped before scaling.
pub fn score_asset(text: &str, metadata: Option<&Map<String, Value>>) -> (f64, Value) {
    let length = text.chars().count();
    let hits = keyword_hits(text);

    // Feature scores (0..1)
    let structure_score = (length as f64 / 5000.0).min(1.0);
    let numeric_score = (numeric_density(text) * 10.0).min(1.0);
    let keyword_score = (hits as f64 / 6.0).min(1.0);

    let metadata_bonus = metadata
        .map(|m| (m.len() as f64 / 5.0).min(1.0) * 0.1)
        .unwrap_or(0.0);

    let combined = (0.4 * structure_score + 0.3 * numeric_score + 0.3 * keyword_score
        + metadata_bonus)
        .clamp(0.0, 1.0);

    let breakdown = json!({
        "structure_score": round3(structure_score),
        "numeric_score": round3(numeric_score),
        "keyword_score": round3(keyword_score),
        "keyword_hits": hits,
        "text_length": length,
        "metadata_bonus": round3(metadata_bonus),
    });

    (round3(combined * 100.0), breakdown)
}

/// Render a breakdown as one "feature: value" line per entry
pub fn pretty_breakdown(breakdown: &Value) -> String {
    breakdown
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
