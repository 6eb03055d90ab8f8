//! Keyword-frequency classification of outage type and cause, plus a
//! regex-based estimated-duration extractor.
//!
//! All three run over the combined post text and are total: every input
//! yields a result (type falls back to a low-confidence default, cause and
//! duration to None).

use std::sync::LazyLock;

use gridwatch_common::OutageType;
use regex::Regex;

const TYPE_KEYWORDS: [(OutageType, &[&str]); 3] = [
    (
        OutageType::Outage,
        &[
            "outage",
            "blackout",
            "power cut",
            "electricity off",
            "no power",
            "power failure",
        ],
    ),
    (
        OutageType::Restoration,
        &[
            "restored",
            "power back",
            "electricity restored",
            "back online",
            "service resumed",
        ],
    ),
    (
        OutageType::Maintenance,
        &["maintenance", "scheduled", "planned", "upgrade", "repairs"],
    ),
];

/// Cause categories in priority order; the first with any keyword present
/// wins, even when later categories also match.
const CAUSE_KEYWORDS: [(&str, &[&str]); 4] = [
    (
        "technical",
        &["technical", "equipment", "transformer", "cable", "fault"],
    ),
    ("weather", &["storm", "rain", "wind", "weather", "lightning"]),
    (
        "maintenance",
        &["maintenance", "upgrade", "repair", "inspection"],
    ),
    ("load", &["overload", "high demand", "capacity"]),
];

/// Duration patterns in priority order: hours before minutes, long units
/// before abbreviations.
static DURATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d+\s*hours?",
        r"\d+\s*minutes?",
        r"\d+\s*hrs?",
        r"\d+\s*mins?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid duration pattern"))
    .collect()
});

/// Score each type as matched-keyword count over category size; the best
/// score wins. No keyword anywhere → `(Outage, 0.3)`, the low-confidence
/// default.
pub fn classify_outage_type(text: &str) -> (OutageType, f32) {
    let text = text.to_lowercase();

    let mut best: Option<(OutageType, f32)> = None;
    for (outage_type, keywords) in TYPE_KEYWORDS {
        let hits = keywords.iter().filter(|k| text.contains(*k)).count();
        if hits == 0 {
            continue;
        }
        let score = hits as f32 / keywords.len() as f32;
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((outage_type, score));
        }
    }

    match best {
        Some((outage_type, score)) => (outage_type, score.min(1.0)),
        None => (OutageType::Outage, 0.3),
    }
}

/// First cause category (in priority order) with any keyword in the text.
pub fn extract_cause(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    CAUSE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(cause, _)| *cause)
}

/// First duration mention, trying patterns in priority order.
pub fn extract_duration(text: &str) -> Option<String> {
    let text = text.to_lowercase();
    DURATION_PATTERNS
        .iter()
        .find_map(|p| p.find(&text))
        .map(|m| m.as_str().to_string())
}
