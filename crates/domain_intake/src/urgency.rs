//! Keyword-based urgency triage
//!
//! Urgency is deliberately rule-based rather than learned. The keyword set
//! lives here and is versioned so a bundle's metadata records which rules
//! were active when it was trained.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bumped whenever [`URGENCY_KEYWORDS`] changes
pub const URGENCY_RULESET_VERSION: u32 = 1;

/// Terms that escalate a claim to high urgency
pub const URGENCY_KEYWORDS: &[&str] = &[
    "emergency",
    "severe",
    "critical",
    "urgent",
    "immediately",
    "pain",
    "crash",
];

/// Triage level assigned to a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrgencyLevel {
    /// Reserved; the keyword rules never produce it
    Low,
    Medium,
    High,
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UrgencyLevel::Low => "Low",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Classifies a claim description into an urgency level
///
/// Matching is case-insensitive substring containment, so "crashed" and
/// "painful" also escalate.
pub fn classify_urgency(description: &str) -> UrgencyLevel {
    let lowered = description.to_lowercase();
    if URGENCY_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        UrgencyLevel::High
    } else {
        UrgencyLevel::Medium
    }
}

/// Returns the keywords that fired for a description, in rule order
pub fn matched_urgency_keywords(description: &str) -> Vec<&'static str> {
    let lowered = description.to_lowercase();
    URGENCY_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| lowered.contains(keyword))
        .collect()
}
