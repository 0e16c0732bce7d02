//! Prize distribution: the three percentages must add up to exactly 100.

use crate::models::parse_int;
use serde::Serialize;

/// Border color for a valid split.
pub const VALID_COLOR: &str = "#10b981";
/// Border color for an invalid split.
pub const INVALID_COLOR: &str = "#ef4444";

/// True iff `first + second + third == 100`. No tolerance. Summed in
/// `i128` so no input can overflow.
pub fn is_valid_distribution(first: i64, second: i64, third: i64) -> bool {
    i128::from(first) + i128::from(second) + i128::from(third) == 100
}

/// Percentage input as an integer; missing or non-numeric text counts as 0.
pub fn parse_percentage(input: &str) -> i64 {
    parse_int(input).unwrap_or(0)
}

/// Live feedback for the three prize inputs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PrizeFeedback {
    pub total: i64,
    pub valid: bool,
    pub border_color: &'static str,
}

pub fn prize_feedback(first: i64, second: i64, third: i64) -> PrizeFeedback {
    let valid = is_valid_distribution(first, second, third);
    PrizeFeedback {
        total: first.saturating_add(second).saturating_add(third),
        valid,
        border_color: if valid { VALID_COLOR } else { INVALID_COLOR },
    }
}
