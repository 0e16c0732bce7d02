//! Form fields as text, and their conversion to and from records.

use crate::error::ValidationError;
use crate::logic::{is_valid_distribution, parse_percentage};
use crate::models::tournament::{Prizes, TournamentDraft, TournamentRecord};
use serde::{Deserialize, Serialize};

pub const MAX_DURATION_HOURS: i64 = 10_000;
pub const MAX_PRIZE_POOL: i64 = 1_000_000_000_000;
pub const MAX_PARTICIPANTS: i64 = 10_000_000;

/// Every input of the tournament form, exactly as typed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormFields {
    pub title: String,
    pub subtitle: String,
    pub start_date: String,
    pub duration: String,
    pub prize_pool: String,
    pub max_participants: String,
    pub difficulty: String,
    pub language: String,
    pub description: String,
    /// One rule per line.
    pub rules: String,
    pub first_prize: String,
    pub second_prize: String,
    pub third_prize: String,
}

impl FormFields {
    /// Empty form with the 50/30/20 prize split pre-filled.
    pub fn blank() -> Self {
        let prizes = Prizes::default();
        Self {
            first_prize: prizes.first.to_string(),
            second_prize: prizes.second.to_string(),
            third_prize: prizes.third.to_string(),
            ..Self::default()
        }
    }

    pub fn from_record(record: &TournamentRecord) -> Self {
        Self {
            title: record.title.clone(),
            subtitle: record.subtitle.clone(),
            start_date: record.start_date.clone(),
            duration: record.duration.to_string(),
            prize_pool: record.prize_pool.to_string(),
            max_participants: record.max_participants.to_string(),
            difficulty: record.difficulty.as_str().to_string(),
            language: record.language.clone(),
            description: record.description.clone(),
            rules: record.rules.join("\n"),
            first_prize: record.prizes.first.to_string(),
            second_prize: record.prizes.second.to_string(),
            third_prize: record.prizes.third.to_string(),
        }
    }

    /// Prize percentages with non-numeric input read as 0.
    pub fn prizes(&self) -> Prizes {
        Prizes::new(
            parse_percentage(&self.first_prize),
            parse_percentage(&self.second_prize),
            parse_percentage(&self.third_prize),
        )
    }

    /// Validate and coerce into a draft. The prize split is checked first.
    pub fn collect(&self) -> Result<TournamentDraft, ValidationError> {
        let prizes = self.prizes();
        if !is_valid_distribution(prizes.first, prizes.second, prizes.third) {
            return Err(ValidationError::PrizeDistribution {
                total: prizes.total(),
            });
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.subtitle.trim().is_empty() {
            return Err(ValidationError::MissingField("subtitle"));
        }

        Ok(TournamentDraft {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            start_date: self.start_date.trim().to_string(),
            duration: required_int("duration", &self.duration, MAX_DURATION_HOURS)?,
            prize_pool: required_int("prizePool", &self.prize_pool, MAX_PRIZE_POOL)?,
            max_participants: required_int(
                "maxParticipants",
                &self.max_participants,
                MAX_PARTICIPANTS,
            )?,
            difficulty: self.difficulty.trim().into(),
            language: self.language.clone(),
            description: self.description.clone(),
            rules: split_rules(&self.rules),
            prizes,
        })
    }
}

/// Leading-integer parse: optional sign then digits, trailing text ignored.
/// `"12h"` is 12, `"abc"` and `""` are `None`.
pub fn parse_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let n: i64 = rest[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Parsed value in `0..=max`.
fn required_int(field: &'static str, value: &str, max: i64) -> Result<i64, ValidationError> {
    parse_int(value)
        .filter(|n| (0..=max).contains(n))
        .ok_or_else(|| ValidationError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Split newline text into trimmed, non-blank rules, keeping their order.
pub fn split_rules(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
