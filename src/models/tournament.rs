//! TournamentRecord and the types it is built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the store on creation.
///
/// The document store hands out string keys, the local store integers.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Seq(i64),
    Key(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Seq(n) => write!(f, "{}", n),
            RecordId::Key(k) => f.write_str(k),
        }
    }
}

impl From<&str> for RecordId {
    /// All-digit text is a local id; anything else is a document key.
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => RecordId::Seq(n),
            Err(_) => RecordId::Key(s.to_string()),
        }
    }
}

/// Difficulty label. Unknown labels are kept verbatim.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::Other(s) => s,
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Easy" => Difficulty::Easy,
            "Medium" => Difficulty::Medium,
            "Hard" => Difficulty::Hard,
            "Expert" => Difficulty::Expert,
            _ => Difficulty::Other(s),
        }
    }
}

impl From<&str> for Difficulty {
    fn from(s: &str) -> Self {
        Difficulty::from(s.to_string())
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.as_str().to_string()
    }
}

/// Lifecycle status. Not editable through the form.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Open,
    Ongoing,
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Ongoing => "ongoing",
            Status::Closed => "closed",
        }
    }
}

/// Prize split in whole percentages. Must total 100 before a save.
///
/// Missing members fall back to 50/30/20, and so does a missing object.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prizes {
    pub first: i64,
    pub second: i64,
    pub third: i64,
}

impl Default for Prizes {
    fn default() -> Self {
        Self {
            first: 50,
            second: 30,
            third: 20,
        }
    }
}

impl Prizes {
    pub fn new(first: i64, second: i64, third: i64) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    /// Saturates instead of overflowing.
    pub fn total(&self) -> i64 {
        self.first.saturating_add(self.second).saturating_add(self.third)
    }
}

/// The user-editable part of a tournament, as collected from the form.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDraft {
    pub title: String,
    pub subtitle: String,
    /// Raw date-time input (`YYYY-MM-DDTHH:MM`); only parsed for display.
    pub start_date: String,
    /// Hours.
    pub duration: i64,
    pub prize_pool: i64,
    pub max_participants: i64,
    pub difficulty: Difficulty,
    pub language: String,
    pub description: String,
    pub rules: Vec<String>,
    pub prizes: Prizes,
}

/// A stored tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRecord {
    pub id: RecordId,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub prize_pool: i64,
    #[serde(default)]
    pub max_participants: i64,
    #[serde(default)]
    pub participants: i64,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub prizes: Prizes,
    #[serde(default)]
    pub subscribers: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TournamentRecord {
    /// New record from a draft: no participants, open, created now.
    pub fn create(id: RecordId, draft: TournamentDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            subtitle: draft.subtitle,
            start_date: draft.start_date,
            duration: draft.duration,
            prize_pool: draft.prize_pool,
            max_participants: draft.max_participants,
            participants: 0,
            difficulty: draft.difficulty,
            language: draft.language,
            status: Status::Open,
            description: draft.description,
            rules: draft.rules,
            prizes: draft.prizes,
            subscribers: Vec::new(),
            created_at: now,
            updated_at: None,
        }
    }

    /// Replace every editable field. Id, participants, status, subscribers and
    /// creation time are kept.
    pub fn apply(&mut self, draft: TournamentDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.subtitle = draft.subtitle;
        self.start_date = draft.start_date;
        self.duration = draft.duration;
        self.prize_pool = draft.prize_pool;
        self.max_participants = draft.max_participants;
        self.difficulty = draft.difficulty;
        self.language = draft.language;
        self.description = draft.description;
        self.rules = draft.rules;
        self.prizes = draft.prizes;
        self.updated_at = Some(now);
    }

    /// The editable fields as a draft (what the form would submit unchanged).
    pub fn draft(&self) -> TournamentDraft {
        TournamentDraft {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            start_date: self.start_date.clone(),
            duration: self.duration,
            prize_pool: self.prize_pool,
            max_participants: self.max_participants,
            difficulty: self.difficulty.clone(),
            language: self.language.clone(),
            description: self.description.clone(),
            rules: self.rules.clone(),
            prizes: self.prizes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prizes_default_to_fifty_thirty_twenty() {
        let json = r#"{"id":"abc","title":"T","subtitle":"S","createdAt":"2024-11-15T10:00:00Z"}"#;
        let rec: TournamentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.prizes, Prizes::new(50, 30, 20));
        assert_eq!(rec.participants, 0);
        assert_eq!(rec.status, Status::Open);
    }

    #[test]
    fn partial_prizes_default_per_member() {
        let p: Prizes = serde_json::from_str(r#"{"first":60}"#).unwrap();
        assert_eq!(p, Prizes::new(60, 30, 20));
    }

    #[test]
    fn integer_ids_stay_integers() {
        let id: RecordId = serde_json::from_str("1731664800000").unwrap();
        assert_eq!(id, RecordId::Seq(1731664800000));
        assert_eq!(serde_json::to_string(&id).unwrap(), "1731664800000");
        assert_eq!(RecordId::from("k-1"), RecordId::Key("k-1".into()));
        assert_eq!(RecordId::from("42"), RecordId::Seq(42));
    }

    #[test]
    fn unknown_difficulty_survives() {
        let d: Difficulty = serde_json::from_str(r#""Insane""#).unwrap();
        assert_eq!(d, Difficulty::Other("Insane".into()));
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""Insane""#);
    }
}
