//! Summary numbers for the dashboard section.

use crate::models::{Status, TournamentRecord};
use serde::Serialize;

/// How many records the "recent tournaments" list shows.
pub const RECENT_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_tournaments: usize,
    pub total_participants: i64,
    pub total_prize_pool: i64,
    /// Records with status `open`.
    pub active_tournaments: usize,
}

impl DashboardStats {
    pub fn compute(records: &[TournamentRecord]) -> Self {
        Self {
            total_tournaments: records.len(),
            total_participants: records
                .iter()
                .fold(0i64, |acc, t| acc.saturating_add(t.participants)),
            total_prize_pool: records
                .iter()
                .fold(0i64, |acc, t| acc.saturating_add(t.prize_pool)),
            active_tournaments: records.iter().filter(|t| t.status == Status::Open).count(),
        }
    }
}

/// Most recent records. The collection is already ordered newest first.
pub fn recent(records: &[TournamentRecord], limit: usize) -> &[TournamentRecord] {
    &records[..records.len().min(limit)]
}
