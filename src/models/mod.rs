//! Data structures for the admin panel: tournament records and form input.

mod form;
mod tournament;

pub use form::{
    parse_int, split_rules, FormFields, MAX_DURATION_HOURS, MAX_PARTICIPANTS, MAX_PRIZE_POOL,
};
pub use tournament::{Difficulty, Prizes, RecordId, Status, TournamentDraft, TournamentRecord};
