//! Tournament admin panel: library with models, logic, stores and rendering.

pub mod config;
pub mod confirm;
pub mod error;
pub mod logic;
pub mod models;
pub mod notify;
pub mod panel;
pub mod render;
pub mod store;

pub use error::{PanelError, StoreError, ValidationError};
pub use logic::{
    filter_records, is_valid_distribution, page_count, page_window, paginate, parse_percentage,
    prize_feedback, recent, DashboardStats, PageItem, Pagination, PrizeFeedback,
};
pub use models::{
    Difficulty, FormFields, Prizes, RecordId, Status, TournamentDraft, TournamentRecord,
};
pub use notify::{Notification, Notifications, Severity};
pub use panel::{AdminPanel, FormMode, FormState, Section, SubmitOutcome};
pub use store::{DocumentStore, LocalStore, RecordStore, SaveRequest};
