//! Panel logic: prize validation, listing, dashboard numbers.

mod dashboard;
mod listing;
mod prizes;

pub use dashboard::{recent, DashboardStats, RECENT_LIMIT};
pub use listing::{filter_records, page_count, page_window, paginate, PageItem, Pagination};
pub use prizes::{
    is_valid_distribution, parse_percentage, prize_feedback, PrizeFeedback, INVALID_COLOR,
    VALID_COLOR,
};
