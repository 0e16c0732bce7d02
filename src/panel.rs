//! The admin panel context: collection, view state, form, prompt and notifications.
//!
//! One `AdminPanel` is built at startup and shared with whatever dispatches
//! user actions. State sits behind a lock that is never held across a store
//! call; the submit control and the in-flight delete set guard against
//! duplicate persistence calls.

use crate::confirm::ConfirmDialog;
use crate::error::{PanelError, StoreError, ValidationError};
use crate::logic::{
    filter_records, paginate, page_count, prize_feedback, recent, DashboardStats, Pagination,
    PrizeFeedback, RECENT_LIMIT,
};
use crate::models::{FormFields, RecordId, TournamentRecord};
use crate::notify::{Notification, Notifications, Severity};
use crate::render::{self, FormView, PageFragments};
use crate::store::{RecordStore, SaveRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Cards per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

pub const SAVE_LABEL: &str = "Save Tournament";
pub const UPDATE_LABEL: &str = "Update Tournament";
pub const SAVING_LABEL: &str = "Saving...";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Tournaments,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Tournaments => "Tournaments",
        }
    }
}

/// Which record, if any, the form is bound to.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Closed,
    Create,
    Edit(RecordId),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
}

impl SubmitControl {
    fn idle(label: &str) -> Self {
        Self {
            disabled: false,
            label: label.to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FormState {
    pub mode: FormMode,
    pub fields: FormFields,
    pub submit: SubmitControl,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            mode: FormMode::Closed,
            fields: FormFields::blank(),
            submit: SubmitControl::idle(SAVE_LABEL),
        }
    }
}

impl FormState {
    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Edit(_) => "Edit Tournament",
            _ => "Add Tournament",
        }
    }
}

/// Action bound to the confirmation prompt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PendingAction {
    Delete(RecordId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Created(TournamentRecord),
    Updated(TournamentRecord),
    /// A save was already running, or the form was not open.
    Ignored,
}

/// One page of the filtered collection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Listing {
    pub records: Vec<TournamentRecord>,
    pub total_filtered: usize,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent: Vec<TournamentRecord>,
}

#[derive(Debug, Default)]
struct PanelState {
    section: Section,
    records: Vec<TournamentRecord>,
    page: usize,
    query: String,
    status_filter: String,
    form: FormState,
    confirm: ConfirmDialog<PendingAction>,
    notifications: Notifications,
    deleting: HashSet<RecordId>,
}

impl PanelState {
    fn filtered(&self) -> Vec<&TournamentRecord> {
        filter_records(&self.records, &self.query, &self.status_filter)
    }

    fn total_pages(&self, page_size: usize) -> usize {
        page_count(self.filtered().len(), page_size)
    }
}

pub struct AdminPanel {
    store: Arc<dyn RecordStore>,
    page_size: usize,
    state: RwLock<PanelState>,
}

impl AdminPanel {
    pub fn new(store: Arc<dyn RecordStore>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
            state: RwLock::new(PanelState {
                page: 1,
                ..PanelState::default()
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PanelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PanelState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Load the collection and land on the dashboard.
    pub async fn start(&self) {
        log::info!("Starting admin panel on the {} store", self.store.backend());
        // a failed load is already reported as a notification
        let _ = self.refresh().await;
        self.show_section(Section::Dashboard);
        log::info!("Admin panel ready");
    }

    /// Replace the whole in-memory collection with what the store holds.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        match self.store.load_all().await {
            Ok(records) => {
                let mut s = self.write();
                log::debug!("Loaded {} tournament(s)", records.len());
                s.records = records;
                let last = s.total_pages(self.page_size).max(1);
                s.page = s.page.min(last);
                Ok(())
            }
            Err(e) => {
                log::error!("Error loading tournaments: {}", e);
                self.write()
                    .notifications
                    .push(Severity::Error, "Failed to load tournaments");
                Err(e)
            }
        }
    }

    pub fn records(&self) -> Vec<TournamentRecord> {
        self.read().records.clone()
    }

    pub fn find(&self, id: &RecordId) -> Option<TournamentRecord> {
        self.read().records.iter().find(|t| &t.id == id).cloned()
    }

    // Navigation

    pub fn show_section(&self, section: Section) {
        self.write().section = section;
    }

    pub fn section(&self) -> Section {
        self.read().section
    }

    // Search, filter, paging

    pub fn set_query(&self, query: &str) {
        let mut s = self.write();
        s.query = query.to_lowercase();
        s.page = 1;
    }

    /// `""` shows every status.
    pub fn set_status_filter(&self, status: &str) {
        let mut s = self.write();
        s.status_filter = status.to_string();
        s.page = 1;
    }

    pub fn current_page(&self) -> usize {
        self.read().page
    }

    pub fn go_to_page(&self, page: usize) {
        let mut s = self.write();
        let last = s.total_pages(self.page_size).max(1);
        s.page = page.clamp(1, last);
    }

    pub fn next_page(&self) {
        let mut s = self.write();
        if s.page < s.total_pages(self.page_size) {
            s.page += 1;
        }
    }

    pub fn prev_page(&self) {
        let mut s = self.write();
        if s.page > 1 {
            s.page -= 1;
        }
    }

    pub fn listing(&self) -> Listing {
        let s = self.read();
        let filtered = s.filtered();
        Listing {
            records: paginate(&filtered, s.page, self.page_size)
                .iter()
                .map(|t| (*t).clone())
                .collect(),
            total_filtered: filtered.len(),
            pagination: Pagination::new(s.page, filtered.len(), self.page_size),
        }
    }

    pub fn dashboard(&self) -> DashboardView {
        let s = self.read();
        DashboardView {
            stats: DashboardStats::compute(&s.records),
            recent: recent(&s.records, RECENT_LIMIT).to_vec(),
        }
    }

    // Form

    pub fn form(&self) -> FormState {
        self.read().form.clone()
    }

    pub fn open_create(&self) {
        let mut s = self.write();
        s.form.mode = FormMode::Create;
        s.form.fields = FormFields::blank();
        if !s.form.submit.disabled {
            s.form.submit = SubmitControl::idle(SAVE_LABEL);
        }
    }

    /// Bind the form to a record. Unknown ids are ignored.
    pub fn open_edit(&self, id: &RecordId) -> bool {
        let mut s = self.write();
        let Some(fields) = s
            .records
            .iter()
            .find(|t| &t.id == id)
            .map(FormFields::from_record)
        else {
            log::debug!("Edit requested for unknown tournament {}", id);
            return false;
        };
        s.form.fields = fields;
        s.form.mode = FormMode::Edit(id.clone());
        if !s.form.submit.disabled {
            s.form.submit = SubmitControl::idle(UPDATE_LABEL);
        }
        true
    }

    /// Close and forget the bound edit id.
    pub fn close_form(&self) {
        self.write().form.mode = FormMode::Closed;
    }

    /// Store typed input and report whether the prize split adds up.
    pub fn update_fields(&self, fields: FormFields) -> PrizeFeedback {
        let prizes = fields.prizes();
        self.write().form.fields = fields;
        prize_feedback(prizes.first, prizes.second, prizes.third)
    }

    /// Validate, persist, reload and close. Failures leave the form open with
    /// its data and are reported as notifications.
    pub async fn submit_form(&self, fields: FormFields) -> Result<SubmitOutcome, PanelError> {
        let (mode, _guard) = {
            let mut s = self.write();
            if s.form.submit.disabled {
                log::debug!("Save already in progress, ignoring");
                return Ok(SubmitOutcome::Ignored);
            }
            if !s.form.is_open() {
                log::warn!("Submit received while the form is closed, ignoring");
                return Ok(SubmitOutcome::Ignored);
            }
            let mode = s.form.mode.clone();
            s.form.fields = fields.clone();
            s.form.submit = SubmitControl {
                disabled: true,
                label: SAVING_LABEL.to_string(),
            };
            (mode, SubmitGuard { panel: self })
        };

        let draft = match fields.collect() {
            Ok(draft) => draft,
            Err(e) => {
                let message = match e {
                    ValidationError::PrizeDistribution { .. } => {
                        "Prize distribution must total 100%".to_string()
                    }
                    _ => e.to_string(),
                };
                self.write().notifications.push(Severity::Error, message);
                return Err(e.into());
            }
        };

        let request = match mode.clone() {
            FormMode::Edit(id) => SaveRequest::Update(id, draft),
            _ => SaveRequest::Create(draft),
        };
        let updating = request.is_update();

        match self.store.save(request).await {
            Ok(saved) => {
                // a failed reload is already reported as a notification
                let _ = self.refresh().await;
                let mut s = self.write();
                // the form may have been reopened for something else meanwhile
                if s.form.mode == mode {
                    s.form.mode = FormMode::Closed;
                }
                let message = if updating {
                    "Tournament updated successfully!"
                } else {
                    "Tournament created successfully!"
                };
                s.notifications.push(Severity::Success, message);
                Ok(if updating {
                    SubmitOutcome::Updated(saved)
                } else {
                    SubmitOutcome::Created(saved)
                })
            }
            Err(e) => {
                log::error!("Error saving tournament: {}", e);
                self.write()
                    .notifications
                    .push(Severity::Error, format!("Failed to save tournament: {}", e));
                Err(e.into())
            }
        }
    }

    // Delete and confirmation

    /// Ask before deleting. Unknown ids are ignored.
    pub fn request_delete(&self, id: &RecordId) -> bool {
        let mut s = self.write();
        let Some(title) = s.records.iter().find(|t| &t.id == id).map(|t| t.title.clone()) else {
            return false;
        };
        s.confirm.show(
            "Delete Tournament",
            format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                title
            ),
            PendingAction::Delete(id.clone()),
        );
        true
    }

    /// Title and message of the open prompt.
    pub fn confirm_prompt(&self) -> Option<(String, String)> {
        let s = self.read();
        Some((s.confirm.title()?.to_string(), s.confirm.message()?.to_string()))
    }

    /// Run the bound action and close the prompt. Returns whether anything ran.
    pub async fn confirm_accept(&self) -> Result<bool, PanelError> {
        let action = self.write().confirm.accept();
        match action {
            Some(PendingAction::Delete(id)) => self.delete_record(id).await,
            None => Ok(false),
        }
    }

    pub fn confirm_cancel(&self) {
        self.write().confirm.cancel();
    }

    async fn delete_record(&self, id: RecordId) -> Result<bool, PanelError> {
        if !self.write().deleting.insert(id.clone()) {
            log::debug!("Delete of {} already in progress, ignoring", id);
            return Ok(false);
        }
        let _guard = DeleteGuard {
            panel: self,
            id: id.clone(),
        };

        match self.store.delete(&id).await {
            Ok(()) => {
                let _ = self.refresh().await;
                self.write()
                    .notifications
                    .push(Severity::Success, "Tournament deleted successfully!");
                Ok(true)
            }
            Err(e) => {
                log::error!("Error deleting tournament {}: {}", id, e);
                self.write()
                    .notifications
                    .push(Severity::Error, "Failed to delete tournament");
                Err(e.into())
            }
        }
    }

    // Notifications

    pub fn notify(&self, severity: Severity, message: impl Into<String>) -> u64 {
        self.write().notifications.push(severity, message)
    }

    /// Live notifications after dropping expired ones.
    pub fn notifications(&self, now: Instant) -> Vec<Notification> {
        let mut s = self.write();
        s.notifications.sweep(now);
        s.notifications.items().to_vec()
    }

    /// Most recently pushed notification, if it has not been swept or dismissed.
    pub fn latest_notification(&self) -> Option<Notification> {
        self.read().notifications.latest().cloned()
    }

    pub fn dismiss_notification(&self, id: u64) -> bool {
        self.write().notifications.dismiss(id)
    }

    pub fn sweep_notifications(&self, now: Instant) {
        self.write().notifications.sweep(now);
    }

    // Rendering

    pub fn render_grid(&self) -> String {
        let listing = self.listing();
        let visible: Vec<&TournamentRecord> = listing.records.iter().collect();
        render::tournament_grid(&visible)
    }

    pub fn render_pagination(&self) -> String {
        render::pagination_controls(&self.listing().pagination)
    }

    pub fn render_dashboard(&self) -> String {
        let view = self.dashboard();
        format!(
            "{}\n{}",
            render::stats_panel(&view.stats),
            render::recent_list(&view.recent)
        )
    }

    pub fn render_form(&self) -> String {
        let form = self.form();
        let prizes = form.fields.prizes();
        let feedback = prize_feedback(prizes.first, prizes.second, prizes.third);
        render::tournament_form(&FormView {
            open: form.is_open(),
            heading: form.heading(),
            fields: &form.fields,
            submit_label: &form.submit.label,
            submit_disabled: form.submit.disabled,
            prize_border: feedback.border_color,
        })
    }

    pub fn render_confirm(&self) -> String {
        render::confirm_modal(&self.read().confirm)
    }

    pub fn render_notifications(&self, now: Instant) -> String {
        render::notifications(&self.notifications(now), now)
    }

    pub fn render_page(&self, now: Instant) -> String {
        let section = self.section();
        let view = self.dashboard();
        render::page(&PageFragments {
            title: section.title().to_string(),
            dashboard_active: section == Section::Dashboard,
            stats: render::stats_panel(&view.stats),
            recent: render::recent_list(&view.recent),
            grid: self.render_grid(),
            pagination: self.render_pagination(),
            form: self.render_form(),
            confirm: self.render_confirm(),
            notifications: self.render_notifications(now),
        })
    }
}

/// Re-enables the submit control on every exit path of a save, labelled
/// for whatever the form is bound to by then.
struct SubmitGuard<'a> {
    panel: &'a AdminPanel,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut s = self.panel.write();
        let label = match s.form.mode {
            FormMode::Edit(_) => UPDATE_LABEL,
            _ => SAVE_LABEL,
        };
        s.form.submit = SubmitControl::idle(label);
    }
}

struct DeleteGuard<'a> {
    panel: &'a AdminPanel,
    id: RecordId,
}

impl Drop for DeleteGuard<'_> {
    fn drop(&mut self) {
        self.panel.write().deleting.remove(&self.id);
    }
}
