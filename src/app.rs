use crate::azure::{ApiResult, Backend, Project, SaveOutcome, WorkItem};
use crate::config::Config;
use crate::import::{ImportDialog, SaveResolution, SAVE_SUCCESS_MESSAGE};
use crate::session::Session;
use crate::table::{ImportCheck, SortField, WorkItemTable, MAX_IMPORT_ITEMS, PAGE_SIZE_OPTIONS};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::widgets::ListState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Route the view redirects to when the session may not use it
pub const REDIRECT_ROUTE: &str = "/";

/// Results of background backend calls, drained every tick
#[derive(Debug)]
pub enum BackendEvent {
    WorkItemsLoaded {
        generation: u64,
        result: ApiResult<Vec<WorkItem>>,
    },
    SaveFinished {
        dialog_id: u64,
        result: ApiResult<SaveOutcome>,
    },
    RequirementsLoaded(ApiResult<Vec<Project>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
    PageSizeSelect,
    ImportDialog,
    ProjectSelect,
    RequirementSelect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

pub struct App {
    // Config
    pub config: Config,
    pub session: Session,
    backend: Arc<dyn Backend>,

    // UI state
    pub input_mode: InputMode,
    pub table: WorkItemTable,
    pub dialog: Option<ImportDialog>,

    // Status
    pub status_message: Option<String>,
    pub status_level: NotificationLevel,
    pub status_set_at: Option<Instant>,

    // Dropdowns
    pub dropdown_list_state: ListState,
    pub filter_input: String,
    pub fuzzy_matcher: SkimMatcherV2,

    // Loading spinner state (used by ui::loading)
    pub spinner_frame: usize,

    /// Set when the view must be left; the event loop exits on it
    pub redirect: Option<String>,
    access_checked: bool,

    // Background requests
    mount_generation: u64,
    load_task: Option<JoinHandle<()>>,
    dialog_id: u64,
    backend_tx: mpsc::UnboundedSender<BackendEvent>,
    backend_rx: mpsc::UnboundedReceiver<BackendEvent>,
}

impl App {
    pub fn new(config: Config, session: Session, backend: Arc<dyn Backend>) -> Self {
        let (backend_tx, backend_rx) = mpsc::unbounded_channel();
        let table = WorkItemTable::new(config.settings.default_page_size);

        Self {
            config,
            session,
            backend,
            input_mode: InputMode::Normal,
            table,
            dialog: None,
            status_message: None,
            status_level: NotificationLevel::Info,
            status_set_at: None,
            dropdown_list_state: ListState::default(),
            filter_input: String::new(),
            fuzzy_matcher: SkimMatcherV2::default(),
            spinner_frame: 0,
            redirect: None,
            access_checked: false,
            mount_generation: 0,
            load_task: None,
            dialog_id: 0,
            backend_tx,
            backend_rx,
        }
    }

    /// Gate the view on the session's feature flag. Only the first call
    /// decides; later calls report the same answer.
    pub fn check_access(&mut self) -> bool {
        if !self.access_checked {
            self.access_checked = true;
            if !self.session.authorized {
                tracing::warn!(user_id = %self.session.user_id, "import view not enabled, redirecting");
                self.redirect = Some(REDIRECT_ROUTE.to_string());
            }
        }
        self.redirect.is_none()
    }

    // Background work

    /// Fetch the work item list for the current user. Each call is a new
    /// mount: the previous fetch is aborted and its late result ignored.
    pub fn mount(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
        self.mount_generation += 1;
        self.table.begin_load();

        let generation = self.mount_generation;
        let backend = Arc::clone(&self.backend);
        let user_id = self.session.user_id.clone();
        let tx = self.backend_tx.clone();

        tracing::info!(generation, user_id = %user_id, "loading work items");
        self.load_task = Some(tokio::spawn(async move {
            let result = backend.get_work_items(&user_id).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(BackendEvent::WorkItemsLoaded { generation, result });
        }));
    }

    /// Re-fetch projects and their requirements for a user/org
    pub fn refresh_requirements(&mut self, user_id: String, org_id: String) {
        let backend = Arc::clone(&self.backend);
        let tx = self.backend_tx.clone();

        tracing::info!(user_id = %user_id, org_id = %org_id, "refreshing requirement list");
        tokio::spawn(async move {
            let result = backend.get_project_requirements(&user_id, &org_id).await;
            let _ = tx.send(BackendEvent::RequirementsLoaded(result));
        });
    }

    /// Apply every finished background result without blocking
    pub fn poll_backend(&mut self) {
        while let Ok(event) = self.backend_rx.try_recv() {
            self.handle_backend_event(event);
        }
    }

    /// Wait for the next background result and apply it
    pub async fn next_backend_event(&mut self) -> bool {
        match self.backend_rx.recv().await {
            Some(event) => {
                self.handle_backend_event(event);
                true
            }
            None => false,
        }
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::WorkItemsLoaded { generation, result } => {
                if generation != self.mount_generation {
                    tracing::debug!(generation, current = self.mount_generation, "dropping stale work item load");
                    return;
                }
                self.load_task = None;
                match result {
                    Ok(items) => {
                        tracing::info!(count = items.len(), "work items loaded");
                        self.table.set_items(items);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "work item load failed");
                        self.table.set_failed(e.to_string());
                        self.notify(NotificationLevel::Error, format!("Failed to load work items: {e}"));
                    }
                }
            }
            BackendEvent::SaveFinished { dialog_id, result } => {
                if dialog_id != self.dialog_id {
                    tracing::debug!(dialog_id, "save finished for a closed dialog");
                    return;
                }
                let Some(dialog) = self.dialog.as_mut() else {
                    return;
                };
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "import save request failed");
                }
                match dialog.finish_save(result, &self.session) {
                    SaveResolution::Saved { user_id, org_id } => {
                        tracing::info!(count = dialog.selected_ids.len(), "work items imported");
                        self.close_dialog();
                        self.notify(NotificationLevel::Success, SAVE_SUCCESS_MESSAGE);
                        self.refresh_requirements(user_id, org_id);
                    }
                    SaveResolution::Failed(message) => {
                        tracing::warn!(%message, "import not saved");
                        self.notify(NotificationLevel::Error, message);
                    }
                }
            }
            BackendEvent::RequirementsLoaded(result) => {
                match result {
                    Ok(projects) => {
                        tracing::info!(count = projects.len(), "requirement list refreshed");
                        self.session.projects = projects;
                        if let Some(dialog) = self.dialog.as_mut() {
                            dialog.sync_requirements(&self.session);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "requirement list refresh failed");
                        self.notify(NotificationLevel::Error, format!("Failed to load projects: {e}"));
                    }
                }
            }
        }
    }

    // Table actions

    pub fn toggle_sort(&mut self) {
        self.table.toggle_sort(SortField::CreatedDate);
    }

    /// Import button: warn past the limit, otherwise open the dialog
    pub fn open_import(&mut self) {
        match self.table.check_import() {
            ImportCheck::NothingSelected => {}
            ImportCheck::TooMany(count) => {
                tracing::debug!(count, "import refused, selection over limit");
                self.notify(
                    NotificationLevel::Warning,
                    format!("You can only select up to {MAX_IMPORT_ITEMS} items!"),
                );
            }
            ImportCheck::Ready(ids) => {
                self.dialog_id += 1;
                self.dialog = Some(ImportDialog::new(ids));
                self.input_mode = InputMode::ImportDialog;
            }
        }
    }

    /// Close the dialog, dropping its local state. Refused mid-save.
    pub fn close_dialog(&mut self) -> bool {
        if let Some(dialog) = &self.dialog {
            if !dialog.can_close() {
                self.notify(NotificationLevel::Warning, "Save in progress...");
                return false;
            }
        }
        self.dialog = None;
        self.filter_input.clear();
        self.input_mode = InputMode::Normal;
        true
    }

    pub fn save_dialog(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let Some(request) = dialog.begin_save(&self.session) else {
            return;
        };

        let dialog_id = self.dialog_id;
        let backend = Arc::clone(&self.backend);
        let tx = self.backend_tx.clone();

        tracing::info!(
            project = %request.project_name,
            requirement = %request.requirement_name,
            count = request.selected_work_item_ids.len(),
            "saving import"
        );
        tokio::spawn(async move {
            let result = backend.save_import(&request).await;
            let _ = tx.send(BackendEvent::SaveFinished { dialog_id, result });
        });
    }

    // Dropdowns

    pub fn open_page_size_select(&mut self) {
        let current = PAGE_SIZE_OPTIONS
            .iter()
            .position(|&s| s == self.table.page_size)
            .unwrap_or(0);
        self.dropdown_list_state.select(Some(current));
        self.input_mode = InputMode::PageSizeSelect;
    }

    pub fn confirm_page_size(&mut self) {
        if let Some(size) = self.dropdown_list_state.selected().and_then(|i| PAGE_SIZE_OPTIONS.get(i)) {
            self.table.set_page_size(*size);
        }
        self.input_mode = InputMode::Normal;
    }

    /// Pickers stay shut while a save is in flight
    fn dialog_editable(&self) -> bool {
        self.dialog.as_ref().is_some_and(|d| !d.saving)
    }

    pub fn open_project_select(&mut self) {
        if !self.dialog_editable() {
            return;
        }
        self.filter_input.clear();
        self.dropdown_list_state.select(Some(0));
        self.input_mode = InputMode::ProjectSelect;
    }

    pub fn open_requirement_select(&mut self) {
        let enabled = self.dialog.as_ref().is_some_and(|d| d.requirement_enabled());
        if !enabled || !self.dialog_editable() {
            return;
        }
        self.filter_input.clear();
        self.dropdown_list_state.select(Some(0));
        self.input_mode = InputMode::RequirementSelect;
    }

    /// Project names matching the dropdown filter
    pub fn filtered_projects(&self) -> Vec<String> {
        let names = self.session.projects.iter().map(|p| p.project_name.as_str());
        self.fuzzy_filter(names)
    }

    /// Requirement names of the chosen project matching the dropdown filter
    pub fn filtered_requirements(&self) -> Vec<String> {
        let Some(dialog) = &self.dialog else {
            return Vec::new();
        };
        let names = dialog.requirements.iter().map(|r| r.requirement_name.as_str());
        self.fuzzy_filter(names)
    }

    fn fuzzy_filter<'a>(&self, names: impl Iterator<Item = &'a str>) -> Vec<String> {
        names
            .filter(|n| self.filter_input.is_empty() || self.fuzzy_matcher.fuzzy_match(n, &self.filter_input).is_some())
            .map(str::to_string)
            .collect()
    }

    pub fn confirm_project(&mut self) {
        let choice = self
            .dropdown_list_state
            .selected()
            .and_then(|i| self.filtered_projects().get(i).cloned());
        if let (Some(name), Some(dialog)) = (choice, self.dialog.as_mut()) {
            dialog.choose_project(&name, &self.session);
        }
        self.back_to_dialog();
    }

    pub fn confirm_requirement(&mut self) {
        let choice = self
            .dropdown_list_state
            .selected()
            .and_then(|i| self.filtered_requirements().get(i).cloned());
        if let (Some(name), Some(dialog)) = (choice, self.dialog.as_mut()) {
            dialog.choose_requirement(&name);
        }
        self.back_to_dialog();
    }

    pub fn back_to_dialog(&mut self) {
        self.filter_input.clear();
        self.input_mode = if self.dialog.is_some() {
            InputMode::ImportDialog
        } else {
            InputMode::Normal
        };
    }

    pub fn dropdown_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.dropdown_list_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.dropdown_list_state.select(Some(i));
    }

    pub fn dropdown_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.dropdown_list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.dropdown_list_state.select(Some(i));
    }

    // Status

    pub fn notify(&mut self, level: NotificationLevel, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_level = level;
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_level = NotificationLevel::Info;
        self.status_set_at = None;
    }

    /// Clear the notification once it outlives the configured timeout
    pub fn clear_expired_status(&mut self) {
        if let Some(set_at) = self.status_set_at {
            if set_at.elapsed() > Duration::from_secs(self.config.settings.status_timeout) {
                self.clear_status();
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.table.is_loading() || self.dialog.as_ref().is_some_and(|d| d.saving)
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    pub fn spinner_char(&self) -> &'static str {
        const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER[self.spinner_frame]
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
    }
}
