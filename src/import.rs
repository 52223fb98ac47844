//! State of the import dialog: target project/requirement pickers and save.

use crate::azure::{ImportRequest, Requirement, SaveOutcome, WorkItemId};
use crate::session::Session;

/// Which control of the dialog has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogField {
    #[default]
    Project,
    Requirement,
    Save,
}

impl DialogField {
    pub fn next(&self) -> Self {
        match self {
            Self::Project => Self::Requirement,
            Self::Requirement => Self::Save,
            Self::Save => Self::Project,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Project => Self::Save,
            Self::Requirement => Self::Project,
            Self::Save => Self::Requirement,
        }
    }
}

/// What the app should do once a save finishes
#[derive(Debug, Clone, PartialEq)]
pub enum SaveResolution {
    /// Close the dialog, announce success, refresh requirements for user/org
    Saved { user_id: String, org_id: String },
    /// Keep the dialog open and announce the failure
    Failed(String),
}

pub const SAVE_SUCCESS_MESSAGE: &str = "Save successfully!";
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save!";

#[derive(Debug, Clone)]
pub struct ImportDialog {
    /// Ids to import; a copy, the table keeps its own selection
    pub selected_ids: Vec<WorkItemId>,
    pub project: Option<String>,
    pub requirement: Option<String>,
    /// Candidates for the requirement picker, follows `project`
    pub requirements: Vec<Requirement>,
    pub saving: bool,
    pub focus: DialogField,
}

impl ImportDialog {
    pub fn new(selected_ids: Vec<WorkItemId>) -> Self {
        Self {
            selected_ids,
            project: None,
            requirement: None,
            requirements: Vec::new(),
            saving: false,
            focus: DialogField::default(),
        }
    }

    /// Pick a project: clears the requirement and reloads its candidates
    pub fn choose_project(&mut self, project_name: &str, session: &Session) {
        self.project = Some(project_name.to_string()).filter(|p| !p.is_empty());
        self.requirement = None;
        self.sync_requirements(session);
    }

    /// Recompute candidates from the session, e.g. after a project list refresh
    pub fn sync_requirements(&mut self, session: &Session) {
        self.requirements = self
            .project
            .as_deref()
            .map(|name| session.requirements_for(name))
            .unwrap_or_default();
    }

    pub fn choose_requirement(&mut self, requirement_name: &str) {
        if self.project.is_some() {
            self.requirement = Some(requirement_name.to_string()).filter(|r| !r.is_empty());
        }
    }

    /// The requirement picker only opens once a project is chosen
    pub fn requirement_enabled(&self) -> bool {
        self.project.is_some()
    }

    pub fn can_save(&self) -> bool {
        self.project.is_some() && self.requirement.is_some() && !self.saving
    }

    /// Closing mid-save would orphan the request's outcome
    pub fn can_close(&self) -> bool {
        !self.saving
    }

    /// Mark the save as started and build its request. `None` when saving is
    /// not currently allowed.
    pub fn begin_save(&mut self, session: &Session) -> Option<ImportRequest> {
        if !self.can_save() {
            return None;
        }
        let request = ImportRequest {
            org_id: session.org_id.clone(),
            user_id: session.user_id.clone(),
            project_name: self.project.clone()?,
            requirement_name: self.requirement.clone()?,
            selected_work_item_ids: self.selected_ids.clone(),
        };
        self.saving = true;
        Some(request)
    }

    /// Conclude a save. Transport errors are surfaced with their cause.
    pub fn finish_save<E: std::fmt::Display>(
        &mut self,
        result: Result<SaveOutcome, E>,
        session: &Session,
    ) -> SaveResolution {
        self.saving = false;
        match result {
            Ok(outcome) if outcome.is_success() => SaveResolution::Saved {
                user_id: session.user_id.clone(),
                org_id: session.org_id.clone(),
            },
            Ok(_) => SaveResolution::Failed(SAVE_FAILURE_MESSAGE.to_string()),
            Err(e) => SaveResolution::Failed(format!("Failed to save: {e}")),
        }
    }
}
