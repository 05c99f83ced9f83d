use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::article::{ArticleId, ValidationError};
use crate::view_model::{StepRowView, WizardViewModel};

const ROUTE_PREFIX: &str = "/admin/articles/publish/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    Edit,
    Preview,
    Social,
    Confirm,
}

impl WizardStep {
    pub const ORDER: [WizardStep; 4] = [
        WizardStep::Edit,
        WizardStep::Preview,
        WizardStep::Social,
        WizardStep::Confirm,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Edit => 0,
            Self::Preview => 1,
            Self::Social => 2,
            Self::Confirm => 3,
        }
    }

    /// Following step, or `None` at the last one.
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Preceding step, or `None` at the first one.
    pub fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|idx| Self::ORDER.get(idx).copied())
    }

    pub fn is_first(self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Preview => "preview",
            Self::Social => "social",
            Self::Confirm => "confirm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit Article",
            Self::Preview => "Preview",
            Self::Social => "Social Media",
            Self::Confirm => "Confirm & Publish",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStep(s.to_string()))
    }
}

/// Location of the wizard: `/admin/articles/publish/{articleId}/{step}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WizardRoute {
    pub article_id: ArticleId,
    pub step: WizardStep,
}

impl WizardRoute {
    pub fn new(article_id: ArticleId, step: WizardStep) -> Self {
        Self { article_id, step }
    }

    pub fn to_path(&self) -> String {
        format!("{ROUTE_PREFIX}{}/{}", self.article_id, self.step)
    }

    pub fn with_step(&self, step: WizardStep) -> Self {
        Self {
            article_id: self.article_id.clone(),
            step,
        }
    }

    /// Parses a router path. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let path_only = path.split(['?', '#']).next().unwrap_or(path);
        let rest = path_only
            .strip_prefix(ROUTE_PREFIX)
            .ok_or_else(|| ValidationError::InvalidRoute(path.to_string()))?;
        let mut segments = rest.trim_end_matches('/').split('/');
        let (Some(id), Some(step), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(ValidationError::InvalidRoute(path.to_string()));
        };
        Ok(Self {
            article_id: ArticleId::parse(id)?,
            step: step.parse()?,
        })
    }
}

/// Path of the page shown after a successful publish.
pub fn publish_success_path(article_id: &ArticleId) -> String {
    format!("/admin/articles/publish/success?id={article_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftSaveState {
    #[default]
    Idle,
    Saving,
    Saved,
}

/// Wizard state for one page load. The current step is always read from the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    route: WizardRoute,
    pending_route: Option<WizardRoute>,
    completed_steps: BTreeSet<WizardStep>,
    confirmations_complete: bool,
    is_publishing: bool,
    published: bool,
    draft: DraftSaveState,
    alert: Option<String>,
    dirty: bool,
}

impl WizardState {
    pub fn new(route: WizardRoute) -> Self {
        Self {
            route,
            pending_route: None,
            completed_steps: BTreeSet::new(),
            confirmations_complete: false,
            is_publishing: false,
            published: false,
            draft: DraftSaveState::Idle,
            alert: None,
            dirty: false,
        }
    }

    pub fn from_path(path: &str) -> Result<Self, ValidationError> {
        WizardRoute::parse(path).map(Self::new)
    }

    pub fn route(&self) -> &WizardRoute {
        &self.route
    }

    pub fn article_id(&self) -> &ArticleId {
        &self.route.article_id
    }

    pub fn current_step(&self) -> WizardStep {
        self.route.step
    }

    pub fn pending_route(&self) -> Option<&WizardRoute> {
        self.pending_route.as_ref()
    }

    pub fn completed_steps(&self) -> &BTreeSet<WizardStep> {
        &self.completed_steps
    }

    pub fn confirmations_complete(&self) -> bool {
        self.confirmations_complete
    }

    pub fn is_publishing(&self) -> bool {
        self.is_publishing
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn draft_state(&self) -> &DraftSaveState {
        &self.draft
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn can_publish(&self) -> bool {
        self.current_step() == WizardStep::Confirm
            && self.confirmations_complete
            && !self.is_publishing
            && !self.published
    }

    pub fn view(&self) -> WizardViewModel {
        let current = self.current_step();
        WizardViewModel {
            article_id: self.route.article_id.clone(),
            current_step: current,
            steps: WizardStep::ORDER
                .into_iter()
                .map(|step| StepRowView {
                    step,
                    label: step.label(),
                    is_current: step == current,
                    is_completed: self.completed_steps.contains(&step),
                })
                .collect(),
            can_go_previous: !current.is_first() && !self.published,
            can_go_next: !current.is_last() && !self.published,
            can_publish: self.can_publish(),
            is_publishing: self.is_publishing,
            draft: self.draft.clone(),
            alert: self.alert.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn request_route(&mut self, route: WizardRoute) {
        if self.route.step < route.step {
            self.completed_steps.insert(self.route.step);
        }
        self.pending_route = Some(route);
    }

    pub(crate) fn apply_route(&mut self, route: WizardRoute) {
        self.pending_route = None;
        if self.route != route {
            self.route = route;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_confirmations(&mut self, all_confirmed: bool) {
        if self.confirmations_complete != all_confirmed {
            self.confirmations_complete = all_confirmed;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_publish(&mut self) {
        self.is_publishing = true;
        self.alert = None;
        self.mark_dirty();
    }

    pub(crate) fn finish_publish(&mut self, result: Result<(), String>) {
        self.is_publishing = false;
        match result {
            Ok(()) => {
                self.published = true;
            }
            Err(message) => {
                self.alert = Some(message);
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_draft_save(&mut self) {
        self.draft = DraftSaveState::Saving;
        self.mark_dirty();
    }

    pub(crate) fn finish_draft_save(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.draft = DraftSaveState::Saved,
            Err(message) => {
                self.draft = DraftSaveState::Idle;
                self.alert = Some(message);
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn dismiss_alert(&mut self) {
        if self.alert.take().is_some() {
            self.mark_dirty();
        }
    }
}
