//! Executes wizard effects against the backend and the router.
//!
//! The wizard state sits behind a mutex that is never held across an
//! `.await`; the `is_publishing` flag is set in the same critical section that
//! decides to publish, so concurrent clicks produce one backend call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use desk_logging::{desk_error, desk_info, desk_warn};
use publishing_core::{
    update, ValidationError, WizardEffect, WizardMsg, WizardRoute, WizardState, WizardStep,
    WizardViewModel,
};

use crate::backend::ArticleBackend;

/// Router collaborator. `push` changes the address bar; the session then
/// reads the route back with `current_path`.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
    fn current_path(&self) -> String;
}

/// Receives blocking alerts meant for the user.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Alerts that only go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn alert(&self, message: &str) {
        desk_warn!("Alert: {}", message);
    }
}

pub struct WizardSession {
    state: Mutex<WizardState>,
    backend: Arc<dyn ArticleBackend>,
    navigator: Arc<dyn Navigator>,
    alerts: Arc<dyn AlertSink>,
}

impl WizardSession {
    /// Builds the session from whatever route the navigator currently shows.
    pub fn open(
        backend: Arc<dyn ArticleBackend>,
        navigator: Arc<dyn Navigator>,
        alerts: Arc<dyn AlertSink>,
    ) -> Result<Self, ValidationError> {
        let state = WizardState::from_path(&navigator.current_path())?;
        Ok(Self {
            state: Mutex::new(state),
            backend,
            navigator,
            alerts,
        })
    }

    pub fn current_step(&self) -> WizardStep {
        self.lock().current_step()
    }

    pub fn view(&self) -> WizardViewModel {
        self.lock().view()
    }

    pub fn state(&self) -> WizardState {
        self.lock().clone()
    }

    pub async fn navigate_to_step(&self, step: WizardStep) {
        self.dispatch(WizardMsg::NavigateTo(step)).await;
    }

    pub async fn handle_next(&self) {
        self.dispatch(WizardMsg::Next).await;
    }

    pub async fn handle_previous(&self) {
        self.dispatch(WizardMsg::Previous).await;
    }

    /// Callback for the confirm step's checklist.
    pub async fn handle_confirmation_state_change(&self, all_confirmed: bool) {
        self.dispatch(WizardMsg::ConfirmationsChanged(all_confirmed))
            .await;
    }

    pub async fn handle_publish(&self) {
        self.dispatch(WizardMsg::PublishClicked).await;
    }

    pub async fn handle_save_draft(&self) {
        self.dispatch(WizardMsg::SaveDraftClicked).await;
    }

    /// Tells the session the router moved on its own (back/forward buttons).
    pub async fn sync_with_router(&self) {
        match WizardRoute::parse(&self.navigator.current_path()) {
            Ok(route) => self.dispatch(WizardMsg::RouteChanged(route)).await,
            Err(err) => desk_warn!("Router left the publishing wizard: {}", err),
        }
    }

    /// Applies a message and runs the resulting effects until none remain.
    pub async fn dispatch(&self, msg: WizardMsg) {
        let mut queue = vec![msg];
        while let Some(msg) = queue.pop() {
            let effects = self.apply(msg);
            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect).await {
                    queue.push(follow_up);
                }
            }
        }
    }

    fn apply(&self, msg: WizardMsg) -> Vec<WizardEffect> {
        let mut guard = self.lock();
        let (next, effects) = update(guard.clone(), msg);
        *guard = next;
        effects
    }

    async fn run_effect(&self, effect: WizardEffect) -> Option<WizardMsg> {
        match effect {
            WizardEffect::PushRoute { path } => {
                self.navigator.push(&path);
                match WizardRoute::parse(&self.navigator.current_path()) {
                    Ok(route) => Some(WizardMsg::RouteChanged(route)),
                    Err(err) => {
                        desk_warn!("Navigation to {} did not land on a wizard route: {}", path, err);
                        None
                    }
                }
            }
            WizardEffect::PublishArticle { article_id } => {
                desk_info!("Publishing article {}", article_id);
                let result = self.backend.publish_article(&article_id).await;
                match &result {
                    Ok(()) => desk_info!("Article {} published", article_id),
                    Err(err) => desk_error!("Publishing article {} failed: {}", article_id, err),
                }
                Some(WizardMsg::PublishFinished(
                    result.map_err(|err| err.message),
                ))
            }
            WizardEffect::SaveDraft { article_id } => {
                let result = self.backend.save_draft(&article_id).await;
                match &result {
                    Ok(()) => desk_info!("Draft saved for article {}", article_id),
                    Err(err) => desk_warn!("Saving draft for article {} failed: {}", article_id, err),
                }
                Some(WizardMsg::SaveDraftFinished(
                    result.map_err(|err| err.message),
                ))
            }
            WizardEffect::RedirectToSuccess { path } => {
                self.navigator.push(&path);
                None
            }
            WizardEffect::ShowAlert { message } => {
                self.alerts.alert(&message);
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
