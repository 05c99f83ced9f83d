use desk_logging::desk_debug;

use crate::state::publish_success_path;
use crate::{DraftSaveState, WizardEffect, WizardMsg, WizardState, WizardStep};

/// Pure update function: applies a message to the wizard and returns any effects.
pub fn update(mut state: WizardState, msg: WizardMsg) -> (WizardState, Vec<WizardEffect>) {
    // After a successful publish the wizard has been left; nothing re-enters it.
    if state.is_published() {
        return (state, Vec::new());
    }

    let effects = match msg {
        WizardMsg::NavigateTo(step) => navigate_to(&mut state, step),
        WizardMsg::Next => match state.current_step().next() {
            Some(step) => navigate_to(&mut state, step),
            None => Vec::new(),
        },
        WizardMsg::Previous => match state.current_step().previous() {
            Some(step) => navigate_to(&mut state, step),
            None => Vec::new(),
        },
        WizardMsg::RouteChanged(route) => {
            if route.article_id != *state.article_id() {
                // Different article means a fresh page load.
                state = WizardState::new(route);
                state.mark_dirty();
            } else {
                state.apply_route(route);
            }
            Vec::new()
        }
        WizardMsg::ConfirmationsChanged(all_confirmed) => {
            state.set_confirmations(all_confirmed);
            Vec::new()
        }
        WizardMsg::PublishClicked => {
            if state.can_publish() {
                state.begin_publish();
                vec![WizardEffect::PublishArticle {
                    article_id: state.article_id().clone(),
                }]
            } else {
                desk_debug!(
                    "Publish ignored for article {}: step={} confirmed={} publishing={}",
                    state.article_id(),
                    state.current_step(),
                    state.confirmations_complete(),
                    state.is_publishing()
                );
                Vec::new()
            }
        }
        WizardMsg::PublishFinished(result) => {
            if !state.is_publishing() {
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    let path = publish_success_path(state.article_id());
                    state.finish_publish(Ok(()));
                    vec![WizardEffect::RedirectToSuccess { path }]
                }
                Err(reason) => {
                    let message = format!("Failed to publish article: {reason}");
                    state.finish_publish(Err(message.clone()));
                    vec![WizardEffect::ShowAlert { message }]
                }
            }
        }
        WizardMsg::SaveDraftClicked => {
            if *state.draft_state() == DraftSaveState::Saving {
                Vec::new()
            } else {
                state.begin_draft_save();
                vec![WizardEffect::SaveDraft {
                    article_id: state.article_id().clone(),
                }]
            }
        }
        WizardMsg::SaveDraftFinished(result) => match result {
            Ok(()) => {
                state.finish_draft_save(Ok(()));
                Vec::new()
            }
            Err(reason) => {
                let message = format!("Failed to save draft: {reason}");
                state.finish_draft_save(Err(message.clone()));
                vec![WizardEffect::ShowAlert { message }]
            }
        },
        WizardMsg::AlertDismissed => {
            state.dismiss_alert();
            Vec::new()
        }
    };

    (state, effects)
}

fn navigate_to(state: &mut WizardState, step: WizardStep) -> Vec<WizardEffect> {
    if state.is_publishing() {
        return Vec::new();
    }
    if step == state.current_step() && state.pending_route().is_none() {
        return Vec::new();
    }
    let route = state.route().with_step(step);
    let path = route.to_path();
    state.request_route(route);
    vec![WizardEffect::PushRoute { path }]
}
