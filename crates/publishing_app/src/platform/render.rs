use chrono::{DateTime, Local};
use publishing_core::{DraftSaveState, TranslationProgressView, WizardViewModel};
use publishing_engine::TranslationEvent;

const BAR_WIDTH: usize = 30;

pub fn render_progress(view: &TranslationProgressView) -> Vec<String> {
    let mut lines = Vec::new();

    let article = view
        .article_id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("Article {} | {}", article, view.phase.label()));

    if let Some(message) = &view.status_message {
        lines.push(format!("  {}", message));
    }

    lines.push(format!(
        "  [{}] {}% ({}/{})",
        progress_bar(view.percentage),
        view.percentage.min(100),
        view.completed,
        view.total
    ));

    for row in &view.languages {
        let mark = if row.done { "x" } else { " " };
        match &row.translated_title {
            Some(title) => lines.push(format!("  [{}] {} ({}): {}", mark, row.name, row.code, title)),
            None => lines.push(format!("  [{}] {} ({})", mark, row.name, row.code)),
        }
    }

    if let Some(error) = &view.error {
        lines.push(format!("  Error: {}", error));
    }

    lines
}

pub fn render_wizard(view: &WizardViewModel) -> Vec<String> {
    let mut lines = vec![format!("Publishing article {}", view.article_id)];

    for row in &view.steps {
        let cursor = if row.is_current { ">" } else { " " };
        let mark = if row.is_completed { "done" } else { "" };
        lines.push(format!("{} {:<10} {}", cursor, row.label, mark).trim_end().to_string());
    }

    let mut actions = Vec::new();
    if view.can_go_previous {
        actions.push("previous");
    }
    if view.can_go_next {
        actions.push("next");
    }
    if view.can_publish {
        actions.push("publish");
    }
    if view.is_publishing {
        actions.push("publishing...");
    }
    if !actions.is_empty() {
        lines.push(format!("Actions: {}", actions.join(", ")));
    }

    match view.draft {
        DraftSaveState::Idle => {}
        DraftSaveState::Saving => lines.push("Draft: saving...".to_string()),
        DraftSaveState::Saved => lines.push("Draft: saved".to_string()),
    }

    if let Some(alert) = &view.alert {
        lines.push(format!("Alert: {}", alert));
    }

    lines
}

/// One timestamped log line per poller event.
pub fn render_event(event: &TranslationEvent, at: DateTime<Local>) -> String {
    let body = match event {
        TranslationEvent::Started { article_id, outcome } => match &outcome.status_endpoint {
            Some(endpoint) => format!("Translation started for {} ({})", article_id, endpoint),
            None => format!("Translation started for {}", article_id),
        },
        TranslationEvent::Progress(snapshot) => snapshot.message.clone(),
        TranslationEvent::PollSkipped { reason } => format!("Status check failed: {}", reason),
        TranslationEvent::Completed(snapshot) => snapshot.message.clone(),
        TranslationEvent::Failed { message } => message.clone(),
        TranslationEvent::TimedOut { message } => message.clone(),
        TranslationEvent::Stopped => "Stopped watching the translation".to_string(),
    };
    format!("[{}] {}", at.format("%H:%M:%S"), body)
}

fn progress_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use publishing_core::{
        ArticleId, LanguageCode, PollerPhase, StatusSnapshot, TranslationRecord,
        TranslationStatus, TranslationTracker, WizardMsg, WizardState,
    };

    fn tracker_with_one_done() -> TranslationTracker {
        let mut tracker = TranslationTracker::new();
        let languages = vec![
            LanguageCode::parse("es").unwrap(),
            LanguageCode::parse("fr").unwrap(),
        ];
        let token = tracker
            .begin(ArticleId::parse("42").unwrap(), languages)
            .unwrap();
        assert!(tracker.start_accepted(token));
        let mut snapshot = StatusSnapshot::new(TranslationStatus::Translating);
        snapshot.translations.push(TranslationRecord {
            language_code: "es".into(),
            title: "Jugador - Club".into(),
            content_length: 1200,
            created_at: None,
        });
        tracker.observe(token, &snapshot);
        tracker
    }

    #[test]
    fn progress_lists_each_language_with_its_mark() {
        let view = tracker_with_one_done().view();
        let lines = render_progress(&view);

        assert_eq!(lines[0], "Article 42 | Translating...");
        assert_eq!(lines[1], "  Translating article content...");
        assert!(lines[2].contains("50% (1/2)"));
        assert!(lines.iter().any(|line| line.starts_with("  [x] ") && line.contains("Jugador - Club")));
        assert!(lines.iter().any(|line| line.starts_with("  [ ] ") && line.contains("(fr)")));
    }

    #[test]
    fn idle_progress_renders_placeholder_article() {
        let view = TranslationProgressView::default();
        assert_eq!(view.phase, PollerPhase::Idle);
        let lines = render_progress(&view);
        assert_eq!(lines[0], "Article - | Idle");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn bar_is_clamped_to_full_width() {
        assert_eq!(progress_bar(250), "#".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(0), "-".repeat(BAR_WIDTH));
    }

    #[test]
    fn wizard_marks_current_step_and_offers_publish() {
        let mut state = WizardState::from_path("/admin/articles/publish/42/confirm").unwrap();
        let (next, _) = publishing_core::update(state.clone(), WizardMsg::ConfirmationsChanged(true));
        state = next;
        let lines = render_wizard(&state.view());

        assert_eq!(lines[0], "Publishing article 42");
        assert!(lines.iter().any(|line| line.starts_with("> Confirm")));
        assert!(lines.iter().any(|line| line == "Actions: previous, publish"));
    }

    #[test]
    fn events_are_timestamped() {
        let at = Local.with_ymd_and_hms(2026, 10, 16, 9, 5, 7).unwrap();
        assert_eq!(
            render_event(&TranslationEvent::Stopped, at),
            "[09:05:07] Stopped watching the translation"
        );
    }
}
