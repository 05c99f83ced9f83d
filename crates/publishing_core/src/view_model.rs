use crate::{ArticleId, DraftSaveState, LanguageCode, PollerPhase, WizardStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRowView {
    pub step: WizardStep,
    pub label: &'static str,
    pub is_current: bool,
    /// Visual only; never consulted for gating.
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardViewModel {
    pub article_id: ArticleId,
    pub current_step: WizardStep,
    pub steps: Vec<StepRowView>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub can_publish: bool,
    pub is_publishing: bool,
    pub draft: DraftSaveState,
    pub alert: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRowView {
    pub code: LanguageCode,
    pub name: String,
    pub done: bool,
    pub translated_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationProgressView {
    pub article_id: Option<ArticleId>,
    pub phase: PollerPhase,
    pub is_translating: bool,
    pub status_message: Option<String>,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
    pub languages: Vec<LanguageRowView>,
    pub error: Option<String>,
}

impl TranslationProgressView {
    pub fn done_count(&self) -> usize {
        self.languages.iter().filter(|row| row.done).count()
    }

    pub fn pending_languages(&self) -> impl Iterator<Item = &LanguageRowView> {
        self.languages.iter().filter(|row| !row.done)
    }
}
