//! Publishing core: pure wizard state machine, translation tracker and view models.
mod article;
mod effect;
mod msg;
mod state;
mod translation;
mod update;
mod view_model;

pub use article::{
    parse_target_languages, sanitize_title, ArticleDraft, ArticleId, LanguageCode,
    ValidationError,
};
pub use effect::WizardEffect;
pub use msg::WizardMsg;
pub use state::{publish_success_path, DraftSaveState, WizardRoute, WizardState, WizardStep};
pub use translation::{
    JobToken, PollOutcome, PollerPhase, StatusSnapshot, TrackerError, TranslationJob,
    TranslationProgress, TranslationRecord, TranslationStatus, TranslationTracker,
    TIMEOUT_MESSAGE,
};
pub use update::update;
pub use view_model::{LanguageRowView, StepRowView, TranslationProgressView, WizardViewModel};
