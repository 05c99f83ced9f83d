//! Publishing engine: backend IO, translation polling and wizard effect execution.
mod auth;
mod backend;
mod history;
mod poller;
mod session;
mod types;

pub use auth::{Anonymous, AuthProvider, EnvTokenProvider, StaticToken};
pub use backend::{ArticleBackend, BackendSettings, ReqwestBackend, StartTranslationRequest};
pub use history::HistoryNavigator;
pub use poller::{
    ChannelTranslationSink, DiscardSink, PollSettings, TranslationPoller, TranslationSink,
};
pub use session::{AlertSink, LogAlerts, Navigator, WizardSession};
pub use types::{EngineError, FailureKind, StartOutcome, TranslationEvent};
