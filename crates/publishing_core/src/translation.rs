//! Client-side view of a backend translation job.
//!
//! The backend owns the job; this module only keeps the last snapshot seen
//! by the poller and the client-observed phase (`PollerPhase`), which adds
//! a timeout state the backend never reports.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::article::{ArticleId, LanguageCode};
use crate::view_model::{LanguageRowView, TranslationProgressView};

pub const TIMEOUT_MESSAGE: &str =
    "Translation is taking longer than expected. Check back later for the results.";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TranslationStatus {
    NotStarted,
    Starting,
    Translating,
    Saving,
    Completed,
    Partial,
    Failed,
    Unknown(String),
}

impl TranslationStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "not_started" => Self::NotStarted,
            "starting" => Self::Starting,
            "translating" => Self::Translating,
            "saving" => Self::Saving,
            "completed" => Self::Completed,
            "partial" => Self::Partial,
            "failed" => Self::Failed,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "not_started",
            Self::Starting => "starting",
            Self::Translating => "translating",
            Self::Saving => "saving",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }

    /// Human-readable message shown next to the progress bar.
    pub fn message(&self) -> String {
        match self {
            Self::NotStarted => "Translation has not started yet".to_string(),
            Self::Starting => "Starting translation...".to_string(),
            Self::Translating => "Translating article content...".to_string(),
            Self::Saving => "Saving translations...".to_string(),
            Self::Completed => "All translations completed successfully".to_string(),
            Self::Partial => "Some translations completed; others are still pending".to_string(),
            Self::Failed => "The translation service reported an error".to_string(),
            Self::Unknown(raw) => format!("Translation status: {raw}"),
        }
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslationProgress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub language_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content_length: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One status poll, already mapped from the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: TranslationStatus,
    pub message: String,
    pub progress: Option<TranslationProgress>,
    pub translations: Vec<TranslationRecord>,
    pub is_complete: bool,
    pub is_failed: bool,
}

impl StatusSnapshot {
    pub fn new(status: TranslationStatus) -> Self {
        let message = status.message();
        Self {
            status,
            message,
            progress: None,
            translations: Vec::new(),
            is_complete: false,
            is_failed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub article_id: ArticleId,
    pub target_languages: Vec<LanguageCode>,
    pub status: TranslationStatus,
    pub progress: TranslationProgress,
    pub translations: Vec<TranslationRecord>,
}

impl TranslationJob {
    pub fn new(article_id: ArticleId, target_languages: Vec<LanguageCode>) -> Self {
        let total = target_languages.len() as u32;
        Self {
            article_id,
            target_languages,
            status: TranslationStatus::Starting,
            progress: TranslationProgress {
                completed: 0,
                total,
                percentage: 0,
            },
            translations: Vec::new(),
        }
    }

    /// A language listed in `translations` is done whatever the job status says.
    pub fn is_language_done(&self, code: &LanguageCode) -> bool {
        self.translations
            .iter()
            .any(|record| record.language_code == code.as_str())
    }

    fn absorb(&mut self, snapshot: &StatusSnapshot) {
        self.status = snapshot.status.clone();
        for record in &snapshot.translations {
            let known = self
                .translations
                .iter()
                .any(|existing| existing.language_code == record.language_code);
            if !known {
                self.translations.push(record.clone());
            }
        }
        self.progress = match snapshot.progress {
            Some(progress) if progress.total > 0 => progress,
            _ => {
                let total = self.target_languages.len() as u32;
                let completed = self.translations.len() as u32;
                let percentage = if total == 0 {
                    0
                } else {
                    (completed * 100 / total).min(100)
                };
                TranslationProgress {
                    completed,
                    total,
                    percentage,
                }
            }
        };
    }
}

/// Client-observed lifecycle of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerPhase {
    #[default]
    Idle,
    Starting,
    Polling,
    Completed,
    Failed,
    TimedOut,
}

impl PollerPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Starting => "Starting...",
            Self::Polling => "Translating...",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::TimedOut => "Timed out",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Polling)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("a translation job for article {0} is already in progress")]
    AlreadyRunning(ArticleId),
}

/// What the poller should do after a status snapshot has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Continue,
    Completed,
    Failed { message: String },
    /// Snapshot arrived while not polling (late response after stop).
    Ignored,
}

/// Identifies one `begin` call on a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobToken(u64);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationTracker {
    phase: PollerPhase,
    job: Option<TranslationJob>,
    message: Option<String>,
    error: Option<String>,
    polls: u32,
    skipped_polls: u32,
    generation: u64,
}

impl TranslationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PollerPhase {
        self.phase
    }

    pub fn job(&self) -> Option<&TranslationJob> {
        self.job.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn skipped_polls(&self) -> u32 {
        self.skipped_polls
    }

    pub fn is_translating(&self) -> bool {
        self.phase.is_active()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == PollerPhase::Completed
    }

    /// `Idle`/terminal → `Starting`. Rejected while a job is starting or polling.
    ///
    /// The returned token identifies this job; every later transition must
    /// present it, so a response for a stopped or replaced job is dropped.
    pub fn begin(
        &mut self,
        article_id: ArticleId,
        target_languages: Vec<LanguageCode>,
    ) -> Result<JobToken, TrackerError> {
        if self.phase.is_active() {
            let current = self
                .job
                .as_ref()
                .map(|job| job.article_id.clone())
                .unwrap_or_else(|| article_id.clone());
            return Err(TrackerError::AlreadyRunning(current));
        }
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            phase: PollerPhase::Starting,
            job: Some(TranslationJob::new(article_id, target_languages)),
            message: Some(TranslationStatus::Starting.message()),
            generation,
            ..Self::default()
        };
        Ok(JobToken(generation))
    }

    /// Whether `token` belongs to the job this tracker currently holds.
    pub fn owns(&self, token: JobToken) -> bool {
        self.job.is_some() && self.generation == token.0
    }

    /// `Starting` → `Idle`; the start request was refused, polling never begins.
    pub fn start_failed(&mut self, token: JobToken, message: impl Into<String>) {
        if self.owns(token) && self.phase == PollerPhase::Starting {
            self.phase = PollerPhase::Idle;
            self.message = None;
            self.error = Some(message.into());
        }
    }

    /// `Starting` → `Polling`. Returns false when the job was stopped or
    /// replaced while its start request was in flight.
    pub fn start_accepted(&mut self, token: JobToken) -> bool {
        if !self.owns(token) || self.phase != PollerPhase::Starting {
            return false;
        }
        self.phase = PollerPhase::Polling;
        true
    }

    pub fn observe(&mut self, token: JobToken, snapshot: &StatusSnapshot) -> PollOutcome {
        if !self.owns(token) || self.phase != PollerPhase::Polling {
            return PollOutcome::Ignored;
        }
        self.polls += 1;
        self.message = Some(snapshot.message.clone());
        if let Some(job) = self.job.as_mut() {
            job.absorb(snapshot);
        }
        if snapshot.is_complete {
            self.phase = PollerPhase::Completed;
            PollOutcome::Completed
        } else if snapshot.is_failed {
            let message = format!("Translation failed: {}", snapshot.message);
            self.phase = PollerPhase::Failed;
            self.error = Some(message.clone());
            PollOutcome::Failed { message }
        } else {
            PollOutcome::Continue
        }
    }

    /// A poll produced no usable answer. The phase is left as is.
    pub fn poll_skipped(&mut self, token: JobToken) {
        if self.owns(token) && self.phase == PollerPhase::Polling {
            self.skipped_polls += 1;
        }
    }

    /// `Polling` → `TimedOut`. Returns whether the transition happened.
    pub fn time_out(&mut self, token: JobToken) -> bool {
        if !self.owns(token) || self.phase != PollerPhase::Polling {
            return false;
        }
        self.phase = PollerPhase::TimedOut;
        self.error = Some(TIMEOUT_MESSAGE.to_string());
        true
    }

    /// Caller stopped the job; the last snapshot is kept for display.
    pub fn stop(&mut self) {
        if self.phase.is_active() {
            self.phase = PollerPhase::Idle;
        }
    }

    pub fn view(&self) -> TranslationProgressView {
        let Some(job) = self.job.as_ref() else {
            return TranslationProgressView {
                phase: self.phase,
                error: self.error.clone(),
                ..TranslationProgressView::default()
            };
        };
        TranslationProgressView {
            article_id: Some(job.article_id.clone()),
            phase: self.phase,
            is_translating: self.is_translating(),
            status_message: self.message.clone(),
            completed: job.progress.completed,
            total: job.progress.total,
            percentage: job.progress.percentage.min(100),
            languages: job
                .target_languages
                .iter()
                .map(|code| {
                    let record = job
                        .translations
                        .iter()
                        .find(|record| record.language_code == code.as_str());
                    LanguageRowView {
                        code: code.clone(),
                        name: code.display_name().to_string(),
                        done: record.is_some(),
                        translated_title: record.map(|r| r.title.clone()),
                    }
                })
                .collect(),
            error: self.error.clone(),
        }
    }
}
