//! Translation status poller.
//!
//! Starts a backend translation job, checks its status once right away and
//! then every `PollSettings::interval` until the backend reports completion
//! or failure, or until `PollSettings::timeout` has passed since the job was
//! accepted. The recurring check runs as one task owned by an [`ActivePoll`]
//! guard; dropping the guard cancels it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use desk_logging::{desk_debug, desk_info, desk_warn};
use publishing_core::{
    parse_target_languages, ArticleDraft, ArticleId, JobToken, PollOutcome, StatusSnapshot,
    TranslationProgressView, TranslationTracker,
};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::backend::{ArticleBackend, StartTranslationRequest};
use crate::{EngineError, StartOutcome, TranslationEvent};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(20),
            timeout: Duration::from_secs(5 * 60),
        }
    }
}

pub trait TranslationSink: Send + Sync {
    fn emit(&self, event: TranslationEvent);
}

pub struct ChannelTranslationSink {
    tx: tokio::sync::mpsc::UnboundedSender<TranslationEvent>,
}

impl ChannelTranslationSink {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<TranslationEvent>) -> Self {
        Self { tx }
    }
}

impl TranslationSink for ChannelTranslationSink {
    fn emit(&self, event: TranslationEvent) {
        let _ = self.tx.send(event);
    }
}

/// Drops every event; for callers that only read the tracker.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl TranslationSink for DiscardSink {
    fn emit(&self, _event: TranslationEvent) {}
}

/// The running poll task. Cancelled when dropped.
struct ActivePoll {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Drop for ActivePoll {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[derive(Clone)]
struct PollContext {
    backend: Arc<dyn ArticleBackend>,
    sink: Arc<dyn TranslationSink>,
    tracker: Arc<Mutex<TranslationTracker>>,
    article_id: ArticleId,
    token: JobToken,
}

impl PollContext {
    fn tracker(&self) -> MutexGuard<'_, TranslationTracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether this context's job is still the one being polled.
    fn is_live(&self, tracker: &TranslationTracker) -> bool {
        tracker.owns(self.token) && tracker.is_translating()
    }

    /// One status check. Returns whether polling should continue.
    async fn poll_once(&self) -> bool {
        match self.backend.translation_status(&self.article_id).await {
            Ok(snapshot) => {
                desk_debug!(
                    "Translation status article={} status={} complete={} failed={}",
                    self.article_id,
                    snapshot.status,
                    snapshot.is_complete,
                    snapshot.is_failed
                );
                let outcome = self.tracker().observe(self.token, &snapshot);
                match outcome {
                    PollOutcome::Continue => {
                        self.sink.emit(TranslationEvent::Progress(snapshot));
                        true
                    }
                    PollOutcome::Completed => {
                        desk_info!("Translation completed for article {}", self.article_id);
                        self.sink.emit(TranslationEvent::Completed(snapshot));
                        false
                    }
                    PollOutcome::Failed { message } => {
                        desk_warn!(
                            "Translation failed for article {}: {}",
                            self.article_id,
                            message
                        );
                        self.sink.emit(TranslationEvent::Failed { message });
                        false
                    }
                    PollOutcome::Ignored => false,
                }
            }
            Err(err) => {
                desk_warn!(
                    "Status poll for article {} skipped: {}",
                    self.article_id,
                    err
                );
                {
                    let mut tracker = self.tracker();
                    if !self.is_live(&tracker) {
                        return false;
                    }
                    tracker.poll_skipped(self.token);
                }
                self.sink.emit(TranslationEvent::PollSkipped {
                    reason: err.to_string(),
                });
                true
            }
        }
    }

    fn time_out(&self) {
        let mut tracker = self.tracker();
        if tracker.time_out(self.token) {
            let message = tracker.error().unwrap_or_default().to_string();
            drop(tracker);
            desk_warn!(
                "Translation for article {} timed out waiting for the backend",
                self.article_id
            );
            self.sink.emit(TranslationEvent::TimedOut { message });
        }
    }
}

pub struct TranslationPoller {
    backend: Arc<dyn ArticleBackend>,
    settings: PollSettings,
    sink: Arc<dyn TranslationSink>,
    tracker: Arc<Mutex<TranslationTracker>>,
    active: Mutex<Option<ActivePoll>>,
}

impl TranslationPoller {
    pub fn new(
        backend: Arc<dyn ArticleBackend>,
        settings: PollSettings,
        sink: Arc<dyn TranslationSink>,
    ) -> Self {
        Self {
            backend,
            settings,
            sink,
            tracker: Arc::new(Mutex::new(TranslationTracker::new())),
            active: Mutex::new(None),
        }
    }

    /// Validates input, submits the job and starts polling.
    ///
    /// Invalid ids, blank title/content or an empty language list fail before
    /// any request is sent. A second call while a job is starting or polling
    /// fails with `FailureKind::AlreadyRunning`.
    pub async fn start_translation<S: AsRef<str>>(
        &self,
        article_id: &str,
        target_languages: &[S],
        draft: &ArticleDraft,
    ) -> Result<StartOutcome, EngineError> {
        let article_id = ArticleId::parse(article_id)?;
        let draft = draft.validated()?;
        let languages = parse_target_languages(target_languages)?;

        let token = self
            .lock_tracker()
            .begin(article_id.clone(), languages.clone())?;

        let request = StartTranslationRequest {
            article_id: article_id.to_string(),
            article_title: draft.title,
            article_content: draft.content,
            target_languages: languages.iter().map(ToString::to_string).collect(),
        };
        desk_info!(
            "Starting translation article={} languages={}",
            article_id,
            request.target_languages.join(",")
        );

        let outcome = match self.backend.start_translation(&request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                desk_warn!("Translation start for article {} failed: {}", article_id, err);
                self.lock_tracker().start_failed(token, err.message.clone());
                return Err(err);
            }
        };

        let started_at = Instant::now();
        if !self.lock_tracker().start_accepted(token) {
            // Stopped, or stopped and replaced, while the request was in flight.
            desk_info!(
                "Translation for article {} was stopped while its start request was in flight",
                article_id
            );
            return Ok(outcome);
        }
        self.sink.emit(TranslationEvent::Started {
            article_id: article_id.clone(),
            outcome: outcome.clone(),
        });

        let ctx = PollContext {
            backend: self.backend.clone(),
            sink: self.sink.clone(),
            tracker: self.tracker.clone(),
            article_id,
            token,
        };

        if !ctx.poll_once().await {
            return Ok(outcome);
        }

        let tracker = self.lock_tracker();
        if !ctx.is_live(&tracker) {
            return Ok(outcome);
        }
        let cancel = CancellationToken::new();
        let deadline = started_at + self.settings.timeout;
        let task = tokio::spawn(poll_loop(
            ctx,
            cancel.clone(),
            deadline,
            self.settings.interval,
        ));
        // The tracker is still held, so no other job can own the slot.
        *self.lock_active() = Some(ActivePoll { cancel, task });
        drop(tracker);
        Ok(outcome)
    }

    /// Single status check. Any transport or decode problem yields `None`.
    pub async fn check_translation_status(&self, article_id: &str) -> Option<StatusSnapshot> {
        let article_id = match ArticleId::parse(article_id) {
            Ok(id) => id,
            Err(err) => {
                desk_warn!("Status check skipped: {}", err);
                return None;
            }
        };
        match self.backend.translation_status(&article_id).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                desk_warn!("Status check for article {} failed: {}", article_id, err);
                None
            }
        }
    }

    /// Cancels the recurring poll. Safe to call at any time, any number of times.
    pub fn stop_translation(&self) {
        let active = self.lock_active().take();
        let was_active = {
            let mut tracker = self.lock_tracker();
            let was_active = tracker.is_translating();
            tracker.stop();
            was_active
        };
        drop(active);
        if was_active {
            desk_info!("Translation polling stopped by caller");
            self.sink.emit(TranslationEvent::Stopped);
        }
    }

    /// Whether the recurring poll task is still running.
    pub fn is_polling(&self) -> bool {
        self.lock_active()
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    /// Waits for the poll task to end on its own (terminal state or stop).
    pub async fn wait_until_settled(&self) {
        let active = self.lock_active().take();
        if let Some(mut active) = active {
            let _ = (&mut active.task).await;
        }
    }

    pub fn tracker(&self) -> TranslationTracker {
        self.lock_tracker().clone()
    }

    pub fn progress(&self) -> TranslationProgressView {
        self.lock_tracker().view()
    }

    fn lock_tracker(&self) -> MutexGuard<'_, TranslationTracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActivePoll>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Recurring checks after the first one. Ticks that fall due while a poll is
/// still in flight are skipped, so polls never overlap.
async fn poll_loop(
    ctx: PollContext,
    cancel: CancellationToken,
    deadline: Instant,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let timeout = tokio::time::sleep_until(deadline);
    tokio::pin!(timeout);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = &mut timeout => {
                ctx.time_out();
                break;
            }
            _ = ticker.tick() => {
                let keep_polling = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => false,
                    _ = &mut timeout => {
                        ctx.time_out();
                        false
                    }
                    keep = ctx.poll_once() => keep,
                };
                if !keep_polling {
                    break;
                }
            }
        }
    }
    desk_debug!("Poll loop for article {} finished", ctx.article_id);
}
