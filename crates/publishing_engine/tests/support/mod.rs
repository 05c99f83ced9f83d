#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use publishing_core::{
    ArticleId, StatusSnapshot, TranslationProgress, TranslationRecord, TranslationStatus,
};
use publishing_engine::{
    AlertSink, ArticleBackend, EngineError, FailureKind, StartOutcome, StartTranslationRequest,
    TranslationEvent, TranslationSink,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(desk_logging::initialize_for_tests);
}

pub fn record(code: &str) -> TranslationRecord {
    TranslationRecord {
        language_code: code.to_string(),
        title: format!("Fichaje confirmado ({code})"),
        content_length: 2048,
        created_at: None,
    }
}

pub fn status(raw: &str, completed: u32, total: u32, codes: &[&str]) -> StatusSnapshot {
    let mut snapshot = StatusSnapshot::new(TranslationStatus::parse(raw));
    snapshot.progress = Some(TranslationProgress {
        completed,
        total,
        percentage: if total == 0 { 0 } else { completed * 100 / total },
    });
    snapshot.translations = codes.iter().map(|code| record(code)).collect();
    snapshot.is_complete = raw == "completed";
    snapshot.is_failed = raw == "failed";
    snapshot
}

pub fn network_error(message: &str) -> EngineError {
    EngineError {
        kind: FailureKind::Network,
        message: message.to_string(),
    }
}

/// In-memory backend answering from a script and counting calls.
pub struct ScriptedBackend {
    start_error: Mutex<Option<EngineError>>,
    statuses: Mutex<VecDeque<Result<StatusSnapshot, EngineError>>>,
    publish_errors: Mutex<VecDeque<EngineError>>,
    draft_error: Mutex<Option<EngineError>>,
    publish_delay: Duration,
    start_delays: HashMap<String, Duration>,
    article_statuses: HashMap<String, StatusSnapshot>,
    polled_articles: Mutex<Vec<String>>,
    pub start_requests: Mutex<Vec<StartTranslationRequest>>,
    start_calls: AtomicUsize,
    status_calls: AtomicUsize,
    publish_calls: AtomicUsize,
    draft_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            start_error: Mutex::new(None),
            statuses: Mutex::new(VecDeque::new()),
            publish_errors: Mutex::new(VecDeque::new()),
            draft_error: Mutex::new(None),
            publish_delay: Duration::ZERO,
            start_delays: HashMap::new(),
            article_statuses: HashMap::new(),
            polled_articles: Mutex::new(Vec::new()),
            start_requests: Mutex::new(Vec::new()),
            start_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            publish_calls: AtomicUsize::new(0),
            draft_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_statuses(self, statuses: Vec<Result<StatusSnapshot, EngineError>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn with_start_error(self, err: EngineError) -> Self {
        *self.start_error.lock().unwrap() = Some(err);
        self
    }

    pub fn with_publish_error(self, err: EngineError) -> Self {
        self.publish_errors.lock().unwrap().push_back(err);
        self
    }

    pub fn with_draft_error(self, err: EngineError) -> Self {
        *self.draft_error.lock().unwrap() = Some(err);
        self
    }

    pub fn with_publish_delay(mut self, delay: Duration) -> Self {
        self.publish_delay = delay;
        self
    }

    /// Delays the start response for one article.
    pub fn with_start_delay(mut self, article_id: &str, delay: Duration) -> Self {
        self.start_delays.insert(article_id.to_string(), delay);
        self
    }

    /// Fixed status for one article; takes precedence over the queue.
    pub fn with_article_status(mut self, article_id: &str, snapshot: StatusSnapshot) -> Self {
        self.article_statuses.insert(article_id.to_string(), snapshot);
        self
    }

    pub fn polled_articles(&self) -> Vec<String> {
        self.polled_articles.lock().unwrap().clone()
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    pub fn draft_calls(&self) -> usize {
        self.draft_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ArticleBackend for ScriptedBackend {
    async fn start_translation(
        &self,
        request: &StartTranslationRequest,
    ) -> Result<StartOutcome, EngineError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.start_requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.start_delays.get(&request.article_id) {
            tokio::time::sleep(*delay).await;
        }
        match self.start_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(StartOutcome {
                execution: Some(serde_json::json!({"executionArn": "arn:test"})),
                status_endpoint: Some(format!(
                    "/api/translations/status/{}",
                    request.article_id
                )),
            }),
        }
    }

    async fn translation_status(
        &self,
        article_id: &ArticleId,
    ) -> Result<StatusSnapshot, EngineError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.polled_articles
            .lock()
            .unwrap()
            .push(article_id.to_string());
        if let Some(snapshot) = self.article_statuses.get(article_id.as_str()) {
            return Ok(snapshot.clone());
        }
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(status("translating", 0, 2, &[])))
    }

    async fn publish_article(&self, _article_id: &ArticleId) -> Result<(), EngineError> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        if !self.publish_delay.is_zero() {
            tokio::time::sleep(self.publish_delay).await;
        }
        match self.publish_errors.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn save_draft(&self, _article_id: &ArticleId) -> Result<(), EngineError> {
        self.draft_calls.fetch_add(1, Ordering::SeqCst);
        match self.draft_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<TranslationEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<TranslationEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl TranslationSink for RecordingSink {
    fn emit(&self, event: TranslationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
