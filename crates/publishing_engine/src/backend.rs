use std::sync::Arc;
use std::time::Duration;

use desk_logging::{desk_debug, desk_warn, next_request_id};
use publishing_core::{
    ArticleId, StatusSnapshot, TranslationProgress, TranslationRecord, TranslationStatus,
};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::{authorization_value, AuthProvider};
use crate::{EngineError, FailureKind, StartOutcome};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Body of the start-translation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTranslationRequest {
    pub article_id: String,
    pub article_title: String,
    pub article_content: String,
    pub target_languages: Vec<String>,
}

#[async_trait::async_trait]
pub trait ArticleBackend: Send + Sync {
    async fn start_translation(
        &self,
        request: &StartTranslationRequest,
    ) -> Result<StartOutcome, EngineError>;

    async fn translation_status(&self, article_id: &ArticleId)
        -> Result<StatusSnapshot, EngineError>;

    async fn publish_article(&self, article_id: &ArticleId) -> Result<(), EngineError>;

    async fn save_draft(&self, article_id: &ArticleId) -> Result<(), EngineError>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
    message: Option<String>,
}

impl<T> Envelope<T> {
    fn failure_message(&self) -> Option<String> {
        self.error.clone().or_else(|| self.message.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusData {
    translation_status: String,
    #[serde(default)]
    progress: Option<TranslationProgress>,
    #[serde(default)]
    translations: Vec<TranslationRecord>,
    #[serde(default)]
    is_complete: bool,
    #[serde(default)]
    is_failed: bool,
}

impl From<StatusData> for StatusSnapshot {
    fn from(data: StatusData) -> Self {
        let status = TranslationStatus::parse(&data.translation_status);
        StatusSnapshot {
            message: status.message(),
            status,
            progress: data.progress,
            translations: data.translations,
            is_complete: data.is_complete,
            is_failed: data.is_failed,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: url::Url,
    auth: Arc<dyn AuthProvider>,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings, auth: Arc<dyn AuthProvider>) -> Result<Self, EngineError> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = url::Url::parse(&base)
            .map_err(|err| EngineError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, EngineError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| EngineError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let mut builder = self.client.request(method, url);
        if let Some(value) = authorization_value(self.auth.as_ref()) {
            builder = builder.header(AUTHORIZATION, value);
        }
        Ok(builder)
    }

    /// Sends the request; non-2xx answers become `HttpStatus` errors carrying
    /// the backend's error text when it sent one.
    async fn send(&self, builder: reqwest::RequestBuilder, label: &str) -> Result<String, EngineError> {
        let request_id = next_request_id();
        desk_debug!("[req {}] {}", request_id, label);

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        desk_debug!(
            "[req {}] {} -> {} ({} bytes)",
            request_id,
            label,
            status.as_u16(),
            body.len()
        );

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.failure_message())
                .unwrap_or_else(|| status.to_string());
            desk_warn!("[req {}] {} failed: {}", request_id, label, message);
            return Err(EngineError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        Ok(body)
    }

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        label: &str,
    ) -> Result<Option<T>, EngineError> {
        let body = self.send(builder, label).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|err| EngineError::new(FailureKind::Decode, err.to_string()))?;
        if !envelope.success {
            let message = envelope
                .failure_message()
                .unwrap_or_else(|| format!("{label} was not successful"));
            return Err(EngineError::new(FailureKind::Backend, message));
        }
        Ok(envelope.data)
    }

    /// Like `send_envelope`, but an empty 2xx body also counts as success.
    async fn send_ack(&self, builder: reqwest::RequestBuilder, label: &str) -> Result<(), EngineError> {
        let body = self.send(builder, label).await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|err| EngineError::new(FailureKind::Decode, err.to_string()))?;
        if envelope.success {
            Ok(())
        } else {
            Err(EngineError::new(
                FailureKind::Backend,
                envelope
                    .failure_message()
                    .unwrap_or_else(|| format!("{label} was not successful")),
            ))
        }
    }
}

#[async_trait::async_trait]
impl ArticleBackend for ReqwestBackend {
    async fn start_translation(
        &self,
        request: &StartTranslationRequest,
    ) -> Result<StartOutcome, EngineError> {
        let builder = self.request(Method::POST, "translations/start")?.json(request);
        let data: Option<serde_json::Value> =
            self.send_envelope(builder, "start translation").await?;
        Ok(start_outcome(data))
    }

    async fn translation_status(
        &self,
        article_id: &ArticleId,
    ) -> Result<StatusSnapshot, EngineError> {
        let builder = self.request(
            Method::GET,
            &format!("translations/status/{}", article_id.as_str()),
        )?;
        let data: Option<StatusData> = self.send_envelope(builder, "translation status").await?;
        data.map(StatusSnapshot::from).ok_or_else(|| {
            EngineError::new(FailureKind::Decode, "status response carried no data")
        })
    }

    async fn publish_article(&self, article_id: &ArticleId) -> Result<(), EngineError> {
        let builder = self
            .request(
                Method::PATCH,
                &format!("articles/{}/status", article_id.as_str()),
            )?
            .json(&StatusUpdate {
                status: "published",
            });
        self.send_ack(builder, "publish article").await
    }

    async fn save_draft(&self, article_id: &ArticleId) -> Result<(), EngineError> {
        let builder = self
            .request(
                Method::POST,
                &format!("articles/{}/draft", article_id.as_str()),
            )?
            .json(&serde_json::json!({}));
        self.send_ack(builder, "save draft").await
    }
}

fn start_outcome(data: Option<serde_json::Value>) -> StartOutcome {
    let Some(data) = data else {
        return StartOutcome::default();
    };
    let status_endpoint = data
        .get("statusEndpoint")
        .and_then(|value| value.as_str())
        .map(ToOwned::to_owned);
    let execution = data.get("execution").cloned().or_else(|| {
        data.get("executionArn").cloned()
    });
    StartOutcome {
        execution,
        status_endpoint,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> EngineError {
    if err.is_timeout() {
        return EngineError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return EngineError::new(FailureKind::Decode, err.to_string());
    }
    EngineError::new(FailureKind::Network, err.to_string())
}
