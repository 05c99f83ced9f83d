mod support;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use publishing_core::{ArticleId, TranslationStatus};
use publishing_engine::{
    Anonymous, ArticleBackend, BackendSettings, FailureKind, ReqwestBackend, StaticToken,
    StartTranslationRequest,
};
use serde_json::json;
use support::init_logging;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    let settings = BackendSettings {
        base_url: format!("{}/api", server.uri()),
        ..BackendSettings::default()
    };
    ReqwestBackend::new(settings, Arc::new(StaticToken::new("s3cret"))).expect("backend")
}

fn start_request() -> StartTranslationRequest {
    StartTranslationRequest {
        article_id: "42".into(),
        article_title: "Player - Club".into(),
        article_content: "Body".into(),
        target_languages: vec!["es".into(), "fr".into()],
    }
}

fn article(id: &str) -> ArticleId {
    ArticleId::parse(id).unwrap()
}

#[tokio::test]
async fn start_translation_posts_camel_case_body_with_bearer_header() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translations/start"))
        .and(header("authorization", "Bearer s3cret"))
        .and(body_json(json!({
            "articleId": "42",
            "articleTitle": "Player - Club",
            "articleContent": "Body",
            "targetLanguages": ["es", "fr"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "execution": {"executionArn": "arn:aws:states:1"},
                "statusEndpoint": "/api/translations/status/42"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = backend_for(&server)
        .start_translation(&start_request())
        .await
        .expect("start ok");
    assert_eq!(
        outcome.status_endpoint.as_deref(),
        Some("/api/translations/status/42")
    );
    assert_eq!(
        outcome.execution,
        Some(json!({"executionArn": "arn:aws:states:1"}))
    );
}

#[tokio::test]
async fn start_translation_surfaces_backend_error_text() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translations/start"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"success": false, "error": "Article content too long"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .start_translation(&start_request())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "Article content too long");
}

#[tokio::test]
async fn start_translation_falls_back_to_status_text() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translations/start"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .start_translation(&start_request())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.message, "503 Service Unavailable");
}

#[tokio::test]
async fn start_translation_rejects_success_false_with_ok_status() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translations/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "Translation already running"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .start_translation(&start_request())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Backend);
    assert_eq!(err.message, "Translation already running");
}

#[tokio::test]
async fn translation_status_maps_wire_format() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/translations/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "translationStatus": "translating",
                "progress": {"completed": 1, "total": 2, "percentage": 40},
                "translations": [{
                    "languageCode": "es",
                    "title": "Jugador - Club",
                    "contentLength": 1830,
                    "createdAt": "2026-10-16T08:30:00Z"
                }],
                "isComplete": false,
                "isFailed": false
            }
        })))
        .mount(&server)
        .await;

    let snapshot = backend_for(&server)
        .translation_status(&article("42"))
        .await
        .expect("status ok");
    assert_eq!(snapshot.status, TranslationStatus::Translating);
    assert_eq!(snapshot.message, "Translating article content...");
    assert_eq!(snapshot.progress.unwrap().percentage, 40);
    assert_eq!(snapshot.translations.len(), 1);
    assert_eq!(snapshot.translations[0].title, "Jugador - Club");
    assert_eq!(snapshot.translations[0].content_length, 1830);
    assert!(!snapshot.is_complete);
}

#[tokio::test]
async fn translation_status_with_bad_json_is_a_decode_error() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/translations/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .translation_status(&article("42"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_status_response_times_out() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/translations/status/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"success": true})),
        )
        .mount(&server)
        .await;

    let settings = BackendSettings {
        base_url: format!("{}/api/", server.uri()),
        request_timeout: Duration::from_millis(50),
        ..BackendSettings::default()
    };
    let backend = ReqwestBackend::new(settings, Arc::new(Anonymous)).unwrap();
    let err = backend
        .translation_status(&article("42"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn publish_patches_article_status() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/articles/42/status"))
        .and(header("authorization", "Bearer s3cret"))
        .and(body_json(json!({"status": "published"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .publish_article(&article("42"))
        .await
        .expect("publish ok");
}

#[tokio::test]
async fn publish_accepts_empty_no_content_response() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/articles/42/status"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    backend_for(&server)
        .publish_article(&article("42"))
        .await
        .expect("publish ok");
}

#[tokio::test]
async fn publish_failure_carries_backend_message() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/articles/42/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Article has no cover image"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .publish_article(&article("42"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Backend);
    assert_eq!(err.message, "Article has no cover image");
}

#[tokio::test]
async fn save_draft_posts_to_draft_endpoint() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/articles/3f2b8c1e-9a4d-4e21-b7c3-0d5e6f7a8b9c/draft"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .save_draft(&article("3f2b8c1e-9a4d-4e21-b7c3-0d5e6f7a8b9c"))
        .await
        .expect("draft ok");
}

#[tokio::test]
async fn anonymous_requests_carry_no_authorization_header() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/articles/42/status"))
        .respond_with(|request: &Request| {
            if request.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"success": true}))
            }
        })
        .mount(&server)
        .await;

    let settings = BackendSettings {
        base_url: format!("{}/api/", server.uri()),
        ..BackendSettings::default()
    };
    let backend = ReqwestBackend::new(settings, Arc::new(Anonymous)).unwrap();
    backend
        .publish_article(&article("42"))
        .await
        .expect("publish without token");
}
