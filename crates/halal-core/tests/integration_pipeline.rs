#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use halal_core::ClassificationOrchestrator;
use halal_types::{AppConfig, BarcodeOutcome, ClassifyError, VerdictStatus};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-flash-latest:generateContent";
const GUMMY_BEARS: &str = "4006381333931";

fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

fn quota_exhausted_body() -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED",
            "details": [{
                "@type": "type.googleapis.com/google.rpc.RetryInfo",
                "retryDelay": "41s"
            }]
        }
    })
}

fn config_for(server: &MockServer, keys: &[&str]) -> AppConfig {
    let mut config = AppConfig::default();
    config.inference.api_base_url = format!("{}/v1beta", server.uri());
    config.catalog.base_url = server.uri();
    config.api_keys = keys.iter().map(|k| k.to_string()).collect();
    config
}

async fn mount_gummy_bears(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v0/product/{GUMMY_BEARS}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 1,
            "code": GUMMY_BEARS,
            "product": {
                "product_name": "Goldbären",
                "ingredients_text_en": "glucose syrup, sugar, gelatin (bovine), dextrose, citric acid"
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_barcode_flow_fails_over_rate_limited_key() {
    let server = MockServer::start().await;
    mount_gummy_bears(&server).await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "key-a"))
        .respond_with(ResponseTemplate::new(429).set_body_json(quota_exhausted_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "key-b"))
        .and(body_string_contains("gelatin (bovine)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            "```json\n{\"status\": \"HALAL\", \"reason\": \"Gelatin is bovine.\", \"ingredients_detected\": []}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator =
        ClassificationOrchestrator::from_config(&config_for(&server, &["key-a", "key-b"]))
            .expect("pipeline");

    let outcome =
        orchestrator.classify_by_barcode("user-1", GUMMY_BEARS).await.expect("classified");

    match outcome {
        BarcodeOutcome::Classified { name, verdict } => {
            assert_eq!(name, "Goldbären");
            assert_eq!(verdict.status, VerdictStatus::Halal);
            assert!(verdict.flagged_ingredients.is_empty());
        },
        other => panic!("expected a verdict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_product_skips_inference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v0/product/12345678.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": 0, "status_verbose": "product not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator =
        ClassificationOrchestrator::from_config(&config_for(&server, &["key-a"])).expect("pipeline");

    let outcome = orchestrator.classify_by_barcode("user-1", "12345678").await.expect("ok");
    assert_eq!(outcome, BarcodeOutcome::NotFound);
}

#[tokio::test]
async fn test_every_key_rejected_is_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{"reason": "API_KEY_INVALID"}]
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let orchestrator =
        ClassificationOrchestrator::from_config(&config_for(&server, &["key-a", "key-b"]))
            .expect("pipeline");

    let err = orchestrator.classify_by_text("user-1", "sugar, cocoa butter").await.expect_err("fail");
    assert_eq!(err, ClassifyError::AllCredentialsExhausted { attempts: 2 });
    assert_eq!(err.http_status_code(), 503);
}

#[tokio::test]
async fn test_bad_request_is_not_retried_on_other_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"code": 400, "message": "Unable to process input image.", "status": "INVALID_ARGUMENT"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator =
        ClassificationOrchestrator::from_config(&config_for(&server, &["key-a", "key-b", "key-c"]))
            .expect("pipeline");

    let err = orchestrator.classify_by_text("user-1", "sugar").await.expect_err("rejected");
    match err {
        ClassifyError::ProviderRejected { message } => {
            assert!(!message.contains("Unable to process"), "raw body leaked: {message}");
        },
        other => panic!("expected ProviderRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_catalog_outage_is_catalog_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v0/product/{GUMMY_BEARS}.json")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let orchestrator =
        ClassificationOrchestrator::from_config(&config_for(&server, &["key-a"])).expect("pipeline");

    let err = orchestrator.classify_by_barcode("user-1", GUMMY_BEARS).await.expect_err("outage");
    assert!(matches!(err, ClassifyError::CatalogUnavailable { .. }));
}

#[tokio::test]
async fn test_daily_limit_over_http_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            r#"{"status":"MUSHBOOH","reason":"E471 origin unknown","ingredients_detected":["E471"]}"#,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = config_for(&server, &["key-a"]);
    config.quota.daily_limit = 2;
    let orchestrator = ClassificationOrchestrator::from_config(&config).expect("pipeline");

    for _ in 0..2 {
        let verdict = orchestrator.classify_by_text("user-1", "E471, sugar").await.expect("ok");
        assert_eq!(verdict.status, VerdictStatus::Mushbooh);
        assert_eq!(verdict.flagged_ingredients, vec!["E471"]);
    }
    let err = orchestrator.classify_by_text("user-1", "E471, sugar").await.expect_err("limit");
    assert_eq!(err, ClassifyError::LimitReached { limit: 2 });
}
