use super::*;
use crate::credential_pool::CooldownPolicy;
use crate::testing::{ScriptedProvider, Step};
use halal_types::{ImagePayload, VerdictStatus};

const HALAL_JSON: &str = r#"{"status":"HALAL","reason":"plant based","ingredients_detected":[]}"#;

fn pool(secrets: &[&str]) -> Arc<CredentialPool> {
    Arc::new(CredentialPool::new(secrets.iter().copied(), CooldownPolicy::default()))
}

fn build_invoker(
    secrets: &[&str],
    provider: Arc<ScriptedProvider>,
    settings: InvokerSettings,
) -> InferenceInvoker {
    InferenceInvoker::new(pool(secrets), provider, settings)
}

fn rate_limited() -> Step {
    Step::Fail(ProviderError::RateLimited { retry_after_secs: None })
}

fn text(s: &str) -> InferencePayload {
    InferencePayload::Text(s.to_string())
}

#[tokio::test]
async fn test_failover_to_second_credential() {
    let provider = ScriptedProvider::replying(HALAL_JSON).with_step("A", rate_limited()).into_arc();
    let invoker = build_invoker(&["A", "B"], provider.clone(), InvokerSettings::default());

    let verdict = invoker.classify(text("sugar, salt")).await.expect("B answers");

    assert_eq!(verdict.status, VerdictStatus::Halal);
    assert!(provider.call_count() <= 2);
    assert_eq!(provider.calls_with("B"), 1);
    assert!(provider.calls_with("A") <= 1);
}

#[tokio::test]
async fn test_all_failing_is_exhausted_after_pool_size() {
    let provider = ScriptedProvider::new(rate_limited()).into_arc();
    let invoker = build_invoker(&["A", "B", "C"], provider.clone(), InvokerSettings::default());

    let err = invoker.classify(text("sugar")).await.expect_err("nothing succeeds");

    assert_eq!(err, InvokeError::Exhausted { attempts: 3 });
    assert_eq!(provider.call_count(), 3);
    for secret in ["A", "B", "C"] {
        assert_eq!(provider.calls_with(secret), 1, "{secret} tried once");
    }
}

#[tokio::test]
async fn test_attempts_capped_by_settings() {
    let provider = ScriptedProvider::new(rate_limited()).into_arc();
    let settings = InvokerSettings { max_attempts: 2, ..InvokerSettings::default() };
    let invoker = build_invoker(&["A", "B", "C", "D"], provider.clone(), settings);

    let err = invoker.classify(text("sugar")).await.expect_err("nothing succeeds");

    assert_eq!(err, InvokeError::Exhausted { attempts: 2 });
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_empty_pool_makes_no_calls() {
    let provider = ScriptedProvider::replying(HALAL_JSON).into_arc();
    let invoker = build_invoker(&[], provider.clone(), InvokerSettings::default());

    let err = invoker.classify(text("sugar")).await.expect_err("no keys");

    assert_eq!(err, InvokeError::Exhausted { attempts: 0 });
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_bad_request_is_not_rotated() {
    let bad = ProviderError::BadRequest { status: 400, message: "image too large".to_string() };
    let provider = ScriptedProvider::new(Step::Fail(bad.clone())).into_arc();
    let invoker = build_invoker(&["A", "B", "C"], provider.clone(), InvokerSettings::default());

    let err = invoker.classify(text("sugar")).await.expect_err("rejected");

    assert_eq!(err, InvokeError::Rejected(bad));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_triggers_failover() {
    let provider = ScriptedProvider::replying(HALAL_JSON)
        .with_step("A", Step::Hang(Duration::from_secs(3600)))
        .into_arc();
    let settings = InvokerSettings { max_attempts: 3, attempt_timeout: Duration::from_secs(30) };
    let invoker = build_invoker(&["A", "B"], provider.clone(), settings);
    // Steer the first attempt to A.
    invoker.pool().report_failure("key-2", None);

    let started = tokio::time::Instant::now();
    let verdict = invoker.classify(text("sugar")).await.expect("B answers");

    assert_eq!(verdict.status, VerdictStatus::Halal);
    assert_eq!(provider.calls_with("A"), 1);
    assert_eq!(provider.calls_with("B"), 1);
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert_eq!(provider.in_flight(), 0, "timed-out call must be dropped");
    assert_eq!(invoker.pool().failure_count("key-1"), Some(1));
}

#[tokio::test]
async fn test_failed_credential_avoided_by_later_calls() {
    let provider = ScriptedProvider::replying(HALAL_JSON).with_step("A", rate_limited()).into_arc();
    let invoker = build_invoker(&["A", "B"], provider.clone(), InvokerSettings::default());

    for _ in 0..10 {
        invoker.classify(text("sugar")).await.expect("B answers");
    }

    // A cools down after its first failure and is not picked again while B is healthy.
    assert!(provider.calls_with("A") <= 1, "A called {} times", provider.calls_with("A"));
    assert_eq!(provider.calls_with("B"), 10);
}

#[tokio::test]
async fn test_success_clears_failure_count() {
    let provider = ScriptedProvider::replying(HALAL_JSON).into_arc();
    let invoker = build_invoker(&["A"], provider, InvokerSettings::default());
    invoker.pool().report_failure("key-1", None);

    invoker.classify(text("sugar")).await.expect("cooling key still used as last resort");

    assert_eq!(invoker.pool().failure_count("key-1"), Some(0));
}

#[tokio::test]
async fn test_classification_uses_rubric_not_persona() {
    let provider = ScriptedProvider::replying(HALAL_JSON).into_arc();
    let invoker = build_invoker(&["A"], provider.clone(), InvokerSettings::default());

    invoker.classify(text("gelatin (bovine)")).await.expect("ok");
    invoker
        .classify(InferencePayload::Image(ImagePayload::new(vec![0xFF, 0xD8], "image/jpeg")))
        .await
        .expect("ok");

    for call in provider.calls() {
        assert_eq!(call.input.system_instruction, prompts::CLASSIFICATION_RUBRIC);
    }
}

#[tokio::test]
async fn test_chat_uses_persona_and_returns_raw_text() {
    let provider = ScriptedProvider::replying("Wa alaykum as-salam.").into_arc();
    let invoker = build_invoker(&["A"], provider.clone(), InvokerSettings::default());

    let answer = invoker.chat("Is shrimp halal?").await.expect("ok");

    assert_eq!(answer, "Wa alaykum as-salam.");
    let calls = provider.calls();
    assert_eq!(calls[0].input.system_instruction, prompts::ADVISOR_PERSONA);
    assert_eq!(calls[0].input.payload, text("Is shrimp halal?"));
}

#[tokio::test]
async fn test_daily_insight_parses_model_reply() {
    let reply = r#"{"arabic":"فَاذْكُرُونِي أَذْكُرْكُمْ","translation":"Remember Me; I will remember you.","source":"2:152"}"#;
    let provider = ScriptedProvider::replying(reply).into_arc();
    let invoker = build_invoker(&["A"], provider, InvokerSettings::default());

    let insight = invoker.daily_insight().await;
    assert_eq!(insight.source, "2:152");
}

#[tokio::test]
async fn test_daily_insight_falls_back() {
    let provider = ScriptedProvider::new(rate_limited()).into_arc();
    let invoker = build_invoker(&["A"], provider, InvokerSettings::default());
    assert_eq!(invoker.daily_insight().await, DailyInsight::default());

    let provider = ScriptedProvider::replying("no json here").into_arc();
    let invoker = build_invoker(&["A"], provider, InvokerSettings::default());
    assert_eq!(invoker.daily_insight().await, DailyInsight::default());
}

#[tokio::test]
async fn test_unparseable_reply_is_unknown_not_error() {
    let provider = ScriptedProvider::replying("I cannot process this image").into_arc();
    let invoker = build_invoker(&["A"], provider, InvokerSettings::default());

    let verdict = invoker.classify(text("???")).await.expect("parsing never fails");
    assert_eq!(verdict.status, VerdictStatus::Unknown);
    assert_eq!(verdict.reason, "I cannot process this image");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_call_stops_rotating() {
    let provider = ScriptedProvider::new(Step::Hang(Duration::from_secs(3600))).into_arc();
    let settings = InvokerSettings { max_attempts: 3, attempt_timeout: Duration::from_secs(30) };
    let invoker = Arc::new(build_invoker(&["A", "B", "C"], provider.clone(), settings));

    let task = {
        let invoker = Arc::clone(&invoker);
        tokio::spawn(async move { invoker.classify(text("sugar")).await })
    };

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(provider.call_count(), 1);
    task.abort();
    let _ = task.await;

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(provider.call_count(), 1, "no attempts after cancellation");
    assert_eq!(provider.in_flight(), 0);
}

#[test]
fn test_invoke_error_maps_to_classify_error() {
    let err: ClassifyError = InvokeError::Exhausted { attempts: 2 }.into();
    assert_eq!(err, ClassifyError::AllCredentialsExhausted { attempts: 2 });

    let err: ClassifyError = InvokeError::Rejected(ProviderError::BadRequest {
        status: 400,
        message: "key AIza-secret in project 42".to_string(),
    })
    .into();
    match err {
        ClassifyError::ProviderRejected { message } => assert!(!message.contains("AIza")),
        other => panic!("unexpected {other:?}"),
    }
}
