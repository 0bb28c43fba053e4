use chrono::NaiveDate;
use mockito::Matcher;
use serde_json::json;
use trip_planner::{
    cities::City, GenerationClient, PlanOutcome, Session, TextGenerator, TripBudget, TripRequest,
};

fn chunk(content: &str) -> String {
    let payload = json!({
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "choices": [{ "index": 0, "delta": { "content": content }, "finish_reason": null }]
    });
    format!("data: {}\n\n", payload)
}

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::from(": keep-alive\n\n");
    body.push_str("data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n");
    for fragment in fragments {
        body.push_str(&chunk(fragment));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn client(server: &mockito::ServerGuard) -> GenerationClient {
    GenerationClient::new("test-key".to_string())
        .with_base_url(server.url())
        .with_model("test/model")
}

#[tokio::test]
async fn test_streamed_response_is_concatenated() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "test/model",
            "stream": true
        })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&["Day 1: ", "Hawa Mahal. ", "Day 2: Amber Fort."]))
        .create_async()
        .await;

    let text = client(&server).generate("Plan a trip").await.unwrap();

    assert_eq!(text, "Day 1: Hawa Mahal. Day 2: Amber Fort.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_plain_json_response_is_accepted() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{ "message": { "role": "assistant", "content": "Visit Pune" } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let text = client(&server).generate("Plan a trip").await.unwrap();
    assert_eq!(text, "Visit Pune");
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({ "error": { "message": "Invalid API key" } }).to_string())
        .create_async()
        .await;

    let err = client(&server).generate("Plan a trip").await.unwrap_err();
    assert_eq!(err.error_code(), "AUTH_ERROR");
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("retry-after", "1")
        .with_body(json!({ "error": { "message": "Rate limit exceeded" } }).to_string())
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).generate("Plan a trip").await.unwrap_err();
    assert_eq!(err.error_code(), "QUOTA_ERROR");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_inside_stream() {
    let mut server = mockito::Server::new_async().await;
    let mut body = chunk("Day 1: ");
    body.push_str("data: {\"error\":{\"message\":\"Provider returned error\"}}\n\n");
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let err = client(&server).generate("Plan a trip").await.unwrap_err();
    assert_eq!(err.error_code(), "API_ERROR");
    assert!(err.to_string().contains("Provider returned error"));
}

#[tokio::test]
async fn test_session_over_http_keeps_store_clean_on_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let mut session = Session::with_generator(client(&server));
    let today = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
    let request = TripRequest::new()
        .from_city(City::Hyderabad)
        .to_city(City::Chennai)
        .dates(today, today)
        .budget(TripBudget::new(1000, 1000, 1000));

    let outcome = session.generate_plan(&request, today).await.unwrap();

    match outcome {
        PlanOutcome::Failed { code, message } => {
            assert_eq!(code, "API_ERROR");
            assert!(message.contains("upstream exploded"));
        }
        PlanOutcome::Generated { .. } => panic!("expected failure"),
    }
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_truncated_stream_is_not_stored() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(chunk("Day 1: Gateway"))
        .create_async()
        .await;

    let err = client(&server).generate("Plan a trip").await.unwrap_err();
    assert_eq!(err.error_code(), "STREAM_ERROR");

    let mut session = Session::with_generator(client(&server));
    let today = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
    let request = TripRequest::new()
        .from_city(City::Mumbai)
        .to_city(City::Gokarna)
        .dates(today, today)
        .budget(TripBudget::new(1000, 2000, 500));

    let outcome = session.generate_plan(&request, today).await.unwrap();

    match outcome {
        PlanOutcome::Failed { code, message } => {
            assert_eq!(code, "STREAM_ERROR");
            assert!(message.contains("[DONE]"));
        }
        PlanOutcome::Generated { .. } => panic!("truncated stream must not produce a plan"),
    }
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_max_tokens_is_sent_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "max_tokens": 512 })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&["Day 1: Calangute"]))
        .create_async()
        .await;

    let text = client(&server)
        .with_max_tokens(512)
        .generate("Plan a trip")
        .await
        .unwrap();

    assert_eq!(text, "Day 1: Calangute");
    mock.assert_async().await;
}
