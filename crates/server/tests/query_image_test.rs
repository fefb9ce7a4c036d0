//! End-to-end tests for the single-image endpoint.

mod common;

use common::{chat_completion, image_part, TestApp};
use httpmock::Method::POST;
use reqwest::multipart::Form;
use serde_json::{json, Value};

#[tokio::test]
async fn custom_query_returns_raw_model_text() {
    let app = TestApp::spawn().await.unwrap();

    let model_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("What brand is this?");
        then.status(200)
            .json_body(chat_completion("It looks like an Acme kettle."));
    });

    let form = Form::new()
        .part("image", image_part(b"fake image bytes", "kettle.jpg"))
        .text("customQuery", "What brand is this?");
    let response = app
        .client
        .post(format!("{}/query-image", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"result": "It looks like an Acme kettle."}));
    model_mock.assert();
}

#[tokio::test]
async fn catalog_flow_runs_two_stages_and_normalizes_fenced_json() {
    let app = TestApp::spawn().await.unwrap();

    let extraction_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("extract the initial product details");
        then.status(200)
            .json_body(chat_completion("A stainless steel kettle, 1.5 litres."));
    });
    // The enrichment response arrives fenced; the server must still parse it.
    let enrichment_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("enhance the details");
        then.status(200).json_body(chat_completion(
            "```json\n{\"result\": {\"product_metadata\": [{\"product_name\": \"Steel Kettle\", \"price\": \"1499\"}]}}\n```",
        ));
    });

    let form = Form::new().part("image", image_part(b"fake image bytes", "kettle.jpg"));
    let response = app
        .client
        .post(format!("{}/query-image", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["result"]["result"]["product_metadata"][0]["product_name"],
        "Steel Kettle"
    );
    extraction_mock.assert();
    enrichment_mock.assert();
}

#[tokio::test]
async fn missing_image_field_is_a_400_with_error_envelope() {
    let app = TestApp::spawn().await.unwrap();

    let form = Form::new().text("customQuery", "anything");
    let response = app
        .client
        .post(format!("{}/query-image", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("image"));
}

#[tokio::test]
async fn unparseable_model_output_is_a_500_with_raw_text_in_details() {
    let app = TestApp::spawn().await.unwrap();

    app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("extract the initial product details");
        then.status(200).json_body(chat_completion("some extraction"));
    });
    app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("enhance the details");
        then.status(200)
            .json_body(chat_completion("I am sorry, I cannot help with that."));
    });

    let form = Form::new().part("image", image_part(b"fake image bytes", "kettle.jpg"));
    let response = app
        .client
        .post(format!("{}/query-image", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error parsing the model response");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("I am sorry, I cannot help with that."));
}

#[tokio::test]
async fn primary_model_failure_falls_back_to_secondary_tier() {
    let app = TestApp::spawn_with(|config| {
        config.fallback_model = Some("mock-fallback".to_string());
    })
    .await
    .unwrap();

    let primary_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains(r#""model":"mock-primary""#);
        then.status(503).body("model overloaded");
    });
    let fallback_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains(r#""model":"mock-fallback""#);
        then.status(200)
            .json_body(chat_completion("The price is on the label."));
    });

    let form = Form::new()
        .part("image", image_part(b"fake image bytes", "kettle.jpg"))
        .text("customQuery", "What is the price?");
    let response = app
        .client
        .post(format!("{}/query-image", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"], "The price is on the label.");
    primary_mock.assert_hits(1);
    fallback_mock.assert_hits(1);
}

#[tokio::test]
async fn both_tiers_failing_reports_a_model_error() {
    let app = TestApp::spawn_with(|config| {
        config.fallback_model = Some("mock-fallback".to_string());
    })
    .await
    .unwrap();

    let model_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(503).body("model overloaded");
    });

    let form = Form::new()
        .part("image", image_part(b"fake image bytes", "kettle.jpg"))
        .text("customQuery", "What is this?");
    let response = app
        .client
        .post(format!("{}/query-image", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error querying the generative model");
    // Exactly one fallback attempt, no deeper cascade.
    model_mock.assert_hits(2);
}

#[tokio::test]
async fn root_and_health_respond() {
    let app = TestApp::spawn().await.unwrap();

    let root = app.client.get(&app.address).send().await.unwrap();
    assert_eq!(root.status(), 200);
    assert!(root.text().await.unwrap().contains("shelfscan"));

    let health = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "OK");
}
