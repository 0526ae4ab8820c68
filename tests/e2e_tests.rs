//! End-to-end tests over a real TCP listener.

mod common;

use std::sync::Arc;

use common::PNG_BYTES;
use common::harness::{TestServerConfig, spawn_test_server};
use dogmatch::breeds::StubBreedClassifier;
use dogmatch::normalize::{FALLBACK_SENTENCES, MockTextGateway};
use reqwest::StatusCode;
use serde_json::{Value, json};

const BOUNDARY: &str = "dogmatch-e2e-boundary";

fn maltese_gateway() -> Arc<MockTextGateway> {
    Arc::new(MockTextGateway::with_sentences(
        "A Maltese dog with a white coat wearing a pink bow.",
        "Accessories/appearance: pink bow.",
        "Maltese; colors: white.",
    ))
}

fn multipart(image: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"dog.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(image);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_multipart(client: &reqwest::Client, url: &str, body: Vec<u8>) -> reqwest::Response {
    client
        .post(url)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .send()
        .await
        .expect("request sent")
}

#[tokio::test]
async fn health_and_ready_over_tcp() {
    let server = spawn_test_server(TestServerConfig::with_gateway(maltese_gateway()))
        .await
        .expect("server starts");
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{}/healthz", server.url()))
        .send()
        .await
        .expect("healthz");
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(
        health
            .headers()
            .get("x-dogmatch-status")
            .and_then(|v| v.to_str().ok()),
        Some("healthy")
    );

    let ready: Value = client
        .get(format!("{}/ready", server.url()))
        .send()
        .await
        .expect("ready")
        .json()
        .await
        .expect("ready json");
    assert_eq!(ready["status"], "ok");
    assert_eq!(ready["components"]["classifier_mode"], "stub");
}

#[tokio::test]
async fn unseeded_server_reports_pending() {
    let mut config = TestServerConfig::with_gateway(maltese_gateway());
    config.seed_breeds = false;
    let server = spawn_test_server(config).await.expect("server starts");

    let response = reqwest::get(format!("{}/ready", server.url()))
        .await
        .expect("ready");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn normalize_over_tcp() {
    let gateway = maltese_gateway();
    let server = spawn_test_server(TestServerConfig::with_gateway(gateway.clone()))
        .await
        .expect("server starts");

    let body: Value = reqwest::Client::new()
        .post(server.api("/embed/normalize"))
        .json(&json!({"breed": "Maltese", "colors": "white", "features": "pink bow"}))
        .send()
        .await
        .expect("normalize")
        .json()
        .await
        .expect("normalize json");

    assert_eq!(
        body["sentences"],
        json!([
            "A Maltese dog with a white coat wearing a pink bow.",
            "Accessories/appearance: pink bow.",
            "Maltese; colors: white."
        ])
    );
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn normalize_falls_back_when_generator_is_down() {
    let server = spawn_test_server(TestServerConfig::with_gateway(Arc::new(
        MockTextGateway::always_failing(),
    )))
    .await
    .expect("server starts");

    let response = reqwest::Client::new()
        .post(server.api("/embed/normalize"))
        .json(&json!({"breed": "Pug"}))
        .send()
        .await
        .expect("normalize");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json");
    assert_eq!(body["sentences"], json!(FALLBACK_SENTENCES));
}

#[tokio::test]
async fn mapping_update_is_visible_to_classification() {
    let mut config = TestServerConfig::with_gateway(maltese_gateway());
    config.classifier = StubBreedClassifier::with_labels(vec![(
        "Maltese".to_string(),
        "말티즈".to_string(),
    )]);
    let server = spawn_test_server(config).await.expect("server starts");
    let client = reqwest::Client::new();

    let before: Value = post_multipart(&client, &server.api("/dogbreed"), multipart(PNG_BYTES, &[]))
        .await
        .json()
        .await
        .expect("dogbreed json");
    assert_eq!(before["result"], "말티즈");

    let update: Value = client
        .put(server.api("/dogbreed/mappings"))
        .json(&json!({"en": "Maltese", "ko": "몰티즈"}))
        .send()
        .await
        .expect("update")
        .json()
        .await
        .expect("update json");
    assert_eq!(update["success"], true);

    let after: Value = post_multipart(&client, &server.api("/dogbreed"), multipart(PNG_BYTES, &[]))
        .await
        .json()
        .await
        .expect("dogbreed json");
    assert_eq!(after["result"], "몰티즈");

    let listed: Value = client
        .get(server.api("/dogbreed/mappings"))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("list json");
    assert_eq!(listed["mappings"], json!([{"en": "Maltese", "ko": "몰티즈"}]));
}

#[tokio::test]
async fn embed_then_score_pair() {
    let server = spawn_test_server(TestServerConfig::with_gateway(maltese_gateway()))
        .await
        .expect("server starts");
    let client = reqwest::Client::new();
    let fields = [("breed", "Maltese"), ("colors", "white"), ("features", "pink bow")];

    let response = post_multipart(&client, &server.api("/embed"), multipart(PNG_BYTES, &fields)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let embedded: Value = response.json().await.expect("embed json");
    assert_eq!(embedded["image"].as_array().map(Vec::len), Some(64));
    assert_eq!(embedded["text"].as_array().map(Vec::len), Some(64));

    let score: Value = client
        .post(server.api("/similarity/score"))
        .json(&json!({
            "emb_a_image": embedded["image"],
            "emb_a_text": embedded["text"],
            "emb_b_image": embedded["image"],
            "emb_b_text": embedded["text"],
        }))
        .send()
        .await
        .expect("score")
        .json()
        .await
        .expect("score json");

    let score = score["score"].as_f64().expect("numeric score");
    // Same-modality terms are 1, so only the cross terms (weight 0.2 total) can pull it down.
    assert!(score <= 1.0 + 1e-5, "score {score}");
    assert!(score >= 0.6 - 1e-5, "score {score}");
}

#[tokio::test]
async fn mismatched_vectors_are_rejected() {
    let server = spawn_test_server(TestServerConfig::with_gateway(maltese_gateway()))
        .await
        .expect("server starts");

    let response = reqwest::Client::new()
        .post(server.api("/similarity/score"))
        .json(&json!({
            "emb_a_image": [1.0, 0.0],
            "emb_a_text": [1.0, 0.0, 0.0],
            "emb_b_image": [1.0, 0.0],
            "emb_b_text": [1.0, 0.0],
        }))
        .send()
        .await
        .expect("score");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error json");
    assert!(body["error"].is_string());
}
