use std::sync::Arc;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::breeds::{BreedClassifier, BreedMappingStore, StubBreedClassifier, default_labels};
use crate::embedding::StubEmbedder;
use crate::gateway::{DOGMATCH_STATUS_HEADER, HandlerState, create_router_with_state};
use crate::image::fixtures;
use crate::normalize::{FALLBACK_SENTENCES, MockTextGateway, NormalizationPipeline, RetryPolicy};
use crate::similarity::SimilarityScorer;

const BOUNDARY: &str = "dogmatch-test-boundary";
const TEST_DIM: usize = 32;

fn sentences_gateway() -> MockTextGateway {
    MockTextGateway::with_sentences(
        "A Maltese dog with a white coat wearing a pink bow.",
        "Accessories/appearance: pink bow.",
        "Maltese; colors: white.",
    )
}

fn build_state(
    gateway: MockTextGateway,
    classifier: StubBreedClassifier,
    seed: bool,
) -> HandlerState {
    let pipeline = NormalizationPipeline::new(Arc::new(gateway), RetryPolicy::new(1, 1.2));
    let breeds = BreedMappingStore::new();
    if seed {
        breeds.seed(classifier.labels());
    }

    HandlerState::new(
        Arc::new(pipeline),
        Arc::new(SimilarityScorer::default()),
        breeds,
        Arc::new(classifier),
        Arc::new(StubEmbedder::new(TEST_DIM).unwrap()),
        "믹스",
    )
}

fn test_router() -> Router {
    create_router_with_state(build_state(
        sentences_gateway(),
        StubBreedClassifier::new(),
        true,
    ))
}

fn multipart_body(image: Option<&[u8]>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(image) = image {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"image\"; filename=\"dog.png\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(image);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn send_multipart(router: &Router, uri: &str, body: Vec<u8>) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn send_get(router: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_healthz() {
        let response = send_get(&test_router(), "/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(DOGMATCH_STATUS_HEADER).unwrap(),
            "healthy"
        );
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_when_seeded() {
        let response = send_get(&test_router(), "/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["components"]["breeds"], "ready");
        assert_eq!(body["components"]["classifier_mode"], "stub");
        assert_eq!(body["components"]["embedder_mode"], "stub");
    }

    #[tokio::test]
    async fn test_not_ready_before_seed() {
        let router = create_router_with_state(build_state(
            sentences_gateway(),
            StubBreedClassifier::new(),
            false,
        ));
        let response = send_get(&router, "/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "pending");
    }
}

mod normalize_handler_tests {
    use super::*;

    #[tokio::test]
    async fn test_normalize_returns_three_sentences() {
        let body = serde_json::json!({
            "breed": "Maltese",
            "colors": "white",
            "features": "pink bow"
        });
        let response = send_json(&test_router(), "POST", "/api/v1/embed/normalize", body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let sentences = body["sentences"].as_array().unwrap();
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[1], "Accessories/appearance: pink bow.");
    }

    #[tokio::test]
    async fn test_normalize_accepts_missing_fields() {
        let response = send_json(
            &test_router(),
            "POST",
            "/api/v1/embed/normalize",
            serde_json::json!({}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_normalize_falls_back_when_generator_fails() {
        let router = create_router_with_state(build_state(
            MockTextGateway::always_failing(),
            StubBreedClassifier::new(),
            true,
        ));
        let response = send_json(
            &router,
            "POST",
            "/api/v1/embed/normalize",
            serde_json::json!({"breed": "Maltese"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sentences"], serde_json::json!(FALLBACK_SENTENCES));
    }

    #[tokio::test]
    async fn test_normalize_rejects_bad_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/embed/normalize")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
    }
}

mod similarity_handler_tests {
    use super::*;

    fn unit(hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; 4];
        v[hot] = 1.0;
        v
    }

    #[tokio::test]
    async fn test_cross_modal_orthogonal_scores_weighted_sum() {
        let body = serde_json::json!({
            "emb_a_image": unit(0),
            "emb_a_text": unit(1),
            "emb_b_image": unit(0),
            "emb_b_text": unit(1),
        });
        let response = send_json(&test_router(), "POST", "/api/v1/similarity/score", body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let score = body_json(response).await["score"].as_f64().unwrap();
        // ii and tt match, it and ti are orthogonal.
        assert!((score - 0.8).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_weights_override() {
        let body = serde_json::json!({
            "emb_a_image": unit(0),
            "emb_a_text": unit(1),
            "emb_b_image": unit(0),
            "emb_b_text": unit(2),
            "weights": {"w_ii": 1.0, "w_it": 0.0, "w_ti": 0.0, "w_tt": 0.0},
        });
        let response = send_json(&test_router(), "POST", "/api/v1/similarity/score", body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let score = body_json(response).await["score"].as_f64().unwrap();
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_zero_vector_is_client_error() {
        let body = serde_json::json!({
            "emb_a_image": [0.0, 0.0, 0.0, 0.0],
            "emb_a_text": unit(1),
            "emb_b_image": unit(0),
            "emb_b_text": unit(1),
        });
        let response = send_json(&test_router(), "POST", "/api/v1/similarity/score", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(DOGMATCH_STATUS_HEADER).unwrap(),
            "invalid_embedding"
        );
        let body = body_json(response).await;
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_negative_weight_is_client_error() {
        let body = serde_json::json!({
            "emb_a_image": unit(0),
            "emb_a_text": unit(1),
            "emb_b_image": unit(0),
            "emb_b_text": unit(1),
            "weights": {"w_ii": -1.0, "w_it": 0.0, "w_ti": 0.0, "w_tt": 0.0},
        });
        let response = send_json(&test_router(), "POST", "/api/v1/similarity/score", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_field_is_client_error() {
        let body = serde_json::json!({"emb_a_image": unit(0)});
        let response = send_json(&test_router(), "POST", "/api/v1/similarity/score", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

mod dogbreed_handler_tests {
    use super::*;

    #[tokio::test]
    async fn test_classifies_and_localizes() {
        let classifier = StubBreedClassifier::new();
        let expected_en = match classifier.classify(fixtures::PNG).unwrap() {
            crate::breeds::ClassificationOutcome::Breed(en) => en,
            other => panic!("unexpected outcome: {other:?}"),
        };
        let expected_ko = default_labels()
            .into_iter()
            .find(|(en, _)| *en == expected_en)
            .map(|(_, ko)| ko)
            .unwrap();

        let response = send_multipart(
            &test_router(),
            "/api/v1/dogbreed",
            multipart_body(Some(fixtures::PNG), &[]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["result"], expected_ko);
    }

    #[tokio::test]
    async fn test_no_detection_returns_mix_label() {
        let router = create_router_with_state(build_state(
            sentences_gateway(),
            StubBreedClassifier::without_detection(),
            true,
        ));
        let response = send_multipart(
            &router,
            "/api/v1/dogbreed",
            multipart_body(Some(fixtures::JPEG), &[]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["result"], "믹스");
    }

    #[tokio::test]
    async fn test_unreadable_image_returns_mix_label() {
        let response = send_multipart(
            &test_router(),
            "/api/v1/dogbreed",
            multipart_body(Some(b"not an image at all"), &[]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["result"], "믹스");
    }

    #[tokio::test]
    async fn test_missing_image_is_client_error() {
        let response = send_multipart(
            &test_router(),
            "/api/v1/dogbreed",
            multipart_body(None, &[("breed", "Pug")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_multipart_is_client_error() {
        let response = send_json(
            &test_router(),
            "POST",
            "/api/v1/dogbreed",
            serde_json::json!({"image": "base64?"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

mod mapping_handler_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_mappings() {
        let response = send_get(&test_router(), "/api/v1/dogbreed/mappings").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let mappings = body["mappings"].as_array().unwrap();
        assert_eq!(mappings.len(), default_labels().len());
        assert_eq!(mappings[0], serde_json::json!({"en": "Chihuahua", "ko": "치와와"}));
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let router = test_router();
        let response = send_json(
            &router,
            "PUT",
            "/api/v1/dogbreed/mappings",
            serde_json::json!({"en": "Chihuahua", "ko": " 치와와 (장모) "}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);

        let listed = body_json(send_get(&router, "/api/v1/dogbreed/mappings").await).await;
        assert_eq!(listed["mappings"][0]["ko"], "치와와 (장모)");
    }

    #[tokio::test]
    async fn test_update_unknown_label() {
        let response = send_json(
            &test_router(),
            "PUT",
            "/api/v1/dogbreed/mappings",
            serde_json::json!({"en": "Unknown", "ko": "모름"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("Unknown"));
    }

    #[tokio::test]
    async fn test_mappings_before_seed_is_server_error() {
        let router = create_router_with_state(build_state(
            sentences_gateway(),
            StubBreedClassifier::new(),
            false,
        ));
        let response = send_get(&router, "/api/v1/dogbreed/mappings").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], 500);
    }
}

mod embed_handler_tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_returns_sentences_and_vectors() {
        let response = send_multipart(
            &test_router(),
            "/api/v1/embed",
            multipart_body(
                Some(fixtures::PNG),
                &[("breed", "Maltese"), ("colors", "white"), ("features", "pink bow")],
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sentences"].as_array().unwrap().len(), 3);
        assert_eq!(body["image"].as_array().unwrap().len(), TEST_DIM);
        assert_eq!(body["text"].as_array().unwrap().len(), TEST_DIM);
    }

    #[tokio::test]
    async fn test_embed_invalid_image_is_structured_error() {
        let response = send_multipart(
            &test_router(),
            "/api/v1/embed",
            multipart_body(Some(b"garbage"), &[("breed", "Maltese")]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], 500);
        assert!(body["error"].as_str().unwrap().starts_with("embedding failed"));
    }

    #[tokio::test]
    async fn test_embed_requires_image() {
        let response = send_multipart(
            &test_router(),
            "/api/v1/embed",
            multipart_body(None, &[("breed", "Maltese")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
