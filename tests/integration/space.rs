//! Hosted space backend integration tests
//!
//! Session setup (`/info`) and prediction (`/run/tryon`) fail as one unit.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants::*, test_server, tryon_body};
use crate::mocks::{MockSpace, SpaceTestData};

const MODEL_FAILED: &str = "The AI model failed to process the request.";

fn server_for(space: &MockSpace) -> axum_test::TestServer {
    let uri = space.uri();
    test_server(&[
        ("TRYON_BACKEND", "space"),
        ("HF_TOKEN", TEST_HF_TOKEN),
        ("TRYON_SPACE_URL", uri.as_str()),
    ])
}

async fn assert_model_failed(space: &MockSpace) {
    let server = server_for(space);
    let response = server.post(TRYON_PATH).json(&tryon_body("P", "C")).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": MODEL_FAILED }));
}

#[tokio::test]
async fn test_generated_image_is_extracted() {
    let space = MockSpace::start().await;
    space.mock_info(200, SpaceTestData::info()).await;
    space
        .mock_run(200, json!({ "data": ["data:image/png;base64,AAAA", "data:image/png;base64,MASK"] }))
        .await;

    let server = server_for(&space);
    let response = server.post(TRYON_PATH).json(&tryon_body("P", "C")).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "generatedImage": "AAAA" }));
}

#[tokio::test]
async fn test_named_parameters_follow_space_order() {
    let space = MockSpace::start().await;
    space.mock_info(200, SpaceTestData::info()).await;
    space
        .mock_run(200, json!({ "data": ["data:image/png;base64,AAAA"] }))
        .await;

    let server = server_for(&space);
    server.post(TRYON_PATH).json(&tryon_body("P", "C")).await;

    let bodies = space.run_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0]["data"],
        json!([
            "data:image/jpeg;base64,P",
            "data:image/jpeg;base64,C",
            "A piece of clothing",
            30
        ])
    );
    assert!(bodies[0]["session_hash"].as_str().is_some_and(|h| !h.is_empty()));
}

#[tokio::test]
async fn test_session_failure_skips_prediction() {
    let space = MockSpace::start().await;
    space.mock_info(401, json!({ "error": "invalid token" })).await;
    space
        .mock_run(200, json!({ "data": ["data:image/png;base64,AAAA"] }))
        .await;

    assert_model_failed(&space).await;
    assert!(space.run_bodies().await.is_empty());
}

#[tokio::test]
async fn test_prediction_failure() {
    let space = MockSpace::start().await;
    space.mock_info(200, SpaceTestData::info()).await;
    space.mock_run(500, json!({ "error": "CUDA out of memory" })).await;

    assert_model_failed(&space).await;
}

#[tokio::test]
async fn test_unknown_endpoint_is_model_failure() {
    let space = MockSpace::start().await;
    space
        .mock_info(200, json!({ "named_endpoints": { "/predict": { "parameters": [] } } }))
        .await;

    assert_model_failed(&space).await;
    assert!(space.run_bodies().await.is_empty());
}

#[tokio::test]
async fn test_malformed_prediction_is_model_failure() {
    let space = MockSpace::start().await;
    space.mock_info(200, SpaceTestData::info()).await;
    space.mock_run(200, json!({ "output": "AAAA" })).await;

    assert_model_failed(&space).await;
}

#[tokio::test]
async fn test_unreachable_space_is_model_failure() {
    let server = test_server(&[
        ("TRYON_BACKEND", "space"),
        ("HF_TOKEN", TEST_HF_TOKEN),
        ("TRYON_SPACE_URL", UNREACHABLE_URL),
    ]);
    let response = server.post(TRYON_PATH).json(&tryon_body("P", "C")).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": MODEL_FAILED }));
}

#[tokio::test]
async fn test_missing_token_never_contacts_space() {
    let space = MockSpace::start().await;
    space.mock_info(200, SpaceTestData::info()).await;

    let uri = space.uri();
    let server = test_server(&[("TRYON_BACKEND", "space"), ("TRYON_SPACE_URL", uri.as_str())]);
    let response = server.post(TRYON_PATH).json(&tryon_body("P", "C")).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "API key not configured on the server." })
    );
    assert_eq!(space.request_count().await, 0);
}

#[tokio::test]
async fn test_bad_input_never_contacts_space() {
    let space = MockSpace::start().await;
    space.mock_info(200, SpaceTestData::info()).await;

    let server = server_for(&space);

    let response = server
        .post(TRYON_PATH)
        .json(&json!({ "personImage": "P" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server.patch(TRYON_PATH).json(&tryon_body("P", "C")).await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(space.request_count().await, 0);
}
