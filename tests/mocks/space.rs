//! Mock Gradio-style hosted space for testing
//!
//! Serves `GET /info` (session establishment) and `POST /run/tryon`
//! (prediction).

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::constants::TEST_HF_TOKEN;

/// Mock space wrapper
pub struct MockSpace {
    server: MockServer,
}

/// Space test data builders
pub struct SpaceTestData;

impl SpaceTestData {
    /// `/info` body declaring the try-on endpoint plus a defaulted parameter
    pub fn info() -> Value {
        json!({
            "named_endpoints": {
                "/tryon": {
                    "parameters": [
                        { "parameter_name": "person_image", "parameter_has_default": false },
                        { "parameter_name": "garment_image", "parameter_has_default": false },
                        { "parameter_name": "garment_description", "parameter_has_default": false },
                        { "parameter_name": "denoise_steps", "parameter_has_default": true, "parameter_default": 30 }
                    ]
                }
            },
            "unnamed_endpoints": {}
        })
    }
}

impl MockSpace {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Session endpoint
    pub async fn mock_info(&self, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path("/info"))
            .and(header("Authorization", format!("Bearer {}", TEST_HF_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Prediction endpoint
    pub async fn mock_run(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/run/tryon"))
            .and(header("Authorization", format!("Bearer {}", TEST_HF_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies sent to the prediction endpoint
    pub async fn run_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/run/tryon")
            .map(|r| r.body_json().expect("request body is JSON"))
            .collect()
    }

    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}
