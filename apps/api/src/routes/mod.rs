pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Unified URL-or-text endpoint
        .route("/api/v1/generate", post(handlers::handle_generate))
        // Legacy single-persona endpoints used by the existing web UI
        .route("/api/process1", post(handlers::handle_process_individual))
        .route("/api/process2", post(handlers::handle_process_executive))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use crate::llm_client::LlmError;
    use crate::pipeline::testing::{ScriptedProvider, StubFetcher};
    use crate::pipeline::Pipeline;

    const JOB_JSON: &str = r#"{"role":"Data Engineer","skills":["Python","Airflow"],"experience":{"minimum":"2 years","preferred":"4 years"},"job_details":"Hybrid"}"#;
    const EMAIL: &str = "Subject: Data Engineer role\n\nDear Hiring Manager,\n\n...\n\nKind regards,\nABC";

    fn router(fetcher: &Arc<StubFetcher>, llm: &Arc<ScriptedProvider>) -> Router {
        build_router(AppState {
            pipeline: Pipeline::new(fetcher.clone(), llm.clone()),
        })
    }

    fn happy_llm() -> Arc<ScriptedProvider> {
        Arc::new(ScriptedProvider::new(vec![
            Ok(JOB_JSON.to_string()),
            Ok(EMAIL.to_string()),
        ]))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(&Arc::new(StubFetcher::page("")), &happy_llm());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_from_text_returns_single_result() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = happy_llm();

        let (status, body) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "input": "Data engineer, Python and Airflow, hybrid", "mode": "individual" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["job"]["role"], "Data Engineer");
        assert_eq!(results[0]["job"]["skills"], json!(["Python", "Airflow"]));
        assert_eq!(results[0]["job"]["experience"], "2 years (preferred: 4 years)");
        assert_eq!(results[0]["job"]["job_details"], "Hybrid");
        assert_eq!(results[0]["email"], EMAIL);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_mode_defaults_to_individual() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = happy_llm();

        let (status, _) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "input": "Data engineer wanted" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(llm.prompts()[1].user.contains("You are applying for this role"));
    }

    #[tokio::test]
    async fn test_generate_business_executive_mode() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = happy_llm();

        let (status, _) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "input": "Data engineer wanted", "mode": "businessExecutive" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(llm.prompts()[1].user.contains("business development executive"));
    }

    #[tokio::test]
    async fn test_legacy_routes_fetch_url_with_fixed_persona() {
        for (uri, marker) in [
            ("/api/process1", "You are applying for this role"),
            ("/api/process2", "business development executive"),
        ] {
            let fetcher = Arc::new(StubFetcher::page("<p>Data Engineer, Python</p>"));
            let llm = happy_llm();

            let (status, body) = post_json(
                router(&fetcher, &llm),
                uri,
                json!({ "url": "https://jobs.example.com/123" }),
            )
            .await;

            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["results"].as_array().unwrap().len(), 1);
            assert_eq!(fetcher.calls(), 1, "{uri}");
            assert!(llm.prompts()[1].user.contains(marker), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_empty_input_is_bad_request() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = happy_llm();

        let (status, body) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "input": "   " }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPTY_INPUT");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = happy_llm();

        let (status, body) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "text": "wrong field" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_mode_is_bad_request() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = happy_llm();

        let (status, _) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "input": "Data engineer", "mode": "pirate" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_bad_gateway() {
        let fetcher = Arc::new(StubFetcher::failing(404));
        let llm = happy_llm();

        let (status, body) = post_json(
            router(&fetcher, &llm),
            "/api/process1",
            json!({ "url": "https://jobs.example.com/gone" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "FETCH_FAILED");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_outage_is_service_unavailable_without_detail() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = Arc::new(ScriptedProvider::new(vec![Err(LlmError::Api {
            status: 500,
            message: "upstream secret detail".to_string(),
        })]));

        let (status, body) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "input": "Data engineer wanted" }),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.to_string().contains("upstream secret detail"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_provider_outage_is_logged_at_error_once() {
        let fetcher = Arc::new(StubFetcher::page("unused"));
        let llm = Arc::new(ScriptedProvider::new(vec![Err(LlmError::Api {
            status: 500,
            message: "overloaded".to_string(),
        })]));

        let (status, _) = post_json(
            router(&fetcher, &llm),
            "/api/v1/generate",
            json!({ "input": "Data engineer wanted" }),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(logs_contain("stage=extracting"));
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains(" ERROR ")).count() {
                1 => Ok(()),
                n => Err(format!("expected one error line, got {n}")),
            }
        });
    }
}
