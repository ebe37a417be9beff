use crate::cli::Args;
use crate::config::RelayConfig;
use crate::models::chat::{ChatRequest, ChatResponse, ErrorResponse, HealthCheck};
use crate::relay::ChatRelay;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use tower_http::cors::{Any, CorsLayer};

const FALLBACK_PAGE: &str = r#"<h1>FinLit Bot</h1>
<p>Backend deployed successfully.</p>
<p><strong>Test API:</strong></p>
<pre>curl -X POST /api/chat -d '{"message":"budget"}'</pre>"#;

#[derive(Clone)]
struct AppState {
    relay: Arc<ChatRelay>,
    config: Arc<RelayConfig>,
    frontend_path: String,
}

pub async fn start_http_server(
    http_port: u16,
    relay: Arc<ChatRelay>,
    config: Arc<RelayConfig>,
    args: &Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = format!("0.0.0.0:{}", http_port).parse::<SocketAddr>()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let app = build_router(relay, config, &args.allowed_origins, &args.frontend_path);

    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    error!("HTTP server error: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            }
        }
    });

    info!("HTTP server started");
    Ok(())
}

pub fn build_router(
    relay: Arc<ChatRelay>,
    config: Arc<RelayConfig>,
    allowed_origins: &str,
    frontend_path: &str,
) -> Router {
    let state = AppState {
        relay,
        config,
        frontend_path: frontend_path.to_string(),
    };

    Router::new()
        .route("/", get(frontend_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthCheck> {
    let model = state.config.models.first().cloned().unwrap_or_default();
    Json(HealthCheck {
        status: "healthy".to_string(),
        api_key_set: state.config.api_key.is_some(),
        model,
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.relay.handle_chat(&request.message).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Chat request failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: e.to_string(),
                }),
            ))
        }
    }
}

async fn frontend_handler(State(state): State<AppState>) -> Html<String> {
    match tokio::fs::read_to_string(&state.frontend_path).await {
        Ok(content) => Html(content),
        Err(_) => {
            warn!(
                "Frontend asset not found at '{}', serving fallback page",
                state.frontend_path
            );
            Html(FALLBACK_PAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::links::OfficialLinkTable;
    use crate::error::RelayError;
    use crate::llm::chat::{ChatClient, CompletionResponse};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    struct StaticClient {
        reply: Option<String>,
    }

    #[async_trait]
    impl ChatClient for StaticClient {
        async fn complete(&self, _prompt: &str) -> Result<CompletionResponse, RelayError> {
            match &self.reply {
                Some(reply) => Ok(CompletionResponse {
                    response: reply.clone(),
                }),
                None => Err(RelayError::Provider("model test: unavailable".to_string())),
            }
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    fn test_router(api_key: Option<&str>, reply: Option<&str>) -> Router {
        let links = OfficialLinkTable::default();
        let sources = links.urls();
        let config = Arc::new(RelayConfig {
            api_key: api_key.map(str::to_string),
            models: vec!["gemini-1.5-flash".to_string()],
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            system_prompt: "You are a test assistant.".to_string(),
            links,
            sources,
        });
        let relay = Arc::new(ChatRelay::with_clients(
            Arc::clone(&config),
            vec![Arc::new(StaticClient {
                reply: reply.map(str::to_string),
            })],
        ));
        build_router(relay, config, "*", "does/not/exist.html")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn chat_request(message: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "message": message }).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_key_presence_and_primary_model() {
        let app = test_router(None, None);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "api_key_set": false,
                "model": "gemini-1.5-flash"
            })
        );
    }

    #[tokio::test]
    async fn chat_returns_response_and_sources() {
        let app = test_router(Some("key"), Some("Plan your budget first."));
        let response = app.oneshot(chat_request("hello there")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["response"], "Plan your budget first.");
        assert_eq!(json["sources"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn missing_credential_maps_to_500_with_detail() {
        let app = test_router(None, Some("unused"));
        let response = app.oneshot(chat_request("hello there")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["detail"]
            .as_str()
            .unwrap()
            .contains("missing credential"));
    }

    #[tokio::test]
    async fn provider_failure_maps_to_500_with_detail() {
        let app = test_router(Some("key"), None);
        let response = app.oneshot(chat_request("hello there")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["detail"].as_str().unwrap().contains("all models failed"));
    }

    #[tokio::test]
    async fn missing_frontend_serves_fallback_page() {
        let app = test_router(None, None);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("FinLit Bot"));
    }
}
