use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use blogpost_core::FunctionResponse;
use blogpost_publisher::{
    BlogPostPublisher, GitHubDevToPublisher, PublisherConfig, PublishingPlatform, SourceHost,
};
use std::env;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Route the serverless host forwards HTTP triggers to
const FUNCTION_ROUTE: &str = "/api/BlogPostPublisher";
const DEFAULT_PORT: u16 = 3000;

struct AppState<S, P> {
    publisher: Arc<BlogPostPublisher<S, P>>,
}

impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            publisher: Arc::clone(&self.publisher),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = PublisherConfig::from_env();
    let publisher = GitHubDevToPublisher::from_config(&config)?;

    let port = listen_port(|key| env::var(key).ok());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app(publisher)).await?;

    Ok(())
}

fn app<S, P>(publisher: BlogPostPublisher<S, P>) -> Router
where
    S: SourceHost + 'static,
    P: PublishingPlatform + 'static,
{
    let state = AppState {
        publisher: Arc::new(publisher),
    };

    Router::new()
        .route("/health", get(health_check))
        .route(
            FUNCTION_ROUTE,
            get(publish_blog_post::<S, P>).post(publish_blog_post::<S, P>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Custom-handler hosts pass the port in `FUNCTIONS_CUSTOMHANDLER_PORT`.
fn listen_port<F>(lookup: F) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    ["FUNCTIONS_CUSTOMHANDLER_PORT", "PORT"]
        .iter()
        .find_map(|key| lookup(key).and_then(|v| v.trim().parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn publish_blog_post<S, P>(
    State(state): State<AppState<S, P>>,
    body: Bytes,
) -> (StatusCode, String)
where
    S: SourceHost + 'static,
    P: PublishingPlatform + 'static,
{
    into_http(state.publisher.handle(&body).await)
}

fn into_http(response: FunctionResponse) -> (StatusCode, String) {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use mockito::{Matcher, ServerGuard};
    use serde_json::json;
    use tower::ServiceExt;

    async fn router_for(server: &ServerGuard) -> Router {
        let config = PublisherConfig::new("ghp_test", "devto_key")
            .with_github_api_url(server.url())
            .with_dev_to_articles_url(format!("{}/api/articles", server.url()));
        app(GitHubDevToPublisher::from_config(&config).unwrap())
    }

    async fn mock_github(server: &mut ServerGuard, metadata_status: usize, readme_status: usize) {
        server
            .mock("GET", "/repos/octo/hello")
            .with_status(metadata_status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "hello", "description": "Hello world"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/hello/readme")
            .with_status(readme_status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": "IyBIZWxsbw==\n", "encoding": "base64"}"#)
            .create_async()
            .await;
    }

    async fn call(router: Router, body: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(FUNCTION_ROUTE)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = mockito::Server::new_async().await;
        let response = router_for(&server)
            .await
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_fields_returns_bad_request() {
        let server = mockito::Server::new_async().await;
        let (status, body) = call(router_for(&server).await, r#"{"repoowner": "octo"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "Please provide the name of the repository and the repository owner"
        );
    }

    #[tokio::test]
    async fn test_get_without_body_returns_bad_request() {
        let server = mockito::Server::new_async().await;
        let response = router_for(&server)
            .await
            .oneshot(
                Request::builder()
                    .uri(FUNCTION_ROUTE)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_publishes_repository_as_draft() {
        let mut server = mockito::Server::new_async().await;
        mock_github(&mut server, 200, 200).await;
        let publish = server
            .mock("POST", "/api/articles")
            .match_header("api-key", "devto_key")
            .match_body(Matcher::PartialJson(json!({
                "article": {
                    "title": "hello",
                    "body_markdown": "# Hello",
                    "published": false
                }
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 42, "url": "https://dev.to/x/abc"}"#)
            .create_async()
            .await;

        let (status, body) = call(
            router_for(&server).await,
            r#"{"repoowner": "octo", "reponame": "hello"}"#,
        )
        .await;

        publish.assert_async().await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.contains("https://dev.to/dashboard"));
        assert!(body.contains("https://dev.to/x/abc"));
    }

    #[tokio::test]
    async fn test_github_failure_returns_internal_error() {
        let mut server = mockito::Server::new_async().await;
        mock_github(&mut server, 404, 200).await;
        let publish = server
            .mock("POST", "/api/articles")
            .expect(0)
            .create_async()
            .await;

        let (status, body) = call(
            router_for(&server).await,
            r#"{"repoowner": "octo", "reponame": "hello"}"#,
        )
        .await;

        publish.assert_async().await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("status: 404"));
        assert!(body.contains("status: 200"));
    }

    #[tokio::test]
    async fn test_dev_to_rejection_is_mirrored() {
        let mut server = mockito::Server::new_async().await;
        mock_github(&mut server, 200, 200).await;
        server
            .mock("POST", "/api/articles")
            .with_status(422)
            .with_body(r#"{"error": "Title has already been used", "status": 422}"#)
            .create_async()
            .await;

        let (status, body) = call(
            router_for(&server).await,
            r#"{"repoowner": "octo", "reponame": "hello"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("422"));
        assert!(body.contains("Unprocessable Entity"));
    }

    #[test]
    fn test_listen_port_prefers_custom_handler_port() {
        let port = listen_port(|key| match key {
            "FUNCTIONS_CUSTOMHANDLER_PORT" => Some("7071".to_string()),
            "PORT" => Some("8080".to_string()),
            _ => None,
        });
        assert_eq!(port, 7071);
    }

    #[test]
    fn test_listen_port_falls_back() {
        assert_eq!(listen_port(|key| (key == "PORT").then(|| "8080".to_string())), 8080);
        assert_eq!(listen_port(|_| None), DEFAULT_PORT);
        assert_eq!(listen_port(|_| Some("not a port".to_string())), DEFAULT_PORT);
    }

    #[test]
    fn test_into_http_keeps_status_and_body() {
        let (status, body) = into_http(FunctionResponse {
            status: 422,
            body: "rejected".to_string(),
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "rejected");
    }
}
