use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::handlers::{handle_health, handle_valid_words, handle_word};
use crate::rotation::WordRotator;

pub struct WordServer {
    pub port: u16,
    pub rotator: Arc<WordRotator>,
    pub static_dir: Option<PathBuf>,
}

impl WordServer {
    pub fn new(port: u16, rotator: Arc<WordRotator>, static_dir: Option<PathBuf>) -> Self {
        Self {
            port,
            rotator,
            static_dir,
        }
    }

    pub fn router(&self) -> Router {
        let mut app = Router::new()
            .route("/health", get(handle_health))
            .route("/word", get(handle_word))
            .route("/validWords", get(handle_valid_words))
            .with_state(self.rotator.clone());

        match &self.static_dir {
            Some(dir) if dir.is_dir() => {
                app = app.fallback_service(ServeDir::new(dir));
            }
            Some(dir) => warn!(dir = %dir.display(), "static directory not found, not serving pages"),
            None => {}
        }

        app.layer(TraceLayer::new_for_http())
    }

    pub async fn start<F>(&self, shutdown: F) -> Result<(), String>
    where
        F: Future<Output = ()>,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let server = axum::Server::try_bind(&addr).map_err(|err| format!("bind {}: {}", addr, err))?;
        info!(%addr, "word of the day server listening");

        server
            .serve(self.router().into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::rotation::clock::{local, ManualClock};
    use crate::store::{History, MemoryStore};

    async fn rotator(words: &[&str], seen: &[&str]) -> Arc<WordRotator> {
        let store = MemoryStore::new(words).with_history(History {
            words: seen.iter().map(|word| word.to_string()).collect(),
            last_updated: Some(local(2026, 3, 10, 7)),
        });
        let clock = ManualClock::new(local(2026, 3, 10, 9));
        Arc::new(WordRotator::load(Arc::new(store), Arc::new(clock)).await.unwrap())
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn word_is_plain_text() {
        let server = WordServer::new(0, rotator(&["cat", "dog"], &["cat", "dog"]).await, None);

        let response = send_get(server.router(), "/word").await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body_string(response).await, "dog");
    }

    #[tokio::test]
    async fn word_before_first_rotation_is_unavailable() {
        let server = WordServer::new(0, rotator(&["cat"], &[]).await, None);

        let response = send_get(server.router(), "/word").await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn valid_words_lists_whole_vocabulary() {
        let server = WordServer::new(0, rotator(&["cat", "dog", "bird"], &["cat"]).await, None);

        let response = send_get(server.router(), "/validWords").await;

        assert_eq!(response.status(), StatusCode::OK);
        let words: Vec<String> = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(words, vec!["cat", "dog", "bird"]);
    }

    #[tokio::test]
    async fn health_reports_history() {
        let server = WordServer::new(0, rotator(&["cat", "dog"], &["cat"]).await, None);

        let response = send_get(server.router(), "/health").await;

        let value: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["historyLength"], 1);
        assert!(value["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn word_follows_rotation() {
        let rotator = rotator(&["cat", "dog"], &["cat"]).await;
        let server = WordServer::new(0, rotator.clone(), None);

        rotator.advance().await.unwrap();
        let response = send_get(server.router(), "/word").await;

        assert_eq!(body_string(response).await, "dog");
    }

    #[tokio::test]
    async fn static_pages_are_served_from_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>wordle</h1>").unwrap();
        let server = WordServer::new(0, rotator(&["cat"], &["cat"]).await, Some(dir.path().to_path_buf()));

        let index = send_get(server.router(), "/").await;
        let missing = send_get(server.router(), "/nope.js").await;

        assert_eq!(index.status(), StatusCode::OK);
        assert_eq!(body_string(index).await, "<h1>wordle</h1>");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_paths_404_without_static_dir() {
        let server = WordServer::new(0, rotator(&["cat"], &["cat"]).await, None);

        let response = send_get(server.router(), "/").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
