//! REST store client

use log::{info, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::SyncError;
use crate::store::Store;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Envelope wrapping every listing response
#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<Value>,
}

#[derive(Clone)]
pub struct RestStore {
    base_url: String,
    client: reqwest::Client,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, SyncError> {
        Self::build(base_url, api_key, reqwest::Client::builder())
    }

    fn build(
        base_url: &str,
        api_key: Option<&str>,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, SyncError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SyncError::Config("Store base URL is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| SyncError::Config(format!("Invalid API key: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = builder
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &Config) -> Result<Self, SyncError> {
        let base_url = config.base_url()?;
        info!("[store] Using {} store at {}", config.target, base_url);
        Self::new(&base_url, config.api_key.as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn collection_url(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path.trim_matches('/'))
    }
}

impl Store for RestStore {
    async fn list(&self, path: &str) -> Result<Vec<Value>, SyncError> {
        let response = self.client.get(self.collection_url(path)).send().await?;
        let response = check_status(response).await?;

        let body = response.bytes().await?;
        parse_list(&body)
    }

    async fn create(&self, path: &str, body: Value) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.collection_url(path))
            .json(&body)
            .send()
            .await?;
        // The create payload is not used; the caller re-reads the collection
        check_status(response).await.map(|_| ())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("[store] HTTP {}: {}", status, body);
    let message = if body.trim().is_empty() {
        format!("Store error: {}", status)
    } else {
        body
    };
    Err(SyncError::Store {
        status: status.as_u16(),
        message,
    })
}

fn parse_list(body: &[u8]) -> Result<Vec<Value>, SyncError> {
    let parsed: ListResponse = serde_json::from_slice(body)?;
    Ok(parsed.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorInfo, ErrorKind};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn local_store(base_url: &str, api_key: Option<&str>) -> RestStore {
        RestStore::build(base_url, api_key, reqwest::Client::builder().no_proxy()).unwrap()
    }

    /// Answers a single request with a canned response and returns what was received
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (base_url, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&received);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(received).unwrap()
    }

    fn request_body(request: &str) -> Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn list_sends_json_headers_and_unwraps_the_envelope() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"data": [{"id": 1, "first_name": "Ada", "last_name": "Lovelace"}]}"#,
        )
        .await;
        let store = local_store(&base_url, Some("board-key"));

        let rows = store.list("guests").await.unwrap();
        assert_eq!(rows, [json!({"id": 1, "first_name": "Ada", "last_name": "Lovelace"})]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /guests/ HTTP/1.1\r\n"), "{}", request);
        let headers = request.to_lowercase();
        assert!(headers.contains("content-type: application/json\r\n"));
        assert!(headers.contains("x-api-key: board-key\r\n"));
    }

    #[tokio::test]
    async fn create_posts_the_record_as_json() {
        let (base_url, server) = serve_once("201 Created", r#"{"id": 3}"#).await;
        let store = local_store(&base_url, None);
        let body = json!({
            "guest_name": "Bob",
            "meal_name": "Chili",
            "dish_type": "entree",
            "serves": 8,
        });

        store.create("meals", body.clone()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /meals/ HTTP/1.1\r\n"), "{}", request);
        let headers = request.to_lowercase();
        assert!(headers.contains("content-type: application/json\r\n"));
        assert!(!headers.contains("x-api-key"));
        assert_eq!(request_body(&request), body);
    }

    #[tokio::test]
    async fn rejected_create_shows_the_store_body_verbatim() {
        let (base_url, server) = serve_once(
            "409 Conflict",
            "duplicate key value violates unique constraint \"guests_pkey\"",
        )
        .await;
        let store = local_store(&base_url, None);

        let err = store
            .create("guests", json!({"first_name": "Ada", "last_name": "Lovelace"}))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, SyncError::Store { status: 409, .. }));
        let info = ErrorInfo::from(&err);
        assert_eq!(info.kind, ErrorKind::Store);
        assert_eq!(
            info.message,
            "duplicate key value violates unique constraint \"guests_pkey\""
        );
    }

    #[tokio::test]
    async fn empty_error_body_names_the_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", "").await;
        let store = local_store(&base_url, None);

        let err = store.list("utensils").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, SyncError::Store { status: 500, .. }));
        assert!(err.to_string().starts_with("Store error: 500"), "{}", err);
    }

    #[test]
    fn collection_urls_have_one_slash_each_side() {
        let store = RestStore::new("http://localhost:8000/api/", None).unwrap();
        assert_eq!(store.base_url(), "http://localhost:8000/api");
        assert_eq!(store.collection_url("guests"), "http://localhost:8000/api/guests/");
        assert_eq!(store.collection_url("/meals/"), "http://localhost:8000/api/meals/");
    }

    #[test]
    fn empty_base_url_is_a_config_error() {
        assert!(matches!(
            RestStore::new("  ", None),
            Err(SyncError::Config(_))
        ));
    }

    #[test]
    fn listing_envelope_is_unwrapped() {
        let body = br#"{"data": [{"id": 1, "first_name": "Ada", "last_name": "Lovelace"}]}"#;
        let rows = parse_list(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["first_name"], "Ada");
    }

    #[test]
    fn bare_array_is_a_decode_error() {
        let err = parse_list(br#"[{"id": 1}]"#).unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }
}
