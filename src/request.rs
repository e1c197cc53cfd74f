//! Minimal JSON request helper.
//!
//! Four verbs. POST and PUT encode an optional JSON body, and every verb
//! decodes the response body as JSON. Status codes are not inspected: an
//! error page that is not JSON surfaces as a decode error, and a JSON error
//! body decodes normally.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use wreq::{Client, RequestBuilder};

/// Errors from a JSON round-trip.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Stateless JSON client over a shared connection pool.
pub struct JsonClient {
    client: Client,
}

impl JsonClient {
    /// Creates a client with default settings.
    pub fn new() -> Result<Self, RequestError> {
        let client = Client::builder()
            .build()
            .map_err(|source| RequestError::Transport { url: String::new(), source })?;
        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, RequestError> {
        self.send(url, self.client.get(url)).await
    }

    /// Sends a POST with a JSON content type. `None` sends no body at all.
    pub async fn post<B, T>(&self, url: &str, body: Option<&B>) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = with_json_body(self.client.post(url), body)?;
        self.send(url, request).await
    }

    pub async fn put<B, T>(&self, url: &str, body: Option<&B>) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = with_json_body(self.client.put(url), body)?;
        self.send(url, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T, RequestError> {
        self.send(url, self.client.delete(url)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T, RequestError> {
        let transport = |source| RequestError::Transport { url: url.to_string(), source };

        let response = request.send().await.map_err(transport)?;
        debug!("{} responded {}", url, response.status());

        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes)
            .map_err(|source| RequestError::Decode { url: url.to_string(), source })
    }
}

fn with_json_body<B: Serialize + ?Sized>(
    request: RequestBuilder,
    body: Option<&B>,
) -> Result<RequestBuilder, RequestError> {
    let request = request.header("Content-Type", "application/json");
    match body {
        Some(body) => {
            let encoded = serde_json::to_vec(body).map_err(RequestError::Encode)?;
            Ok(request.body(encoded))
        }
        None => Ok(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> JsonClient {
        JsonClient::new().unwrap()
    }

    #[tokio::test]
    async fn test_get() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/books/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "title": "x"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/books/1", mock_server.uri());
        let value: Value = client().get(&url).await.unwrap();
        assert_eq!(value, json!({"id": 1, "title": "x"}));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/books"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"a": 1})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/books", mock_server.uri());
        let value: Value = client().post(&url, Some(&json!({"a": 1}))).await.unwrap();
        assert_eq!(value, json!({"created": true}));

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].body, br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_put_sends_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/books/7"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"title": "Renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/books/7", mock_server.uri());
        let value: Value = client().put(&url, Some(&json!({"title": "Renamed"}))).await.unwrap();
        assert_eq!(value["id"], 7);
    }

    #[tokio::test]
    async fn test_post_without_body_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ping"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/ping", mock_server.uri());
        let value: Value = client().post::<Value, _>(&url, None).await.unwrap();
        assert_eq!(value["ok"], true);

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_delete_has_no_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/books/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 7})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/books/7", mock_server.uri());
        let value: Value = client().delete(&url).await.unwrap();
        assert_eq!(value, json!({"deleted": 7}));

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
        assert!(requests[0].headers.get("content-type").is_none());
    }

    #[tokio::test]
    async fn test_typed_response() {
        #[derive(serde::Deserialize)]
        struct Created {
            id: u32,
        }

        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "extra": "x"})))
            .mount(&mock_server)
            .await;

        let created: Created =
            client().post(&mock_server.uri(), Some(&json!({"title": "t"}))).await.unwrap();
        assert_eq!(created.id, 42);
    }

    #[tokio::test]
    async fn test_error_status_with_json_body_still_decodes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&mock_server)
            .await;

        let value: Value = client().get(&mock_server.uri()).await.unwrap();
        assert_eq!(value["error"], "not found");
    }

    #[tokio::test]
    async fn test_non_json_response_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let result: Result<Value, _> = client().get(&mock_server.uri()).await;
        assert!(matches!(result, Err(RequestError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is not listening in test environments.
        let result: Result<Value, _> = client().get("http://127.0.0.1:9/").await;
        assert!(matches!(result, Err(RequestError::Transport { .. })));
    }
}
