//! Request command implementation.

use crate::request::JsonClient;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde_json::Value;
use tracing::debug;

/// HTTP verbs the request helper speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn takes_body(self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

/// Sends a single JSON request and returns the decoded response.
pub struct RequestCommand {
    client: JsonClient,
}

impl RequestCommand {
    /// Creates a new request command.
    pub fn new() -> Result<Self> {
        Ok(Self { client: JsonClient::new()? })
    }

    /// Sends `method` to `url`.
    ///
    /// `data` is raw JSON and only valid for POST and PUT; without it those
    /// verbs send no body.
    pub async fn execute(&self, method: Method, url: &str, data: Option<&str>) -> Result<Value> {
        if data.is_some() && !method.takes_body() {
            bail!("--data is only accepted for POST and PUT");
        }

        let body: Option<Value> = data
            .map(serde_json::from_str)
            .transpose()
            .context("--data is not valid JSON")?;

        debug!("{:?} {}", method, url);

        let response = match method {
            Method::Get => self.client.get(url).await?,
            Method::Post => self.client.post(url, body.as_ref()).await?,
            Method::Put => self.client.put(url, body.as_ref()).await?,
            Method::Delete => self.client.delete(url).await?,
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_with_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/books"))
            .and(body_json(json!({"title": "New"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cmd = RequestCommand::new().unwrap();
        let url = format!("{}/books", mock_server.uri());
        let value = cmd.execute(Method::Post, &url, Some(r#"{"title":"New"}"#)).await.unwrap();
        assert_eq!(value, json!({"id": 3}));
    }

    #[tokio::test]
    async fn test_put_without_data_sends_no_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/books/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cmd = RequestCommand::new().unwrap();
        let url = format!("{}/books/3", mock_server.uri());
        cmd.execute(Method::Put, &url, None).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_data_rejected_for_get_and_delete() {
        let mock_server = MockServer::start().await;
        let cmd = RequestCommand::new().unwrap();

        for verb in [Method::Get, Method::Delete] {
            let err = cmd.execute(verb, &mock_server.uri(), Some("{}")).await.unwrap_err();
            assert!(err.to_string().contains("only accepted for POST and PUT"));
        }

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_data_is_rejected_before_sending() {
        let mock_server = MockServer::start().await;
        let cmd = RequestCommand::new().unwrap();

        let err = cmd.execute(Method::Post, &mock_server.uri(), Some("{not json")).await.unwrap_err();
        assert!(err.to_string().contains("--data is not valid JSON"));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
