use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and JSON body of one backend call.
///
/// A body that is missing or is not valid JSON is represented as an empty
/// object, so callers can always look up fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: StatusCode,
    pub data: Value,
}

impl ApiReply {
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// The server-supplied `error` string, if present and non-blank.
    pub fn error_message(&self) -> Option<&str> {
        self.data
            .get("error")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.data
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<ApiReply, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let res = self.client.post(self.url(path)).json(body).send().await?;
        Self::read_reply(path, res).await
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiReply, ApiError> {
        let res = self.client.get(self.url(path)).query(query).send().await?;
        Self::read_reply(path, res).await
    }

    async fn read_reply(path: &str, res: reqwest::Response) -> Result<ApiReply, ApiError> {
        let status = res.status();
        let bytes = res.bytes().await?;
        let data = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()));

        tracing::debug!(path, status = status.as_u16(), "backend replied");

        Ok(ApiReply { status, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("client builds")
    }

    #[tokio::test]
    async fn post_json_sends_body_and_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login/"))
            .and(body_json(json!({"username": "bob", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"user_id": "42", "username": "bob"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server)
            .post_json("/auth/login/", &json!({"username": "bob", "password": "pw"}))
            .await
            .unwrap();

        assert!(reply.ok());
        assert_eq!(reply.data["user_id"], "42");
    }

    #[tokio::test]
    async fn unparsable_body_becomes_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let reply = client(&server).post_json("/auth/signup/", &json!({})).await.unwrap();

        assert!(!reply.ok());
        assert_eq!(reply.status, StatusCode::BAD_GATEWAY);
        assert_eq!(reply.data, json!({}));
        assert_eq!(reply.error_message(), None);
    }

    #[tokio::test]
    async fn get_json_passes_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/my-tickets/"))
            .and(query_param("user_id", "CUS100001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tickets": []})))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server)
            .get_json("/chat/my-tickets/", &[("user_id", "CUS100001")])
            .await
            .unwrap();

        assert_eq!(reply.data, json!({"tickets": []}));
    }

    #[test]
    fn blank_error_strings_are_ignored() {
        let reply = ApiReply {
            status: StatusCode::UNAUTHORIZED,
            data: json!({"error": "   "}),
        };
        assert_eq!(reply.error_message(), None);

        let reply = ApiReply {
            status: StatusCode::UNAUTHORIZED,
            data: json!({"error": "Invalid username or password"}),
        };
        assert_eq!(reply.error_message(), Some("Invalid username or password"));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = ApiClient::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/auth/login/"), "http://127.0.0.1:8000/auth/login/");
    }
}
