use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::application::ports::{HttpConfig, ManagementApi, TokenSource};
use crate::domain::errors::*;

/// Error body returned by the Management API
#[derive(Debug, Deserialize)]
struct Auth0ErrorBody {
    #[serde(rename = "statusCode")]
    status_code: Option<u16>,
    error: Option<String>,
    message: Option<String>,
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

/// Build the shared HTTP client from configuration
pub fn build_http_client(config: &HttpConfig) -> DomainResult<Client> {
    Client::builder()
        .timeout(config.get_timeout())
        .connect_timeout(config.get_connect_timeout())
        .pool_max_idle_per_host(config.max_idle_connections)
        .pool_idle_timeout(config.get_pool_idle_timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| DomainError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
        })
}

/// Management API client over HTTPS.
///
/// Every call carries a bearer token from the injected [`TokenSource`].
pub struct Auth0RestClient {
    client: Client,
    api_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl Auth0RestClient {
    /// `api_url` is the API root, e.g. `https://tenant.auth0.com/api/v2`
    pub fn new(client: Client, api_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.tokens.bearer_token().await?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Transport {
            message: format!("HTTP request failed: {}", e),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(error_from_body(status, &text))
    }

    async fn json_body(response: Response) -> Result<Value, ApiError> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            message: format!("Failed to read response body: {}", e),
        })?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }
}

fn error_from_body(status: StatusCode, text: &str) -> ApiError {
    let message = match serde_json::from_str::<Auth0ErrorBody>(text) {
        Ok(body) => {
            if body.status_code.is_some_and(|code| code != status.as_u16()) {
                warn!(http = %status, body = ?body.status_code, "status code mismatch in error body");
            }
            let summary = body
                .message
                .or(body.error)
                .unwrap_or_else(|| status.to_string());
            match body.error_code {
                Some(code) => format!("{summary} ({code})"),
                None => summary,
            }
        }
        Err(_) if text.is_empty() => status.to_string(),
        Err(_) => text.to_string(),
    };

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ManagementApi for Auth0RestClient {
    #[instrument(skip(self))]
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let builder = self.request(Method::GET, path).await?.query(query);
        let response = self.send(builder).await?;
        Self::json_body(response).await
    }

    #[instrument(skip(self, body))]
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let builder = self.request(Method::POST, path).await?.json(body);
        let response = self.send(builder).await?;
        debug!(status = %response.status(), "created");
        Self::json_body(response).await
    }

    #[instrument(skip(self, body))]
    async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let builder = self.request(Method::PATCH, path).await?.json(body);
        let response = self.send(builder).await?;
        Self::json_body(response).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path).await?;
        self.send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::StaticTokenSource;

    #[test]
    fn decodes_provider_error_body() {
        let err = error_from_body(
            StatusCode::CONFLICT,
            r#"{"statusCode":409,"error":"Conflict","message":"The user already exists.","errorCode":"auth0_idp_error"}"#,
        );
        assert_eq!(err.status(), Some(409));
        assert!(err.to_string().contains("The user already exists. (auth0_idp_error)"));
    }

    #[test]
    fn falls_back_to_raw_text() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert!(matches!(err, ApiError::Status { status: 502, ref message } if message == "upstream unavailable"));

        let err = error_from_body(StatusCode::NOT_FOUND, "");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn joins_paths_onto_api_root() {
        let client = Auth0RestClient::new(
            Client::new(),
            "https://tenant.auth0.com/api/v2/",
            Arc::new(StaticTokenSource::new("t")),
        );
        assert_eq!(client.api_url(), "https://tenant.auth0.com/api/v2");
        assert_eq!(
            client.url("/users/auth0%7C1"),
            "https://tenant.auth0.com/api/v2/users/auth0%7C1"
        );
    }

    #[test]
    fn builds_client_from_config() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }
}
