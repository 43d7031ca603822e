// pos-client/src/http.rs
// HTTP 客户端 - 网络通信

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use shared::ApiResponse;

use crate::{ClientConfig, ClientError, ClientResult};

/// Form fields for multipart bodies, in submission order
pub type FormFields = Vec<(&'static str, String)>;

/// HTTP transport trait
///
/// Every method decodes the `{success, data, error}` envelope and returns
/// the payload, which the backend may legitimately omit on success.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>>;
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: FormFields,
    ) -> ClientResult<Option<T>>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>>;
    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>>;
}

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut req: reqwest::RequestBuilder,
    ) -> ClientResult<Option<T>> {
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    /// Decode the envelope, whatever the status code.
    ///
    /// The backend answers most failures with an envelope and a 4xx/5xx
    /// status; only when no envelope can be read does the status matter.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<Option<T>> {
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<ApiResponse<T>>(&body) {
            Ok(envelope) => envelope
                .into_result()
                .map_err(|message| ClientError::Api { message }),
            Err(e) if status.is_success() => Err(ClientError::InvalidResponse(e.to_string())),
            Err(_) => Err(ClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        tracing::debug!(path, "GET");
        self.send(self.client.get(self.url(path))).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: FormFields,
    ) -> ClientResult<Option<T>> {
        tracing::debug!(path, "POST (multipart)");
        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        self.send(self.client.post(self.url(path)).multipart(form))
            .await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        tracing::debug!(path, "POST");
        self.send(self.client.post(self.url(path))).await
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        tracing::debug!(path, "PUT");
        self.send(self.client.put(self.url(path))).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        tracing::debug!(path, "DELETE");
        self.send(self.client.delete(self.url(path))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::new("http://pos.local/").with_token("t");
        let client = NetworkHttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://pos.local");
        assert_eq!(client.url("/api/orders?p=1"), "http://pos.local/api/orders?p=1");
        assert_eq!(client.url("api/users"), "http://pos.local/api/users");
        assert_eq!(client.auth_header().as_deref(), Some("Bearer t"));
    }
}
