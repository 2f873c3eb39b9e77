use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::QueryParams;
use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::navigation::{NavigationMode, Navigator};
use crate::routes::Route;
use crate::store::TokenCache;

#[derive(Debug, Clone)]
pub enum Body {
    None,
    Json(Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Body,
    pub headers: Vec<(String, String)>,
    pub query: QueryParams,
    pub with_auth: bool,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: Body::None,
            headers: Vec::new(),
            query: QueryParams::new(),
            with_auth: true,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidRequest(format!("unserializable body: {}", e)))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        self.body = Body::Form(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn without_auth(mut self) -> Self {
        self.with_auth = false;
        self
    }
}

/// Thin HTTP wrapper around the backend API.
///
/// `request` surfaces every failure to the caller. `request_guarded` also
/// treats HTTP 401 as the end of the session: the token cache is cleared and
/// a full reload to the login route is issued before the error is returned.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: TokenCache,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        api: &ApiConfig,
        cache: TokenCache,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(|e| ClientError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            cache,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let response = self.execute(path, options).await?;
        decode(response).await
    }

    pub async fn request_guarded<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        match self.execute(path, options).await {
            Ok(response) => decode(response).await,
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("Session rejected by backend on {}; signing out", path);
                self.cache.clear_token();
                self.navigator.navigate(Route::Login, NavigationMode::FullReload);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn execute(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.url(path);
        let headers = self.headers(&options)?;

        tracing::debug!("{} {}", options.method, url);

        let mut builder = self.http.request(options.method.clone(), &url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(options.query.as_slice());
        }
        if options.method != Method::GET {
            builder = match options.body {
                Body::None => builder,
                Body::Json(value) => builder.json(&value),
                Body::Form(pairs) => builder.form(&pairs),
            };
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(error_from_response(status, response).await)
    }

    fn headers(&self, options: &RequestOptions) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        let content_type = match options.body {
            Body::Form(_) => "application/x-www-form-urlencoded",
            Body::None | Body::Json(_) => "application/json",
        };
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::InvalidRequest(format!("invalid header name '{}'", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ClientError::InvalidRequest(format!("invalid value for header '{}'", name)))?;
            headers.insert(name, value);
        }

        if options.with_auth {
            if let Some(token) = self.cache.get_token() {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ClientError::InvalidRequest("token is not a valid header value".to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    let result = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(&bytes)
    };
    result.map_err(|e| ClientError::Decode(e.to_string()))
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> ClientError {
    let fallback = format!(
        "HTTP error {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    let data = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
        Err(_) => None,
    };

    let message = data
        .as_ref()
        .and_then(server_message)
        .unwrap_or(fallback);

    tracing::debug!("request failed with {}: {}", status, message);
    ClientError::http(status.as_u16(), message, data)
}

/// FastAPI-style `detail` first, then `message`.
fn server_message(data: &Value) -> Option<String> {
    match data.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        Some(Value::Array(items)) => {
            if let Some(msg) = items.first().and_then(|i| i.get("msg")).and_then(Value::as_str) {
                return Some(msg.to_string());
            }
        }
        _ => {}
    }
    data.get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
