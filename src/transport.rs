//! HTTP transport.
//!
//! One generic request function over the service's three base URLs. Every
//! call is authorised with the profile token, bounded by the configured
//! request timeout, and returns the decoded body together with the cookies
//! the service set. Non-2xx statuses become [`Error::Server`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::config::Profile;
use crate::error::{Error, Result};

/// Which logical base URL a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Api,
    Admin,
    Serving,
}

/// A file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a local file into an upload part named after the file.
    pub async fn read(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                ))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }
}

/// Request body.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    /// One JSON `metadata` part plus one `files` part per file.
    Multipart {
        metadata: Value,
        files: Vec<UploadFile>,
    },
}

/// A request against one of the service's base URLs.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub target: Target,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, target: Target, path: impl Into<String>) -> Self {
        Self {
            method,
            target,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, Target::Api, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, Target::Api, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, Target::Api, path)
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn multipart(mut self, metadata: Value, files: Vec<UploadFile>) -> Self {
        self.body = Some(Body::Multipart { metadata, files });
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Decoded response of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// JSON body; `Null` when empty, a JSON string when the body is not JSON.
    pub body: Value,
    /// Cookies from `Set-Cookie` headers, by name.
    pub cookies: BTreeMap<String, String>,
}

/// Base URLs of the three logical APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub admin: String,
    pub serving: String,
}

impl Endpoints {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            api: profile.api_url.clone(),
            admin: profile.admin_url(),
            serving: profile.serving_url.clone(),
        }
    }

    fn url(&self, target: Target, path: &str) -> String {
        let base = match target {
            Target::Api => &self.api,
            Target::Admin => &self.admin,
            Target::Serving => &self.serving,
        };
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Authenticated HTTP transport.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    endpoints: Endpoints,
    token: String,
}

impl Transport {
    /// Build a transport with a fixed per-request `timeout`.
    pub fn new(endpoints: Endpoints, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("automl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::classify_reqwest(&e))?;
        Ok(Self {
            http,
            endpoints,
            token: token.into(),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Send `request` and decode the response.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut url = Url::parse(&self.endpoints.url(request.target, &request.path))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .headers(extra_headers(&request.headers)?);

        builder = match request.body {
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Multipart { metadata, files }) => {
                builder.multipart(multipart_form(&metadata, files)?)
            },
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::classify_reqwest(&e))?;

        let status = response.status().as_u16();
        let cookies = parse_cookies(response.headers());
        let text = response
            .text()
            .await
            .map_err(|e| Error::classify_reqwest(&e))?;
        let body = decode_body(&text);

        if !(200..300).contains(&status) {
            tracing::warn!(status, url = %url, "Request failed");
            return Err(Error::from_status(status, error_message(&body)));
        }

        Ok(ApiResponse {
            status,
            body,
            cookies,
        })
    }

    /// `GET` on the API target.
    pub async fn get(&self, path: &str) -> Result<Value> {
        Ok(self.request(ApiRequest::get(path)).await?.body)
    }

    /// `DELETE` on the API target.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request(ApiRequest::delete(path)).await?;
        Ok(())
    }
}

fn extra_headers(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::Transport {
            message: format!("invalid header name '{name}': {e}"),
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| Error::Transport {
            message: format!("invalid header value: {e}"),
        })?;
        map.append(name, value);
    }
    Ok(map)
}

fn multipart_form(metadata: &Value, files: Vec<UploadFile>) -> Result<Form> {
    let metadata = Part::text(metadata.to_string())
        .mime_str("application/json")
        .map_err(|e| Error::classify_reqwest(&e))?;
    let mut form = Form::new().part("metadata", metadata);
    for file in files {
        form = form.part("files", Part::bytes(file.bytes).file_name(file.file_name));
    }
    Ok(form)
}

fn parse_cookies(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| cookie::Cookie::parse(raw.to_string()).ok())
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect()
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Server-provided explanation from an error body, if any.
fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Object(map) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joining() {
        let endpoints = Endpoints {
            api: "https://api.example.com/v1/".to_string(),
            admin: "https://admin.example.com".to_string(),
            serving: "https://serve.example.com".to_string(),
        };
        assert_eq!(
            endpoints.url(Target::Api, "/sources/1"),
            "https://api.example.com/v1/sources/1"
        );
        assert_eq!(
            endpoints.url(Target::Admin, "login"),
            "https://admin.example.com/login"
        );
        assert_eq!(
            endpoints.url(Target::Serving, "models/m/predict"),
            "https://serve.example.com/models/m/predict"
        );
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(decode_body("plain"), json!("plain"));
    }

    #[test]
    fn test_error_message_lookup() {
        assert_eq!(
            error_message(&json!({"message": "no such model"})),
            Some("no such model".to_string())
        );
        assert_eq!(
            error_message(&json!({"detail": "bad"})),
            Some("bad".to_string())
        );
        assert_eq!(error_message(&json!({"code": 3})), None);
        assert_eq!(error_message(&Value::Null), None);
    }

    #[test]
    fn test_parse_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("session=abc123; Path=/; HttpOnly"),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("lang=en"));
        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.get("session").map(String::as_str), Some("abc123"));
        assert_eq!(cookies.get("lang").map(String::as_str), Some("en"));
    }
}
