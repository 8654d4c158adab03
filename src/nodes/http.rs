//! HTTP node - issue an outbound request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::types::{HandlerContext, HandlerOutput, LogDraft, NodeHandler};
use crate::config::HttpConfig;
use crate::error::Result;
use crate::expression;
use crate::storage::LogSeverity;
use crate::workflow::NodeType;

/// Supported request methods. Anything other than POST falls back to GET
/// semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    fn from_setting(method: &str) -> Self {
        if method.eq_ignore_ascii_case("POST") {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        }
    }
}

/// Response returned by a transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

/// Outbound HTTP transport.
///
/// The call blocks the run for its full duration; the interpreter enforces
/// no timeout of its own, so any bound comes from the transport (see
/// [`HttpConfig`] defaults for the reqwest implementation).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&Value>,
    ) -> Result<HttpResponse>;
}

/// reqwest-backed transport.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout defaults: {}", e);
                Client::new()
            });
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };

        for (key, value) in headers {
            request = request.header(key, value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }
}

/// HTTP request node.
pub struct HttpNode {
    transport: Arc<dyn HttpTransport>,
}

impl HttpNode {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(ReqwestTransport::default()),
        }
    }

    /// Use a custom transport (tests, alternative clients).
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

impl Default for HttpNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeHandler for HttpNode {
    fn node_type(&self) -> NodeType {
        NodeType::Http
    }

    fn description(&self) -> &str {
        "Make an HTTP request (GET or POST)"
    }

    fn failure_message(&self) -> &str {
        "HTTP request failed"
    }

    async fn execute(&self, settings: &Value, ctx: &HandlerContext) -> Result<HandlerOutput> {
        let method = settings
            .get("method")
            .and_then(Value::as_str)
            .map(HttpMethod::from_setting)
            .unwrap_or(HttpMethod::Get);
        let url = settings
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let headers = resolve_headers(settings.get("headers"), ctx);
        let body = settings.get("body").cloned();

        debug!("HTTP {:?} {}", method, url);

        let response = self
            .transport
            .request(method, url, &headers, body.as_ref())
            .await?;

        // The response body is JSON when it parses, raw text otherwise.
        let parsed: Value = serde_json::from_str(&response.body)
            .unwrap_or(Value::String(response.body.clone()));
        let headers: Value = response
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<serde_json::Map<String, Value>>()
            .into();

        Ok(HandlerOutput::logged(
            json!({
                "response": parsed,
                "status": response.status,
                "headers": headers,
            }),
            LogDraft::new(
                LogSeverity::Success,
                "HTTP request executed",
                json!({"status": response.status}),
            ),
        ))
    }
}

/// Extract the header map from settings.
///
/// Accepts a JSON object or a JSON string encoding one; anything malformed
/// silently yields empty headers. String header values are resolved
/// per-field since JSON decoding happens after top-level resolution.
fn resolve_headers(setting: Option<&Value>, ctx: &HandlerContext) -> HashMap<String, String> {
    let raw = match setting {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        },
        _ => serde_json::Map::new(),
    };

    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => expression::resolve_str(&s, &ctx.outputs),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}
