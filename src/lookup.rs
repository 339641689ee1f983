use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::time::Duration;

use crate::config::Facebook;
use crate::error::LookupError;

pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_GRAPH_VERSION: &str = "v19.0";

/// Application credentials used as the Graph API app access token.
#[derive(Clone, Default)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

impl Credentials {
    pub fn new(app_id: &str, app_secret: &str) -> Self {
        Credentials {
            app_id: app_id.to_owned(),
            app_secret: app_secret.to_owned(),
        }
    }

    pub fn access_token(&self) -> String {
        format!("{}|{}", self.app_id, self.app_secret)
    }

    pub fn is_empty(&self) -> bool {
        self.app_id.is_empty() || self.app_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// The part of a lookup response the resolver cares about.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupPayload {
    pub id: Option<String>,
}

impl LookupPayload {
    pub fn found(id: &str) -> Self {
        LookupPayload {
            id: Some(id.to_owned()),
        }
    }

    pub fn empty() -> Self {
        LookupPayload { id: None }
    }

    /// Reads `id` from an arbitrary JSON body. Graph ids are strings, but
    /// numeric ids are accepted too.
    pub fn from_json(body: &JsonValue) -> Self {
        let id = match body.get("id") {
            Some(JsonValue::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        LookupPayload { id }
    }
}

/// External identity lookup, called by the resolver as a last resort.
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(
        &self,
        profile_url: &str,
        credentials: &Credentials,
    ) -> Result<LookupPayload, LookupError>;
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: i64,
}

/// Graph API backed lookup. Resolves a profile URL through the URL node
/// (`GET /<version>/?id=<url>`).
pub struct GraphClient {
    http: Client,
    base_url: String,
    version: String,
}

impl GraphClient {
    pub fn new(cfg: &Facebook) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.get_timeout_seconds()))
            .build()
            .map_err(LookupError::Client)?;

        Ok(GraphClient {
            http,
            base_url: cfg.get_graph_url().trim_end_matches('/').to_string(),
            version: cfg.get_graph_version().to_string(),
        })
    }

    fn request_url(&self, profile_url: &str, credentials: &Credentials) -> String {
        format!(
            "{}/{}/?id={}&access_token={}",
            self.base_url,
            self.version,
            urlencoding::encode(profile_url),
            urlencoding::encode(&credentials.access_token()),
        )
    }
}

#[async_trait]
impl Lookup for GraphClient {
    async fn lookup(
        &self,
        profile_url: &str,
        credentials: &Credentials,
    ) -> Result<LookupPayload, LookupError> {
        tracing::info!(profile_url, "looking up profile on graph api");

        let response = self
            .http
            .get(self.request_url(profile_url, credentials))
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.without_url()))?;

        // Graph reports unknown references as an error body, which carries no
        // id and is therefore a miss rather than a failure.
        let status = response.status();
        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.without_url()))?;

        if let Ok(err) = serde_json::from_value::<GraphErrorBody>(body.clone()) {
            tracing::warn!(
                status = status.as_u16(),
                graph_code = err.error.code,
                graph_message = %err.error.message,
                "graph api returned an error"
            );
        }

        Ok(LookupPayload::from_json(&body))
    }
}
