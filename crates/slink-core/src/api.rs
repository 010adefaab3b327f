//! Request handlers, independent of any HTTP framework.
//!
//! Each handler takes already-extracted request fields and returns an
//! [`ApiResponse`] that a host server turns into a real response. Status codes
//! and error bodies are fixed here so every host answers the same way.

use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::SlinkConfig;
use crate::error::SlinkError;
use crate::identifier::ShortId;
use crate::resolve::{Outcome, Resolver};

pub const STATUS_OK: u16 = 200;
pub const STATUS_FOUND: u16 = 302;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Body of a create request. Missing fields read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub key: String,
}

/// `Origin` and `Host` headers of the incoming request, when present.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub origin: Option<String>,
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json { status: u16, body: Value },
    Redirect { location: String },
    Text { status: u16, body: String },
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        match self {
            ApiResponse::Json { status, .. } | ApiResponse::Text { status, .. } => *status,
            ApiResponse::Redirect { .. } => STATUS_FOUND,
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            ApiResponse::Json { .. } => Some("application/json; charset=utf-8"),
            ApiResponse::Text { .. } => Some("text/plain; charset=utf-8"),
            ApiResponse::Redirect { .. } => None,
        }
    }

    fn error(status: u16, message: &str) -> Self {
        ApiResponse::Json {
            status,
            body: json!({ "error": message }),
        }
    }
}

pub struct Api {
    resolver: Resolver,
    git_repo: Option<String>,
    fallback_url: Option<String>,
}

impl Api {
    pub fn new(resolver: Resolver, config: &SlinkConfig) -> Self {
        Self {
            resolver,
            git_repo: config.git_repo(),
            fallback_url: config.fallback_url().map(str::to_string),
        }
    }

    /// Build the store named in `config` and wrap it.
    pub fn from_config(config: &SlinkConfig) -> crate::error::Result<Self> {
        let store = crate::storage::open_store(config)?;
        Ok(Self::new(Resolver::new(store, config), config))
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Create from a raw JSON request body.
    pub async fn handle_create_json(&self, ctx: &RequestContext, body: &str) -> ApiResponse {
        if let Some(denied) = check_origin(ctx) {
            return denied;
        }
        match serde_json::from_str::<CreateRequest>(body) {
            Ok(request) => self.create(request).await,
            Err(_) => ApiResponse::error(STATUS_BAD_REQUEST, "bad request"),
        }
    }

    pub async fn handle_create(&self, ctx: &RequestContext, request: CreateRequest) -> ApiResponse {
        if let Some(denied) = check_origin(ctx) {
            return denied;
        }
        self.create(request).await
    }

    async fn create(&self, request: CreateRequest) -> ApiResponse {
        if request.content.is_empty() || request.key.is_empty() {
            return ApiResponse::error(STATUS_BAD_REQUEST, "missing content or key");
        }
        match self.resolver.create(&request.content, &request.key).await {
            Ok(link) => ApiResponse::Json {
                status: STATUS_OK,
                body: json!({
                    "short": link.short.as_str(),
                    "commitHash": link.commit_hash,
                    "gitRepo": self.git_repo,
                }),
            },
            Err(SlinkError::InvalidInput(_)) => {
                ApiResponse::error(STATUS_BAD_REQUEST, "missing content or key")
            }
            Err(err) => {
                warn!(error = %err, "create failed");
                ApiResponse::error(STATUS_SERVER_ERROR, "commit failed")
            }
        }
    }

    /// Diagnostic lookup: the raw payload line, still encrypted.
    pub async fn handle_resolve(&self, ctx: &RequestContext, hash: &str) -> ApiResponse {
        if let Some(denied) = check_origin(ctx) {
            return denied;
        }
        let Ok(id) = ShortId::parse(hash) else {
            return ApiResponse::error(STATUS_BAD_REQUEST, "invalid hash");
        };
        match self.resolver.payload(&id).await {
            Ok(payload) => ApiResponse::Json {
                status: STATUS_OK,
                body: json!({ "payload": payload }),
            },
            Err(SlinkError::NotFound(_)) => ApiResponse::error(STATUS_NOT_FOUND, "not found"),
            Err(err) => {
                warn!(%id, error = %err, "payload lookup failed");
                ApiResponse::error(STATUS_NOT_FOUND, "not found")
            }
        }
    }

    /// Visit a link: redirect, show content, or refuse.
    ///
    /// An empty key is passed through; legacy URL records need none.
    pub async fn handle_redirect(&self, hash: &str, key: &str) -> ApiResponse {
        let Ok(id) = ShortId::parse(hash) else {
            return ApiResponse::error(STATUS_BAD_REQUEST, "invalid hash");
        };
        let outcome = match self.resolver.resolve(&id, key).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%id, error = %err, "resolve failed");
                Outcome::Unresolvable
            }
        };
        match outcome {
            Outcome::RedirectTo(location) => ApiResponse::Redirect { location },
            Outcome::Content(body) => ApiResponse::Text {
                status: STATUS_OK,
                body,
            },
            Outcome::AccessDenied => ApiResponse::error(STATUS_FORBIDDEN, "access denied"),
            Outcome::Unresolvable => match &self.fallback_url {
                Some(location) => ApiResponse::Redirect {
                    location: location.clone(),
                },
                None => ApiResponse::error(STATUS_NOT_FOUND, "not found"),
            },
        }
    }
}

/// Reject cross-origin browser requests. Requests without an `Origin`
/// header (CLI tools, same-origin navigation) pass.
fn check_origin(ctx: &RequestContext) -> Option<ApiResponse> {
    let origin = ctx.origin.as_deref().filter(|origin| !origin.is_empty())?;
    if is_same_origin(origin, ctx.host.as_deref().unwrap_or_default()) {
        None
    } else {
        Some(ApiResponse::error(
            STATUS_FORBIDDEN,
            "CORS: Origin not allowed",
        ))
    }
}

/// True when `origin` is `https://<host>` (scheme, hostname and port equal).
pub fn is_same_origin(origin: &str, host: &str) -> bool {
    if origin.is_empty() || host.is_empty() {
        return false;
    }
    let (Ok(origin), Ok(host)) = (Url::parse(origin), Url::parse(&format!("https://{}", host)))
    else {
        return false;
    };
    origin.scheme() == host.scheme()
        && origin.host_str() == host.host_str()
        && origin.port() == host.port()
}
