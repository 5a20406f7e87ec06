//! Api - route table and request dispatch.
//!
//! `Api<S>` holds the domain service, the auth service and a table of
//! handlers keyed by the first path segment. Each handler receives a
//! `Context<S>` and returns `Result<Response, ApiError>`.
//!
//! ## Example
//!
//! ```ignore
//! let api = Api::new(foundation, auth);
//! let response = api.post("/api/v1/newsletter/subscribe", json!({ "email": "a@b.com" }))?;
//! let listing = api.get("volunteers?status=active&page=1&per_page=20")?;
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::context::Context;
use super::error::ApiError;
use super::handlers;
use super::response::Response;
use crate::auth::AuthService;
use crate::domain::Foundation;
use crate::record::Record;
use crate::repository::collections::{
    self, BLOG_POSTS, CONTACTS, DONATIONS, EVENTS, PROJECTS, VOLUNTEERS,
};
use crate::store::Store;

const PATH_PREFIX: &str = "api/v1";
const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_SEARCH_COLLECTIONS: [&str; 6] =
    [VOLUNTEERS, CONTACTS, DONATIONS, PROJECTS, EVENTS, BLOG_POSTS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for Method {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ApiError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// One entry of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub method: Method,
    pub endpoint: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Result of one batch entry: the envelope or the error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Response>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Cross-collection search parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
    pub collections: Vec<String>,
    pub fields: Vec<String>,
    pub limit: Option<usize>,
}

type RouteHandler<S> = Box<dyn Fn(&Context<'_, S>) -> Result<Response, ApiError> + Send + Sync>;

/// The request façade.
pub struct Api<S> {
    foundation: Foundation<S>,
    auth: AuthService<S>,
    routes: HashMap<String, RouteHandler<S>>,
    default_per_page: usize,
    latency: Duration,
}

/// Register handler modules by their `RESOURCE` and `handle`.
macro_rules! register_routes {
    ($api:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $api
        $(
            .route($($seg)::+::RESOURCE, $($seg)::+::handle::<S>)
        )+
    };
}

impl<S: Store + 'static> Api<S> {
    /// Create a façade with every built-in route registered.
    pub fn new(foundation: Foundation<S>, auth: AuthService<S>) -> Self {
        let api = Self {
            foundation,
            auth,
            routes: HashMap::new(),
            default_per_page: 10,
            latency: Duration::ZERO,
        };
        register_routes!(
            api,
            handlers::auth,
            handlers::volunteers,
            handlers::contacts,
            handlers::donations,
            handlers::newsletter,
            handlers::projects,
            handlers::events,
            handlers::blog,
            handlers::gallery,
            handlers::statistics,
            handlers::settings,
        )
    }

    /// Register a route handler for a first path segment.
    ///
    /// Uses builder pattern, returns `self` for chaining.
    pub fn route<F>(mut self, resource: &str, handler: F) -> Self
    where
        F: Fn(&Context<'_, S>) -> Result<Response, ApiError> + Send + Sync + 'static,
    {
        self.routes.insert(resource.to_string(), Box::new(handler));
        self
    }

    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page.max(1);
        self
    }

    /// Cosmetic delay applied before every request is routed.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Dispatch `(method, path, body)` to its handler.
    ///
    /// Paths may carry a leading `/api/v1` and a query string.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        let request_id = format!("req_{}", Uuid::new_v4().simple());
        let started = Instant::now();
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let result = self.route_request(method, path, body.unwrap_or(Value::Null));
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(request = %request_id, %method, path, elapsed_ms, "request handled"),
            Err(e) => warn!(
                request = %request_id,
                %method,
                path,
                elapsed_ms,
                error = %e,
                "request failed"
            ),
        }
        result
    }

    fn route_request(&self, method: Method, path: &str, body: Value) -> Result<Response, ApiError> {
        let (raw_path, query) = match path.split_once('?') {
            Some((p, q)) => (p, parse_query(q)?),
            None => (path, HashMap::new()),
        };
        let trimmed = raw_path.trim_matches('/');
        let trimmed = match trimmed.strip_prefix(PATH_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
            _ => trimmed,
        };
        let segments: Vec<String> = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let handler = segments
            .first()
            .and_then(|resource| self.routes.get(resource))
            .ok_or_else(|| ApiError::UnknownEndpoint(trimmed.to_string()))?;

        let ctx = Context::new(method, trimmed.to_string(), segments, query, body, self);
        handler(&ctx)
    }

    pub fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.request(Method::Get, path, None)
    }

    pub fn post(&self, path: &str, body: Value) -> Result<Response, ApiError> {
        self.request(Method::Post, path, Some(body))
    }

    pub fn put(&self, path: &str, body: Value) -> Result<Response, ApiError> {
        self.request(Method::Put, path, Some(body))
    }

    pub fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.request(Method::Delete, path, None)
    }

    /// Run each request in order. A failure does not stop the batch.
    pub fn batch(&self, requests: &[BatchRequest]) -> Vec<BatchResult> {
        requests
            .iter()
            .map(
                |r| match self.request(r.method, &r.endpoint, r.data.clone()) {
                    Ok(response) => BatchResult {
                        success: true,
                        data: Some(response),
                        error: None,
                    },
                    Err(e) => BatchResult {
                        success: false,
                        data: None,
                        error: Some(e.to_string()),
                    },
                },
            )
            .collect()
    }

    /// Substring search across collections. Collections with no hits are
    /// left out of the result. The `users` collection is never searchable.
    pub fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<BTreeMap<String, Vec<Record>>, ApiError> {
        let names: Vec<&str> = if request.collections.is_empty() {
            DEFAULT_SEARCH_COLLECTIONS.to_vec()
        } else {
            request.collections.iter().map(String::as_str).collect()
        };
        let fields: Vec<&str> = request.fields.iter().map(String::as_str).collect();
        let limit = request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        let mut results = BTreeMap::new();
        for name in names {
            if !collections::ALL.contains(&name) {
                return Err(ApiError::BadRequest(format!("unknown collection: {}", name)));
            }
            // Accounts carry password hashes and reset tokens.
            if name == collections::USERS {
                return Err(ApiError::BadRequest(format!("{} cannot be searched", name)));
            }
            let mut hits = self.foundation.repo().search(name, &request.query, &fields)?;
            hits.truncate(limit);
            if !hits.is_empty() {
                results.insert(name.to_string(), hits);
            }
        }
        Ok(results)
    }

    /// Registered first path segments.
    pub fn resources(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S> Api<S> {
    pub fn foundation(&self) -> &Foundation<S> {
        &self.foundation
    }

    pub fn auth(&self) -> &AuthService<S> {
        &self.auth
    }

    pub fn default_per_page(&self) -> usize {
        self.default_per_page
    }
}

/// Decode a `application/x-www-form-urlencoded` query string.
fn parse_query(query: &str) -> Result<HashMap<String, String>, ApiError> {
    serde_urlencoded::from_str(query)
        .map_err(|e| ApiError::BadRequest(format!("invalid query string: {}", e)))
}
