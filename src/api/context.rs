//! Context passed to route handlers.
//!
//! Carries the parsed path, query parameters and body, plus the services a
//! handler needs. Handlers read everything through the context.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::service::{Api, Method};
use crate::auth::AuthService;
use crate::domain::Foundation;
use crate::record::Fields;
use crate::repository::{PageRequest, SortDirection};

/// The context passed to every route handler.
pub struct Context<'a, S> {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: HashMap<String, String>,
    body: Value,
    api: &'a Api<S>,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(
        method: Method,
        path: String,
        segments: Vec<String>,
        query: HashMap<String, String>,
        body: Value,
        api: &'a Api<S>,
    ) -> Self {
        Self {
            method,
            path,
            segments,
            query,
            body,
            api,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The request path as given, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First path segment, which selected the handler.
    pub fn resource(&self) -> &str {
        self.segment(0).unwrap_or_default()
    }

    /// Second path segment: a record id or a sub-action such as `login`.
    pub fn id(&self) -> Option<&str> {
        self.segment(1)
    }

    /// Third path segment, e.g. `status` in `volunteers/:id/status`.
    pub fn action(&self) -> Option<&str> {
        self.segment(2)
    }

    fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Deserialize the body into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| ApiError::BadRequest(e.to_string()))
    }

    /// Get the raw JSON body.
    pub fn raw_input(&self) -> &Value {
        &self.body
    }

    /// The body as a field map. A missing body is an empty map.
    pub fn fields(&self) -> Result<Fields, ApiError> {
        match &self.body {
            Value::Null => Ok(Fields::new()),
            Value::Object(map) => Ok(map.clone()),
            _ => Err(ApiError::BadRequest("request body must be a JSON object".into())),
        }
    }

    /// A string field of the body.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }

    /// A query parameter, falling back to a string field of the body.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .or_else(|| self.field(name))
            .filter(|v| !v.is_empty())
    }

    fn usize_param(&self, name: &str) -> Result<Option<usize>, ApiError> {
        let from_body = self.body.get(name).and_then(Value::as_u64);
        match self.query.get(name) {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("{} must be a whole number", name))),
            None => Ok(from_body.map(|n| n as usize)),
        }
    }

    /// Paging requested through `page`/`per_page`/`sort`/`order`, if any.
    pub fn page_request(&self) -> Result<Option<PageRequest>, ApiError> {
        let page = self.usize_param("page")?;
        let per_page = self.usize_param("per_page")?;
        if page.is_none() && per_page.is_none() {
            return Ok(None);
        }

        let mut request = PageRequest::new(
            page.unwrap_or(1),
            per_page.unwrap_or(self.api.default_per_page()),
        );
        if let Some(field) = self.param("sort") {
            let direction = match self.param("order") {
                Some(order) => order
                    .parse::<SortDirection>()
                    .map_err(ApiError::BadRequest)?,
                None => SortDirection::default(),
            };
            request = request.sorted_by(field, direction);
        }
        Ok(Some(request))
    }

    pub fn foundation(&self) -> &Foundation<S> {
        self.api.foundation()
    }

    pub fn auth(&self) -> &AuthService<S> {
        self.api.auth()
    }

    /// Error for a recognized resource used with the wrong method or shape.
    pub fn invalid(&self) -> ApiError {
        ApiError::InvalidEndpoint(self.resource().to_string())
    }
}
