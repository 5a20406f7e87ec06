//! Request Façade - path-routed access to the domain and auth services.
//!
//! An [`Api`] maps `(method, path, body)` to a handler selected by the first
//! path segment (`volunteers`, `events`, `auth`, ...). Handlers live in
//! `handlers/` and return a [`Response`] envelope or a typed [`ApiError`].
//!
//! With the `http` feature, [`router`] exposes the façade over axum.

mod context;
mod error;
mod handlers;
mod response;
mod service;

#[cfg(feature = "http")]
mod http;

pub use context::Context;
pub use error::ApiError;
pub use response::Response;
pub use service::{Api, BatchRequest, BatchResult, Method, SearchRequest};

#[cfg(feature = "http")]
pub use http::{router, serve};
