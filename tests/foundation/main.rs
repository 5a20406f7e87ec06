//! Integration tests for the store, repository, domain, auth and façade.

mod support;
mod api;
mod auth;
mod backup;
mod domain;
mod repository;

#[cfg(feature = "http")]
mod http;
