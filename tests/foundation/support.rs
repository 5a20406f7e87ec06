//! Shared fixtures.

use std::sync::Arc;

use foundation_backend::record::Fields;
use foundation_backend::{
    Api, AuthService, CollectionRepository, Foundation, InMemoryStore,
};
use serde_json::Value;

pub const NAMESPACE: &str = "it_";

pub fn repo() -> Arc<CollectionRepository<InMemoryStore>> {
    let repo = CollectionRepository::new(InMemoryStore::new(), NAMESPACE);
    repo.initialize().unwrap();
    Arc::new(repo)
}

pub fn foundation() -> Foundation<InMemoryStore> {
    Foundation::new(repo())
}

/// A façade with cheap password hashing.
pub fn api() -> Api<InMemoryStore> {
    let repo = repo();
    let auth = AuthService::new(repo.clone()).with_iterations(10);
    Api::new(Foundation::new(repo), auth)
}

pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn volunteer(email: &str) -> Fields {
    fields(serde_json::json!({
        "firstName": "Meera",
        "lastName": "Joshi",
        "email": email,
        "phone": "+91 (20) 555-0134",
        "age": 34,
        "interests": ["tree planting", "education"],
    }))
}
