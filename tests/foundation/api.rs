use foundation_backend::api::{BatchRequest, Method, SearchRequest};
use foundation_backend::{ApiError, DomainError};
use serde_json::{json, Value};

use crate::support::{api, volunteer};

fn data(response: &foundation_backend::Response) -> &Value {
    response.data.as_ref().unwrap()
}

#[test]
fn prefix_and_query_string_are_accepted() {
    let api = api();
    api.post("volunteers", Value::Object(volunteer("a@example.org")))
        .unwrap();

    let plain = api.get("volunteers").unwrap();
    let prefixed = api.get("/api/v1/volunteers?status=pending").unwrap();
    assert_eq!(plain.extra("total"), Some(&json!(1)));
    assert_eq!(prefixed.extra("total"), Some(&json!(1)));

    let none = api.get("/api/v1/volunteers?status=active").unwrap();
    assert_eq!(data(&none), &json!([]));
}

#[test]
fn unknown_and_invalid_endpoints() {
    let api = api();
    let err = api.get("/api/v1/nowhere/1").unwrap_err();
    assert!(matches!(err, ApiError::UnknownEndpoint(ref p) if p == "nowhere/1"));
    assert_eq!(err.status_code(), 404);

    let err = api.delete("donations").unwrap_err();
    assert_eq!(err.to_string(), "Invalid donations endpoint");
    assert_eq!(err.status_code(), 400);
}

#[test]
fn missing_record_is_repository_not_found() {
    let api = api();
    for path in ["volunteers/missing", "projects/missing", "blog/missing"] {
        let err = api.get(path).unwrap_err();
        assert!(
            matches!(err, ApiError::Repository(ref e) if e.is_not_found()),
            "{path}: {err:?}"
        );
    }
    let err = api.delete("contacts/missing").unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn domain_errors_keep_their_message() {
    let api = api();
    api.post("volunteers", Value::Object(volunteer("a@example.org")))
        .unwrap();
    let err = api
        .post("volunteers", Value::Object(volunteer("a@example.org")))
        .unwrap_err();
    assert!(matches!(err, ApiError::Domain(DomainError::Duplicate(_))));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn volunteer_lifecycle() {
    let api = api();
    let created = api
        .post("volunteers", Value::Object(volunteer("a@example.org")))
        .unwrap();
    assert_eq!(created.message.as_deref(), Some("Volunteer registration successful"));
    let id = data(&created)["id"].as_str().unwrap().to_string();

    let updated = api
        .put(&format!("volunteers/{id}/status"), json!({ "status": "active" }))
        .unwrap();
    assert_eq!(data(&updated)["status"], "active");

    let deleted = api.delete(&format!("volunteers/{id}")).unwrap();
    assert_eq!(deleted.message.as_deref(), Some("Volunteer deleted successfully"));
    assert!(api.get(&format!("volunteers/{id}")).is_err());
}

#[test]
fn paged_listing() {
    let api = api();
    for n in 0..25 {
        api.post("projects", json!({ "title": format!("p{n:02}"), "goal_amount": 100 }))
            .unwrap();
    }

    let page = api
        .get("projects?page=2&per_page=10&sort=title&order=asc")
        .unwrap();
    let rows = data(&page).as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["title"], "p10");
    assert_eq!(page.extra("total"), Some(&json!(25)));
    assert_eq!(page.extra("page"), Some(&json!(2)));
    let pagination = page.extra("pagination").unwrap();
    assert_eq!(pagination["totalPages"], 3);
    assert_eq!(pagination["hasNext"], true);
    assert_eq!(pagination["hasPrev"], true);
}

#[test]
fn donations_carry_total_amount() {
    let api = api();
    for amount in [100, 250] {
        api.post(
            "donations",
            json!({
                "name": "D",
                "email": "d@example.org",
                "amount": amount,
                "donationType": "one-time",
            }),
        )
        .unwrap();
    }
    let listing = api.get("donations?period=month").unwrap();
    assert_eq!(listing.extra("total_amount"), Some(&json!(350.0)));

    let err = api.get("donations?period=decade").unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn newsletter_routes() {
    let api = api();
    let subscribed = api
        .post("newsletter/subscribe", json!({ "email": "n@example.org" }))
        .unwrap();
    assert_eq!(
        subscribed.message.as_deref(),
        Some("Successfully subscribed to our newsletter")
    );
    assert_eq!(api.get("newsletter").unwrap().extra("total"), Some(&json!(1)));

    let left = api
        .post("newsletter/unsubscribe", json!({ "email": "n@example.org" }))
        .unwrap();
    assert_eq!(left.message.as_deref(), Some("Successfully unsubscribed"));
    assert!(left.data.is_none());
}

#[test]
fn event_registration_route() {
    let api = api();
    let event = api
        .post("events", json!({ "title": "Walk", "max_attendees": 1 }))
        .unwrap();
    let id = data(&event)["id"].as_str().unwrap().to_string();

    let registered = api
        .post(
            &format!("events/{id}"),
            json!({ "action": "register", "attendee": { "name": "Ana" } }),
        )
        .unwrap();
    assert_eq!(data(&registered)["name"], "Ana");

    let err = api
        .post(
            &format!("events/{id}"),
            json!({ "action": "register", "attendee": { "name": "Ben" } }),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Event is fully booked");

    let err = api
        .post(&format!("events/{id}"), json!({ "action": "cancel" }))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidEndpoint(_)));
}

#[test]
fn blog_get_counts_views() {
    let api = api();
    let post = api
        .post("blog", json!({ "title": "Hello", "status": "published" }))
        .unwrap();
    let id = data(&post)["id"].as_str().unwrap().to_string();

    api.get(&format!("blog/{id}")).unwrap();
    let viewed = api.get(&format!("blog/{id}")).unwrap();
    assert_eq!(data(&viewed)["views"], 2);
}

#[test]
fn statistics_and_settings() {
    let api = api();
    let stats = api.get("statistics").unwrap();
    assert!(data(&stats).get("analytics").is_some());

    let updated = api
        .put("statistics/trees_planted", json!({ "value": 10, "operation": "increment" }))
        .unwrap();
    assert_eq!(data(&updated)["trees_planted"], 50010);

    let err = api
        .put("statistics/trees_planted", json!({ "value": 1, "operation": "double" }))
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let settings = api.put("settings", json!({ "site_name": "Green Roots" })).unwrap();
    assert_eq!(data(&settings)["site_name"], "Green Roots");
    assert_eq!(data(&api.get("settings").unwrap())["site_name"], "Green Roots");
}

#[test]
fn batch_continues_past_failures() {
    let api = api();
    let results = api.batch(&[
        BatchRequest {
            method: Method::Post,
            endpoint: "contacts".into(),
            data: Some(json!({
                "name": "C",
                "email": "c@example.org",
                "subject": "S",
                "message": "M",
            })),
        },
        BatchRequest {
            method: Method::Get,
            endpoint: "bogus".into(),
            data: None,
        },
        BatchRequest {
            method: Method::Get,
            endpoint: "contacts".into(),
            data: None,
        },
    ]);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(results[1].error.as_deref(), Some("Unknown endpoint: bogus"));
    assert_eq!(
        results[2].data.as_ref().unwrap().extra("total"),
        Some(&json!(1))
    );
}

#[test]
fn search_across_collections() {
    let api = api();
    api.post("volunteers", Value::Object(volunteer("river@example.org")))
        .unwrap();
    api.post("projects", json!({ "title": "River restoration" }))
        .unwrap();

    let results = api
        .search(&SearchRequest {
            query: "river".into(),
            ..SearchRequest::default()
        })
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.contains_key("volunteers"));
    assert!(results.contains_key("projects"));

    let err = api
        .search(&SearchRequest {
            query: "x".into(),
            collections: vec!["nope".into()],
            ..SearchRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[test]
fn accounts_are_not_searchable() {
    let api = api();
    api.post(
        "auth/register",
        json!({ "name": "Owner", "email": "owner@example.org", "password": "rooted-deep" }),
    )
    .unwrap();
    api.post("auth/forgot-password", json!({ "email": "owner@example.org" }))
        .unwrap();

    let err = api
        .search(&SearchRequest {
            query: "owner@".into(),
            collections: vec!["users".into()],
            ..SearchRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
    assert_eq!(err.status_code(), 400);

    let everywhere = api
        .search(&SearchRequest {
            query: "owner@".into(),
            ..SearchRequest::default()
        })
        .unwrap();
    assert!(everywhere.is_empty());
    let encoded = serde_json::to_string(&everywhere).unwrap();
    assert!(!encoded.contains("password_hash"));
    assert!(!encoded.contains("reset_token"));
}
