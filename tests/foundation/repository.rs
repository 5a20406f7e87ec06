use foundation_backend::repository::collections::{PROJECTS, VOLUNTEERS};
use foundation_backend::repository::{PageRequest, SortDirection};
use foundation_backend::{RepositoryError, Store};
use serde_json::json;

use crate::support::{fields, repo, NAMESPACE};

#[test]
fn create_then_read_returns_input_plus_generated_fields() {
    let repo = repo();
    let input = fields(json!({ "title": "River cleanup", "goal_amount": 5000, "tags": ["water"] }));
    let created = repo.create(PROJECTS, input.clone()).unwrap();

    let read = repo.read(PROJECTS, created.id()).unwrap().unwrap();
    assert_eq!(read, created);
    for (key, value) in &input {
        assert_eq!(read.get(key), Some(value));
    }
    assert!(!read.id().is_empty());
    assert!(read.created_at().is_some());
    assert_eq!(read.created_at(), read.updated_at());
}

#[test]
fn ids_are_unique() {
    let repo = repo();
    let mut ids = std::collections::HashSet::new();
    for n in 0..200 {
        let record = repo.create(PROJECTS, fields(json!({ "n": n }))).unwrap();
        assert!(ids.insert(record.id().to_string()));
    }
}

#[test]
fn collections_are_stored_under_namespaced_keys() {
    let repo = repo();
    repo.create(VOLUNTEERS, fields(json!({ "email": "x@y.org" })))
        .unwrap();
    let raw = repo
        .store()
        .get(&format!("{NAMESPACE}{VOLUNTEERS}"))
        .unwrap()
        .unwrap();
    assert_eq!(raw.as_array().map(Vec::len), Some(1));
}

#[test]
fn update_missing_is_not_found() {
    let repo = repo();
    let err = repo
        .update(PROJECTS, "missing", &fields(json!({ "title": "x" })))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
    assert!(repo.read_all(PROJECTS).unwrap().is_empty());
}

#[test]
fn update_merges_and_keeps_identity() {
    let repo = repo();
    let created = repo
        .create(PROJECTS, fields(json!({ "title": "Old", "status": "planning" })))
        .unwrap();
    let updated = repo
        .update(
            PROJECTS,
            created.id(),
            &fields(json!({ "title": "New", "id": "hijack", "created_at": "1970" })),
        )
        .unwrap();
    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.created_at(), created.created_at());
    assert_eq!(updated.str_field("title"), Some("New"));
    assert_eq!(updated.str_field("status"), Some("planning"));
}

#[test]
fn delete_reports_removal() {
    let repo = repo();
    let created = repo.create(PROJECTS, fields(json!({}))).unwrap();
    assert!(repo.delete(PROJECTS, created.id()).unwrap());
    assert!(!repo.delete(PROJECTS, created.id()).unwrap());
}

#[test]
fn search_is_case_insensitive_and_field_scoped() {
    let repo = repo();
    repo.create(PROJECTS, fields(json!({ "title": "Green Schools", "city": "Pune" })))
        .unwrap();
    repo.create(PROJECTS, fields(json!({ "title": "Water", "city": "GREENWOOD" })))
        .unwrap();

    assert_eq!(repo.search(PROJECTS, "green", &[]).unwrap().len(), 2);
    let scoped = repo.search(PROJECTS, "green", &["title"]).unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].str_field("city"), Some("Pune"));
}

#[test]
fn paginate_middle_page() {
    let repo = repo();
    for n in 0..25 {
        repo.create(PROJECTS, fields(json!({ "rank": n }))).unwrap();
    }

    let request = PageRequest::new(2, 10).sorted_by("rank", SortDirection::Asc);
    let page = repo.paginate(PROJECTS, &request).unwrap();
    assert_eq!(page.data.len(), 10);
    assert_eq!(page.data[0].get("rank"), Some(&json!(10)));
    assert!(page.pagination.has_next);
    assert!(page.pagination.has_prev);
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(page.pagination.total, 25);

    let last = repo
        .paginate(PROJECTS, &PageRequest::new(3, 10).sorted_by("rank", SortDirection::Asc))
        .unwrap();
    assert_eq!(last.data.len(), 5);
    assert!(!last.pagination.has_next);
}

#[test]
fn sort_numbers_and_strings() {
    let repo = repo();
    for (name, amount) in [("b", 20), ("a", 100), ("c", 3)] {
        repo.create(PROJECTS, fields(json!({ "name": name, "amount": amount })))
            .unwrap();
    }

    let by_amount = repo.sort(PROJECTS, "amount", SortDirection::Desc).unwrap();
    let amounts: Vec<_> = by_amount.iter().filter_map(|r| r.number_field("amount")).collect();
    assert_eq!(amounts, vec![100.0, 20.0, 3.0]);

    let by_name = repo.sort(PROJECTS, "name", SortDirection::Asc).unwrap();
    let names: Vec<_> = by_name.iter().filter_map(|r| r.str_field("name")).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn concurrent_creates_are_not_lost() {
    let repo = repo();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let repo = repo.clone();
            std::thread::spawn(move || {
                for n in 0..25 {
                    repo.create(VOLUNTEERS, fields(json!({ "t": t, "n": n })))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(repo.read_all(VOLUNTEERS).unwrap().len(), 200);
}
