use foundation_backend::domain::{metric, progress_percentage, DonationPeriod};
use foundation_backend::{DomainError, EntityKind, Report, RepositoryError};
use serde_json::json;

use crate::support::{fields, foundation, volunteer};

#[test]
fn duplicate_volunteer_rejected_and_collection_unchanged() {
    let foundation = foundation();
    foundation
        .register_volunteer(volunteer("meera@example.org"))
        .unwrap();
    let before = foundation.volunteers(None).unwrap().len();

    let err = foundation
        .register_volunteer(volunteer("meera@example.org"))
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
    assert_eq!(foundation.volunteers(None).unwrap().len(), before);
}

#[test]
fn failed_form_reports_message_without_writing() {
    let foundation = foundation();
    let mut input = volunteer("meera@example.org");
    input.remove("age");

    let report: Report = foundation.register_volunteer(input).into();
    assert!(!report.success);
    assert_eq!(report.message, "age is required");
    assert!(foundation.volunteers(None).unwrap().is_empty());
}

#[test]
fn volunteer_status_follows_transition_table() {
    let foundation = foundation();
    let id = foundation
        .register_volunteer(volunteer("meera@example.org"))
        .unwrap()
        .data
        .id()
        .to_string();

    let active = foundation.update_volunteer_status(&id, "active").unwrap();
    assert_eq!(active.data.str_field("status"), Some("active"));
    assert_eq!(foundation.volunteers(Some("active")).unwrap().len(), 1);

    let err = foundation.update_volunteer_status(&id, "pending").unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let err = foundation.update_volunteer_status(&id, "retired").unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = foundation
        .update_volunteer_status("missing", "active")
        .unwrap_err();
    assert!(matches!(err, DomainError::Repository(RepositoryError::NotFound { .. })));
}

#[test]
fn unsubscribe_twice_is_idempotent() {
    let foundation = foundation();
    foundation.subscribe_newsletter("a@b.com", None).unwrap();

    let first = foundation.unsubscribe_newsletter("a@b.com").unwrap();
    let second = foundation.unsubscribe_newsletter("a@b.com").unwrap();
    assert_eq!(first.data.str_field("status"), Some("unsubscribed"));
    assert_eq!(second.data.str_field("status"), Some("unsubscribed"));
    assert!(foundation.active_subscribers().unwrap().is_empty());
}

#[test]
fn resubscribe_reuses_record() {
    let foundation = foundation();
    let created = foundation.subscribe_newsletter("a@b.com", None).unwrap();
    assert_eq!(created.data.str_field("status"), Some("active"));
    let id = created.data.id().to_string();

    foundation.unsubscribe_newsletter("a@b.com").unwrap();
    let prefs = fields(json!({ "frequency": "monthly" }));
    let again = foundation
        .subscribe_newsletter("a@b.com", Some(&prefs))
        .unwrap();

    assert_eq!(again.data.id(), id);
    assert_eq!(again.data.str_field("status"), Some("active"));
    assert_eq!(again.data.get("preferences").unwrap()["frequency"], "monthly");
    assert_eq!(
        foundation
            .repo()
            .read_all("newsletter_subscribers")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn already_active_subscriber_is_untouched() {
    let foundation = foundation();
    let created = foundation.subscribe_newsletter("a@b.com", None).unwrap();
    let again = foundation.subscribe_newsletter("a@b.com", None).unwrap();
    assert_eq!(again.message, "You are already subscribed to our newsletter");
    assert_eq!(again.data, created.data);

    let stats = foundation.statistics().unwrap();
    assert_eq!(stats[metric::NEWSLETTER_SUBSCRIBERS], json!(12001));
}

#[test]
fn invalid_newsletter_email() {
    let foundation = foundation();
    let report: Report = foundation.subscribe_newsletter("not an email", None).into();
    assert!(!report.success);
    assert_eq!(report.message, "Please enter a valid email address");
}

#[test]
fn event_capacity_invariant() {
    let foundation = foundation();
    let event = foundation
        .create_event(fields(json!({ "title": "Seed swap", "max_attendees": 3 })))
        .unwrap()
        .data;

    for n in 0..3 {
        foundation
            .register_for_event(event.id(), fields(json!({ "name": format!("guest {n}") })))
            .unwrap();
    }
    let err = foundation
        .register_for_event(event.id(), fields(json!({ "name": "late" })))
        .unwrap_err();
    assert!(matches!(err, DomainError::Capacity(_)));

    let stored = foundation.get_entity(EntityKind::Event, event.id()).unwrap();
    assert_eq!(stored.get("attendees").unwrap().as_array().unwrap().len(), 3);
    assert_eq!(stored.get("registration_count"), Some(&json!(3)));
}

#[test]
fn concurrent_registrations_never_overbook() {
    let foundation = foundation();
    let event = foundation
        .create_event(fields(json!({ "title": "Workshop", "max_attendees": 5 })))
        .unwrap()
        .data;

    let handles: Vec<_> = (0..10)
        .map(|n| {
            let foundation = foundation.clone();
            let id = event.id().to_string();
            std::thread::spawn(move || {
                foundation
                    .register_for_event(&id, fields(json!({ "name": format!("p{n}") })))
                    .is_ok()
            })
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(accepted, 5);
    let stored = foundation.get_entity(EntityKind::Event, event.id()).unwrap();
    assert_eq!(stored.get("registration_count"), Some(&json!(5)));
}

#[test]
fn project_progress() {
    assert_eq!(progress_percentage(67500.0, 100000.0), 67.5);
    assert_eq!(progress_percentage(120000.0, 100000.0), 100.0);
    assert_eq!(progress_percentage(500.0, 0.0), 0.0);

    let foundation = foundation();
    let project = foundation
        .create_project(fields(json!({ "title": "Mangroves", "goal_amount": 100000 })))
        .unwrap()
        .data;
    let updated = foundation
        .update_project(project.id(), &fields(json!({ "raised_amount": 67500 })))
        .unwrap();
    assert_eq!(updated.data.number_field("progress_percentage"), Some(67.5));

    let updated = foundation
        .update_project(project.id(), &fields(json!({ "raised_amount": 120000 })))
        .unwrap();
    assert_eq!(updated.data.number_field("progress_percentage"), Some(100.0));
}

#[test]
fn donation_rules() {
    let foundation = foundation();
    let donation = fields(json!({
        "name": "Ravi",
        "email": "ravi@example.org",
        "amount": "1500",
        "donationType": "one-time",
    }));
    let outcome = foundation.process_donation(donation.clone()).unwrap();
    assert_eq!(outcome.data.number_field("amount"), Some(1500.0));
    assert_eq!(outcome.data.str_field("status"), Some("completed"));
    assert!(outcome
        .data
        .str_field("transaction_id")
        .unwrap()
        .starts_with("TXN_"));

    for bad in [json!(0), json!(-10), json!("lots")] {
        let mut input = donation.clone();
        input.insert("amount".into(), bad);
        let err = foundation.process_donation(input).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
    assert_eq!(foundation.donations(None).unwrap().len(), 1);
    assert_eq!(
        foundation
            .donations(Some(DonationPeriod::Today))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn blog_views_and_listing() {
    let foundation = foundation();
    let draft = foundation
        .create_blog_post(fields(json!({ "title": "Draft", "category": "news" })))
        .unwrap()
        .data;
    let published = foundation
        .create_blog_post(fields(json!({
            "title": "Live",
            "category": "news",
            "status": "published",
        })))
        .unwrap()
        .data;

    let listed = foundation.published_posts(Some("news")).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), published.id());
    assert!(draft.get("published_at").unwrap().is_null());

    foundation.view_blog_post(published.id()).unwrap();
    let viewed = foundation.view_blog_post(published.id()).unwrap();
    assert_eq!(viewed.number_field("views"), Some(2.0));
}

#[test]
fn analytics_counts() {
    let foundation = foundation();
    foundation
        .register_volunteer(volunteer("one@example.org"))
        .unwrap();
    foundation
        .submit_contact(fields(json!({
            "name": "N",
            "email": "n@example.org",
            "subject": "Hi",
            "message": "Hello",
        })))
        .unwrap();
    foundation.subscribe_newsletter("s@example.org", None).unwrap();

    let analytics = foundation.analytics().unwrap();
    assert_eq!(analytics.volunteers.total, 1);
    assert_eq!(analytics.volunteers.pending, 1);
    assert_eq!(analytics.contacts.pending, 1);
    assert_eq!(analytics.newsletter.subscribers, 1);
}

#[test]
fn seed_fills_only_empty_collections() {
    let foundation = foundation();
    foundation
        .create_project(fields(json!({ "title": "Mine" })))
        .unwrap();

    let seeded = foundation.seed_sample_data().unwrap().data;
    assert!(!seeded.contains(&"projects".to_string()));
    assert!(seeded.contains(&"events".to_string()));
    assert_eq!(foundation.projects(None).unwrap().len(), 1);

    let again = foundation.seed_sample_data().unwrap().data;
    assert!(again.is_empty());
}
