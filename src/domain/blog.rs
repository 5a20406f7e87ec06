use serde_json::Value;
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::status::EntityKind;
use super::validation;
use super::Foundation;
use crate::record::{self, Fields, Record};
use crate::repository::collections::BLOG_POSTS;
use crate::repository::RepositoryError;
use crate::store::Store;

const PUBLISHED: &str = "published";

impl<S: Store> Foundation<S> {
    pub fn create_blog_post(&self, fields: Fields) -> Result<Outcome<Record>, DomainError> {
        let mut fields = fields;
        if !validation::is_present(fields.get("status")) {
            fields.insert("status".into(), Value::String("draft".into()));
        }
        let status = fields
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::validation("status must be a string"))?;
        EntityKind::BlogPost.check_transition(None, status)?;

        let published_at = if status == PUBLISHED {
            Value::String(record::timestamp())
        } else {
            Value::Null
        };
        fields.insert("published_at".into(), published_at);
        fields.insert("views".into(), Value::from(0));
        fields.insert("likes".into(), Value::from(0));
        fields.insert("comments".into(), Value::Array(Vec::new()));

        let post = self.repo().create(BLOG_POSTS, fields)?;
        info!(id = post.id(), "blog post created");
        Ok(Outcome::new("Blog post created successfully", post))
    }

    /// Posts matching `category` (any when `None`) and `status`.
    ///
    /// Callers that want the public listing pass `Some("published")`.
    pub fn blog_posts(
        &self,
        category: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Record>, DomainError> {
        Ok(self.repo().filter(BLOG_POSTS, |post| {
            let status_ok = status.map_or(true, |s| post.str_field("status") == Some(s));
            let category_ok = category.map_or(true, |c| post.str_field("category") == Some(c));
            status_ok && category_ok
        })?)
    }

    /// Published posts, optionally in one category.
    pub fn published_posts(&self, category: Option<&str>) -> Result<Vec<Record>, DomainError> {
        self.blog_posts(category, Some(PUBLISHED))
    }

    /// Fetch a post and count the view.
    pub fn view_blog_post(&self, id: &str) -> Result<Record, DomainError> {
        self.repo().transact(BLOG_POSTS, |records| {
            let post = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| RepositoryError::not_found(BLOG_POSTS, id))?;
            let views = post.number_field("views").unwrap_or(0.0) + 1.0;
            post.set("views", record::number_value(views));
            Ok(post.clone())
        })
    }
}
