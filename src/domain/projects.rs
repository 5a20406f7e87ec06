use serde_json::Value;
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::status::EntityKind;
use super::validation;
use super::{status_matches, Foundation};
use crate::record::{self, Fields, Record};
use crate::repository::collections::PROJECTS;
use crate::repository::RepositoryError;
use crate::store::Store;

const RAISED: &str = "raised_amount";
const GOAL: &str = "goal_amount";
const PROGRESS: &str = "progress_percentage";

/// `min(100, 100 * raised / goal)`, and 0 when there is no positive goal.
pub fn progress_percentage(raised: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (raised * 100.0 / goal).min(100.0)
}

fn amount(fields: &Fields, field: &str) -> Result<f64, DomainError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(0.0),
        Some(value) => record::as_number(value)
            .ok_or_else(|| DomainError::Validation(format!("{} must be a number", field))),
    }
}

fn default_field(fields: &mut Fields, field: &str, value: Value) {
    if !validation::is_present(fields.get(field)) {
        fields.insert(field.to_string(), value);
    }
}

impl<S: Store> Foundation<S> {
    pub fn create_project(&self, fields: Fields) -> Result<Outcome<Record>, DomainError> {
        let mut fields = fields;
        default_field(&mut fields, "status", Value::String("planning".into()));
        if let Some(status) = fields.get("status").and_then(Value::as_str) {
            EntityKind::Project.check_transition(None, status)?;
        }

        let goal = amount(&fields, GOAL)?;
        let raised = amount(&fields, RAISED)?;
        fields.insert(GOAL.into(), record::number_value(goal));
        fields.insert(RAISED.into(), record::number_value(raised));
        fields.insert(
            PROGRESS.into(),
            record::number_value(progress_percentage(raised, goal)),
        );
        default_field(&mut fields, "start_date", Value::String(record::timestamp()));
        default_field(&mut fields, "volunteers_needed", Value::from(0));
        fields.insert("volunteers_registered".into(), Value::from(0));

        let project = self.repo().create(PROJECTS, fields)?;
        info!(id = project.id(), "project created");
        Ok(Outcome::new("Project created successfully", project))
    }

    /// Merge `patch` into a project, recomputing progress when either
    /// amount changes.
    pub fn update_project(&self, id: &str, patch: &Fields) -> Result<Outcome<Record>, DomainError> {
        let touches_amounts = patch.contains_key(RAISED) || patch.contains_key(GOAL);

        let project = self.repo().transact(PROJECTS, |records| {
            let project = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| RepositoryError::not_found(PROJECTS, id))?;

            if let Some(next) = patch.get("status") {
                let next = next
                    .as_str()
                    .ok_or_else(|| DomainError::validation("status must be a string"))?;
                EntityKind::Project.check_transition(project.str_field("status"), next)?;
            }

            let mut patch = patch.clone();
            if touches_amounts {
                let goal = match patch.get(GOAL) {
                    Some(_) => amount(&patch, GOAL)?,
                    None => project.number_field(GOAL).unwrap_or(0.0),
                };
                let raised = match patch.get(RAISED) {
                    Some(_) => amount(&patch, RAISED)?,
                    None => project.number_field(RAISED).unwrap_or(0.0),
                };
                patch.insert(
                    PROGRESS.into(),
                    record::number_value(progress_percentage(raised, goal)),
                );
            }

            project.merge(&patch);
            Ok::<_, DomainError>(project.clone())
        })?;

        info!(id, "project updated");
        Ok(Outcome::new("Project updated successfully", project))
    }

    pub fn projects(&self, status: Option<&str>) -> Result<Vec<Record>, DomainError> {
        Ok(self.repo().filter(PROJECTS, |r| status_matches(r, status))?)
    }
}
