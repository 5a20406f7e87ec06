use super::{list, remove, show};
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::domain::EntityKind;
use crate::store::Store;

pub const RESOURCE: &str = "projects";

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => list(ctx, foundation.projects(ctx.param("status"))?),
        (Method::Get, Some(id), None) => show(ctx, EntityKind::Project, id),
        (Method::Post, None, None) => Response::outcome(foundation.create_project(ctx.fields()?)?),
        (Method::Put, Some(id), None) => {
            Response::outcome(foundation.update_project(id, &ctx.fields()?)?)
        }
        (Method::Delete, Some(id), None) => remove(
            foundation,
            EntityKind::Project,
            id,
            "Project deleted successfully",
        ),
        _ => Err(ctx.invalid()),
    }
}
