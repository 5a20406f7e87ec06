use serde::Deserialize;

use super::{list, remove, show};
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::domain::EntityKind;
use crate::store::Store;

pub const RESOURCE: &str = "volunteers";

#[derive(Deserialize)]
struct StatusChange {
    status: String,
}

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => list(ctx, foundation.volunteers(ctx.param("status"))?),
        (Method::Get, Some(id), None) => show(ctx, EntityKind::Volunteer, id),
        (Method::Post, None, None) => {
            Response::outcome(foundation.register_volunteer(ctx.fields()?)?)
        }
        (Method::Put, Some(id), Some("status")) => {
            let input: StatusChange = ctx.input()?;
            Response::outcome(foundation.update_volunteer_status(id, &input.status)?)
        }
        (Method::Delete, Some(id), None) => remove(
            foundation,
            EntityKind::Volunteer,
            id,
            "Volunteer deleted successfully",
        ),
        _ => Err(ctx.invalid()),
    }
}
