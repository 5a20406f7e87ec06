use super::{list, remove, show, update};
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::domain::EntityKind;
use crate::store::Store;

pub const RESOURCE: &str = "contacts";

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => list(ctx, foundation.contacts(ctx.param("status"))?),
        (Method::Get, Some(id), None) => show(ctx, EntityKind::Contact, id),
        (Method::Post, None, None) => Response::outcome(foundation.submit_contact(ctx.fields()?)?),
        (Method::Put, Some(id), None) => update(ctx, EntityKind::Contact, id),
        (Method::Delete, Some(id), None) => remove(
            foundation,
            EntityKind::Contact,
            id,
            "Contact deleted successfully",
        ),
        _ => Err(ctx.invalid()),
    }
}
