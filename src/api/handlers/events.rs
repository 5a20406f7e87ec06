use serde::Deserialize;

use super::{list, remove, show, update};
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::domain::EntityKind;
use crate::record::Fields;
use crate::store::Store;

pub const RESOURCE: &str = "events";

#[derive(Deserialize)]
struct Registration {
    action: String,
    #[serde(default)]
    attendee: Fields,
}

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => list(ctx, foundation.events(ctx.param("status"))?),
        (Method::Get, Some(id), None) => show(ctx, EntityKind::Event, id),
        (Method::Post, None, None) => Response::outcome(foundation.create_event(ctx.fields()?)?),
        (Method::Post, Some(id), None) => {
            let input: Registration = ctx.input()?;
            if input.action != "register" {
                return Err(ctx.invalid());
            }
            Response::outcome(foundation.register_for_event(id, input.attendee)?)
        }
        (Method::Put, Some(id), None) => update(ctx, EntityKind::Event, id),
        (Method::Delete, Some(id), None) => remove(
            foundation,
            EntityKind::Event,
            id,
            "Event deleted successfully",
        ),
        _ => Err(ctx.invalid()),
    }
}
