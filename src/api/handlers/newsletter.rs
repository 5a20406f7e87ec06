use serde::Deserialize;

use super::list;
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::record::Fields;
use crate::store::Store;

pub const RESOURCE: &str = "newsletter";

#[derive(Deserialize)]
struct Subscription {
    email: String,
    #[serde(default)]
    preferences: Option<Fields>,
}

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => list(ctx, foundation.active_subscribers()?),
        (Method::Post, Some("subscribe"), None) => {
            let input: Subscription = ctx.input()?;
            Response::outcome(
                foundation.subscribe_newsletter(&input.email, input.preferences.as_ref())?,
            )
        }
        (Method::Post, Some("unsubscribe"), None) => {
            let input: Subscription = ctx.input()?;
            let outcome = foundation.unsubscribe_newsletter(&input.email)?;
            Ok(Response::message(outcome.message))
        }
        _ => Err(ctx.invalid()),
    }
}
