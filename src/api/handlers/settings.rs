use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::store::Store;

pub const RESOURCE: &str = "settings";

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id()) {
        (Method::Get, None) => Response::data(&foundation.site_settings()?),
        (Method::Put, None) => {
            Response::outcome(foundation.update_site_settings(&ctx.fields()?)?)
        }
        _ => Err(ctx.invalid()),
    }
}
