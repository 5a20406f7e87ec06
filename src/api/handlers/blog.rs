use super::{list, remove, update};
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::domain::EntityKind;
use crate::store::Store;

pub const RESOURCE: &str = "blog";

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => {
            list(ctx, foundation.published_posts(ctx.param("category"))?)
        }
        // Reading a post counts as a view.
        (Method::Get, Some(id), None) => Response::data(&foundation.view_blog_post(id)?),
        (Method::Post, None, None) => {
            Response::outcome(foundation.create_blog_post(ctx.fields()?)?)
        }
        (Method::Put, Some(id), None) => update(ctx, EntityKind::BlogPost, id),
        (Method::Delete, Some(id), None) => remove(
            foundation,
            EntityKind::BlogPost,
            id,
            "Blog post deleted successfully",
        ),
        _ => Err(ctx.invalid()),
    }
}
