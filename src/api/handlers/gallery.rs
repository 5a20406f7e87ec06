use super::{list, remove, show, update};
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::domain::EntityKind;
use crate::store::Store;

pub const RESOURCE: &str = "gallery";

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => {
            let category = ctx.param("category");
            let images = foundation
                .list_entities(EntityKind::GalleryImage)?
                .into_iter()
                .filter(|image| category.map_or(true, |c| image.str_field("category") == Some(c)))
                .collect();
            list(ctx, images)
        }
        (Method::Get, Some(id), None) => show(ctx, EntityKind::GalleryImage, id),
        (Method::Post, None, None) => {
            let outcome = foundation.create_entity(EntityKind::GalleryImage, ctx.fields()?)?;
            Ok(Response::data(&outcome.data)?.with_message("Image uploaded successfully"))
        }
        (Method::Put, Some(id), None) => update(ctx, EntityKind::GalleryImage, id),
        (Method::Delete, Some(id), None) => remove(
            foundation,
            EntityKind::GalleryImage,
            id,
            "Image deleted successfully",
        ),
        _ => Err(ctx.invalid()),
    }
}
