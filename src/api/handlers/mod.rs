//! Route handlers, one module per first path segment.
//!
//! Each module follows the same convention:
//!
//! ```ignore
//! pub const RESOURCE: &str = "volunteers";
//!
//! pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
//!     match (ctx.method(), ctx.id(), ctx.action()) {
//!         (Method::Get, None, None) => list(ctx, ctx.foundation().volunteers(None)?),
//!         _ => Err(ctx.invalid()),
//!     }
//! }
//! ```

pub mod auth;
pub mod blog;
pub mod contacts;
pub mod donations;
pub mod events;
pub mod gallery;
pub mod newsletter;
pub mod projects;
pub mod settings;
pub mod statistics;
pub mod volunteers;

use super::context::Context;
use super::error::ApiError;
use super::response::Response;
use crate::domain::{EntityKind, Foundation};
use crate::record::Record;
use crate::repository::{paginate, sort_records, RepositoryError};
use crate::store::Store;

/// List envelope. With paging parameters the records are sorted and sliced
/// and `page`, `per_page` and `pagination` are added; `total` always counts
/// every matching record.
pub(crate) fn list<S>(ctx: &Context<'_, S>, records: Vec<Record>) -> Result<Response, ApiError> {
    let total = records.len();
    let Some(request) = ctx.page_request()? else {
        return Ok(Response::data(&records)?.with_extra("total", total));
    };

    let mut records = records;
    sort_records(&mut records, &request.sort_field, request.direction);
    let page = paginate(records, request.page, request.per_page);
    let pagination = serde_json::to_value(&page.pagination)?;
    Ok(Response::data(&page.data)?
        .with_extra("total", total)
        .with_extra("page", page.pagination.current_page)
        .with_extra("per_page", page.pagination.per_page)
        .with_extra("pagination", pagination))
}

/// Fetch one record by the id segment.
pub(crate) fn show<S: Store>(
    ctx: &Context<'_, S>,
    kind: EntityKind,
    id: &str,
) -> Result<Response, ApiError> {
    let record = ctx.foundation().get_entity(kind, id)?;
    Response::data(&record)
}

/// Apply the body as a patch through the generic, transition-checked update.
pub(crate) fn update<S: Store>(
    ctx: &Context<'_, S>,
    kind: EntityKind,
    id: &str,
) -> Result<Response, ApiError> {
    let patch = ctx.fields()?;
    let record = ctx.foundation().update_entity(kind, id, &patch)?;
    Response::data(&record)
}

/// Delete by id. A missing record is a repository `NotFound`.
pub(crate) fn remove<S: Store>(
    foundation: &Foundation<S>,
    kind: EntityKind,
    id: &str,
    message: &str,
) -> Result<Response, ApiError> {
    if !foundation.delete_entity(kind, id)? {
        return Err(RepositoryError::not_found(kind.collection(), id).into());
    }
    Ok(Response::message(message))
}
