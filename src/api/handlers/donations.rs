use super::{list, show};
use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::domain::{total_amount, DonationPeriod, EntityKind};
use crate::store::Store;

pub const RESOURCE: &str = "donations";

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => {
            let period = ctx
                .param("period")
                .map(str::parse::<DonationPeriod>)
                .transpose()?;
            let donations = foundation.donations(period)?;
            let amount = total_amount(&donations);
            Ok(list(ctx, donations)?.with_extra("total_amount", amount))
        }
        (Method::Get, Some(id), None) => show(ctx, EntityKind::Donation, id),
        (Method::Post, None, None) => {
            Response::outcome(foundation.process_donation(ctx.fields()?)?)
        }
        _ => Err(ctx.invalid()),
    }
}
