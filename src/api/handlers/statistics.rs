use serde::Deserialize;
use serde_json::Value;

use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::record;
use crate::repository::StatOp;
use crate::store::Store;

pub const RESOURCE: &str = "statistics";

#[derive(Deserialize)]
struct StatisticChange {
    value: Value,
    #[serde(default)]
    operation: Option<String>,
}

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let foundation = ctx.foundation();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Get, None, None) => {
            let mut data = foundation.statistics()?;
            let analytics = serde_json::to_value(foundation.analytics()?)?;
            data.insert("analytics".into(), analytics);
            Response::data(&data)
        }
        (Method::Get, Some("dashboard"), None) => Response::data(&foundation.dashboard()?),
        (Method::Put, Some(metric), None) => {
            let input: StatisticChange = ctx.input()?;
            let value = record::as_number(&input.value)
                .ok_or_else(|| ApiError::BadRequest("value must be a number".into()))?;
            let op = match input.operation.as_deref() {
                Some(op) => op.parse::<StatOp>().map_err(ApiError::BadRequest)?,
                None => StatOp::Set,
            };
            Response::outcome(foundation.update_statistic(metric, value, op)?)
        }
        _ => Err(ctx.invalid()),
    }
}
