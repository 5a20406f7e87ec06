use serde::Deserialize;

use crate::api::context::Context;
use crate::api::error::ApiError;
use crate::api::response::Response;
use crate::api::service::Method;
use crate::store::Store;

pub const RESOURCE: &str = "auth";

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct ForgotPassword {
    email: String,
}

#[derive(Deserialize)]
struct ResetPassword {
    token: String,
    password: String,
}

pub fn handle<S: Store>(ctx: &Context<'_, S>) -> Result<Response, ApiError> {
    let auth = ctx.auth();
    match (ctx.method(), ctx.id(), ctx.action()) {
        (Method::Post, Some("login"), None) => {
            let input: Credentials = ctx.input()?;
            Response::outcome(auth.login(&input.email, &input.password)?)
        }
        (Method::Post, Some("register"), None) => Response::outcome(auth.register(ctx.fields()?)?),
        (Method::Post, Some("logout"), None) => Ok(Response::message(auth.logout().message)),
        (Method::Post, Some("forgot-password"), None) => {
            let input: ForgotPassword = ctx.input()?;
            let outcome = auth.request_password_reset(&input.email)?;
            Ok(Response::message(outcome.message))
        }
        (Method::Post, Some("reset-password"), None) => {
            let input: ResetPassword = ctx.input()?;
            let outcome = auth.reset_password(&input.token, &input.password)?;
            Ok(Response::message(outcome.message))
        }
        (Method::Get, Some("me"), None) => Response::data(&auth.current_user()?),
        _ => Err(ctx.invalid()),
    }
}
