//! Account registration, sign-in and password reset over the `users`
//! collection.
//!
//! The service keeps an explicit [`Session`] for the signed-in user rather
//! than any global state. Stored users carry a salted `password_hash`; it and
//! the reset token are stripped by [`sanitize`] before a user leaves the
//! service.

mod error;
mod password;
mod session;

use std::sync::{Arc, PoisonError, RwLock};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::domain::validation;
use crate::domain::Outcome;
use crate::record::{self, Fields, Record};
use crate::repository::collections::USERS;
use crate::repository::CollectionRepository;
use crate::store::Store;

pub use error::AuthError;
pub use password::{hash_password, password_strength, verify_password, DEFAULT_ITERATIONS};
pub use session::Session;

const PASSWORD_HASH: &str = "password_hash";
const RESET_TOKEN: &str = "reset_token";
const RESET_TOKEN_EXPIRY: &str = "reset_token_expiry";
const SECRET_FIELDS: [&str; 4] = [PASSWORD_HASH, RESET_TOKEN, RESET_TOKEN_EXPIRY, "password"];

/// A sanitized user plus the token issued for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: Record,
    pub token: String,
}

/// Copy of `user` without credentials or reset tokens.
pub fn sanitize(user: &Record) -> Record {
    let mut clean = user.clone();
    for field in SECRET_FIELDS {
        clean.remove(field);
    }
    clean
}

/// Opaque bearer token: base64 of `{userId, email, timestamp}`.
pub fn generate_token(user: &Record) -> String {
    let claims = json!({
        "userId": user.id(),
        "email": user.str_field("email"),
        "timestamp": Utc::now().timestamp_millis(),
    });
    STANDARD.encode(claims.to_string())
}

/// Decode a token produced by [`generate_token`].
pub fn decode_token(token: &str) -> Option<Value> {
    let bytes = STANDARD.decode(token).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn reset_token() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("reset_{}_{}", Utc::now().timestamp_millis(), suffix)
}

fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < password::MIN_LENGTH {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters",
            password::MIN_LENGTH
        )));
    }
    Ok(())
}

pub struct AuthService<S> {
    repo: Arc<CollectionRepository<S>>,
    session: RwLock<Session>,
    iterations: u32,
}

impl<S: Store> AuthService<S> {
    pub fn new(repo: Arc<CollectionRepository<S>>) -> Self {
        Self {
            repo,
            session: RwLock::new(Session::new()),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// PBKDF2 iteration count for newly hashed passwords.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    fn sign_in(&self, user: &Record) -> AuthPayload {
        let user = sanitize(user);
        let token = generate_token(&user);
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session::signed_in(user.clone(), token.clone());
        AuthPayload { user, token }
    }

    /// Create an account and sign it in.
    pub fn register(&self, fields: Fields) -> Result<Outcome<AuthPayload>, AuthError> {
        validation::require(&fields, &["name", "email", "password"])
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = validation::text(&fields, "email")
            .filter(|e| validation::is_valid_email(e))
            .ok_or_else(|| AuthError::Validation("Please enter a valid email address".into()))?
            .to_string();
        let password = validation::text(&fields, "password")
            .ok_or_else(|| AuthError::Validation("password is required".into()))?
            .to_string();
        check_password(&password)?;

        let mut fields = fields;
        for field in SECRET_FIELDS {
            fields.remove(field);
        }
        fields.insert(
            PASSWORD_HASH.into(),
            Value::String(hash_password(&password, self.iterations)),
        );
        fields.insert("is_active".into(), Value::Bool(true));
        fields.insert("last_login".into(), Value::Null);

        let user = self.repo.transact(USERS, |users| {
            if users.iter().any(|u| u.str_field("email") == Some(email.as_str())) {
                return Err(AuthError::Duplicate(
                    "User already exists with this email".into(),
                ));
            }
            let user = Record::stamped(fields);
            users.push(user.clone());
            Ok(user)
        })?;

        info!(id = user.id(), "user registered");
        Ok(Outcome::new("Registration successful", self.sign_in(&user)))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Outcome<AuthPayload>, AuthError> {
        let user = self.repo.transact(USERS, |users| {
            let user = users
                .iter_mut()
                .find(|u| u.str_field("email") == Some(email))
                .ok_or_else(|| AuthError::NotFound("User not found".into()))?;
            let hash = user.str_field(PASSWORD_HASH).unwrap_or_default();
            if !verify_password(password, hash) {
                warn!(id = user.id(), "login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            user.set("last_login", record::timestamp());
            Ok(user.clone())
        })?;

        info!(id = user.id(), "user signed in");
        Ok(Outcome::new("Login successful", self.sign_in(&user)))
    }

    pub fn logout(&self) -> Outcome<()> {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Outcome::new("Logout successful", ())
    }

    /// The signed-in user, sanitized.
    pub fn current_user(&self) -> Result<Record, AuthError> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)
    }

    pub fn session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Issue a reset token valid for one hour. The token is returned so the
    /// caller can deliver it; it is never part of a sanitized user.
    pub fn request_password_reset(&self, email: &str) -> Result<Outcome<String>, AuthError> {
        let token = reset_token();
        let expiry = record::format_timestamp(Utc::now() + Duration::hours(1));

        self.repo.transact(USERS, |users| {
            let user = users
                .iter_mut()
                .find(|u| u.str_field("email") == Some(email))
                .ok_or_else(|| {
                    AuthError::NotFound("No account found with this email address".into())
                })?;
            user.set(RESET_TOKEN, token.clone());
            user.set(RESET_TOKEN_EXPIRY, expiry);
            Ok::<_, AuthError>(())
        })?;

        Ok(Outcome::new("Password reset link sent to your email", token))
    }

    /// Consume a reset token and store the new password.
    pub fn reset_password(&self, token: &str, new_password: &str) -> Result<Outcome<()>, AuthError> {
        check_password(new_password)?;
        let hash = hash_password(new_password, self.iterations);
        let now = Utc::now();

        let id = self.repo.transact(USERS, |users| {
            let user = users
                .iter_mut()
                .find(|u| !token.is_empty() && u.str_field(RESET_TOKEN) == Some(token))
                .ok_or(AuthError::InvalidResetToken)?;
            let live = user
                .str_field(RESET_TOKEN_EXPIRY)
                .and_then(record::parse_timestamp)
                .map(|expiry| expiry > now)
                .unwrap_or(false);
            if !live {
                return Err(AuthError::InvalidResetToken);
            }
            user.remove(RESET_TOKEN);
            user.remove(RESET_TOKEN_EXPIRY);
            user.set(PASSWORD_HASH, hash);
            user.touch();
            Ok(user.id().to_string())
        })?;

        info!(id = %id, "password reset");
        Ok(Outcome::new("Password has been reset", ()))
    }
}
