//! Auth route handlers.
//!
//! The commerce API owns credentials; these handlers exchange them for a
//! bearer token and keep it in the session. Logout flushes the session,
//! which also drops the membership mirror and order view state.

use axum::extract::{Json, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::FieldError;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_current_shopper, set_current_shopper};
use crate::models::CurrentShopper;
use crate::state::AppState;

use super::Notify;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn require_fields(fields: &[(&'static str, &str)]) -> Vec<FieldError> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldError {
            field,
            message: format!("{field} is required"),
        })
        .collect()
}

/// Log in and store the bearer token in the session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> axum::Json<Notify<CurrentShopper>> {
    let errors = require_fields(&[("email", &form.email), ("password", &form.password)]);
    if !errors.is_empty() {
        return Notify::invalid("Please fill in all fields.", errors);
    }

    match state
        .commerce()
        .auth_login(form.email.trim(), &form.password)
        .await
    {
        Ok(ok) => {
            let shopper = CurrentShopper {
                id: ok.data.user.id.clone(),
                name: ok.data.user.name.clone(),
                email: ok.data.user.email.clone(),
            };

            if let Err(e) = set_current_shopper(&session, &shopper, &ok.data.token).await {
                tracing::error!("Failed to store login in session: {e}");
                return Notify::fail("Could not start your session. Please try again.");
            }

            set_sentry_user(&shopper.id, Some(&shopper.email));
            let message = ok.notification("Welcome back!");
            Notify::ok(message, shopper)
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Register a new account; a success logs the shopper straight in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> axum::Json<Notify<CurrentShopper>> {
    let errors = require_fields(&[
        ("name", &form.name),
        ("email", &form.email),
        ("password", &form.password),
    ]);
    if !errors.is_empty() {
        return Notify::invalid("Please fill in all fields.", errors);
    }

    match state
        .commerce()
        .auth_register(form.name.trim(), form.email.trim(), &form.password)
        .await
    {
        Ok(ok) => {
            let shopper = CurrentShopper {
                id: ok.data.user.id.clone(),
                name: ok.data.user.name.clone(),
                email: ok.data.user.email.clone(),
            };

            if let Err(e) = set_current_shopper(&session, &shopper, &ok.data.token).await {
                tracing::error!("Failed to store registration in session: {e}");
                return Notify::fail("Could not start your session. Please try again.");
            }

            set_sentry_user(&shopper.id, Some(&shopper.email));
            let message = ok.notification("Account created.");
            Notify::ok(message, shopper)
        }
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            Notify::fail(e.notification())
        }
    }
}

/// Log out: flush the session and stop associating errors with the user.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> axum::Json<Notify<serde_json::Value>> {
    if let Err(e) = clear_current_shopper(&session).await {
        tracing::error!("Failed to clear session on logout: {e}");
    }
    clear_sentry_user();
    Notify::message("Signed out.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_reports_each_blank() {
        let errors = require_fields(&[("email", ""), ("password", "  "), ("name", "Asha")]);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }
}
