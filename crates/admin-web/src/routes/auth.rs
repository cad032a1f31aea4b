//! Login and logout.

use alert_desk::notification::LOGIN_FAILED;
use alert_desk::SessionContext;
use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use disaster_api::LoginRequest;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::routes::alert::PAGE;
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
}

/// Credentials posted from the login form.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Render the login page, or go straight to the console if logged in.
pub async fn login_page(State(state): State<AppState>) -> Response {
    if state.console.lock().await.session.is_authenticated {
        return Redirect::to(PAGE).into_response();
    }
    LoginTemplate {
        error: None,
        email: String::new(),
    }
    .into_response()
}

/// Authenticate against the backend.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let request = LoginRequest::new(form.email.as_str(), form.password);

    match state.api.login(&request).await {
        Ok(()) => {
            info!(email = %form.email, "Administrator logged in");
            state.console.lock().await.session = SessionContext::authenticated();
            Redirect::to(PAGE).into_response()
        }
        Err(err) => {
            warn!(email = %form.email, error = %err, "Login failed");
            LoginTemplate {
                error: Some(LOGIN_FAILED.to_string()),
                email: form.email,
            }
            .into_response()
        }
    }
}

/// End the session and discard console state.
pub async fn logout(State(state): State<AppState>) -> Result<Redirect> {
    let mut console = state.console.lock().await;
    console.session = SessionContext::anonymous();
    console.reset()?;
    info!("Administrator logged out");
    Ok(Redirect::to("/login"))
}
