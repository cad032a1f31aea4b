//! Send-alert routes: roster table, selection, compose modal and dispatch.

use alert_desk::{DispatchError, Edit, LoadOutcome, Notification};
use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use disaster_api::RecipientId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::state::{AppState, Console};

/// The console page.
pub const PAGE: &str = "/admin/send-alert";

/// Send-alert page template.
#[derive(Template)]
#[template(path = "send_alert.html")]
pub struct SendAlertTemplate {
    pub rows: Vec<RowView>,
    pub all_selected: bool,
    pub select_all_label: &'static str,
    pub loading: bool,
    pub sending: bool,
    pub can_compose: bool,
    pub selected_count: usize,
    pub modal_open: bool,
    pub subject: String,
    pub body_markup: String,
    pub preview_html: String,
    pub toasts: Vec<Notification>,
}

/// One roster row.
#[derive(Clone, Serialize)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub selected: bool,
}

/// JSON view of the console.
#[derive(Serialize)]
pub struct ConsoleSnapshot {
    pub authenticated: bool,
    pub rows: Vec<RowView>,
    pub selected: Vec<String>,
    pub all_selected: bool,
    pub loading: bool,
    pub sending: bool,
    pub modal_open: bool,
    pub subject: String,
    pub html_content: String,
}

/// Editor contents posted from the modal.
#[derive(Deserialize)]
pub struct ComposeForm {
    pub subject: String,
    pub body: String,
}

fn rows(console: &Console) -> Vec<RowView> {
    console
        .store
        .roster()
        .iter()
        .map(|r| RowView {
            id: r.id.to_string(),
            name: r.name.clone(),
            email: r.email.clone(),
            selected: console.store.is_selected(&r.id),
        })
        .collect()
}

/// Render the page from current state, draining pending toasts.
fn render(console: &mut Console, sending: bool) -> SendAlertTemplate {
    let all_selected = console.store.all_selected();
    let selected_count = console.store.selection().len();
    let preview_html = console.composer.serialize();

    SendAlertTemplate {
        rows: rows(console),
        all_selected,
        select_all_label: if all_selected { "Deselect All" } else { "Select All" },
        loading: console.store.loading(),
        sending,
        can_compose: selected_count > 0,
        selected_count,
        modal_open: console.modal_open,
        subject: console.composer.subject().to_string(),
        body_markup: preview_html.clone(),
        preview_html,
        toasts: std::mem::take(&mut console.toasts),
    }
}

/// Redirect to login unless the session is authenticated.
async fn require_session(state: &AppState) -> Option<Response> {
    if state.console.lock().await.session.is_authenticated {
        None
    } else {
        Some(Redirect::to("/login").into_response())
    }
}

/// Mount the page: fetch the roster, then render.
pub async fn send_alert_page(State(state): State<AppState>) -> Response {
    if let Some(redirect) = require_session(&state).await {
        return redirect;
    }

    let ticket = state.console.lock().await.store.begin_load();
    let result = state.api.list_users().await;

    let mut console = state.console.lock().await;
    match console.store.finish_load(ticket, result) {
        LoadOutcome::Failed(notification) => console.toasts.push(notification),
        LoadOutcome::Loaded { count } => debug!(count, "Roster refreshed"),
        LoadOutcome::Stale => {}
    }
    render(&mut console, state.dispatcher.is_sending()).into_response()
}

/// Back to the page after an action.
fn back() -> Response {
    Redirect::to(PAGE).into_response()
}

/// Toggle one row.
pub async fn toggle(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Some(redirect) = require_session(&state).await {
        return redirect;
    }

    let mut console = state.console.lock().await;
    if !console.store.toggle(&RecipientId::new(id.as_str())) {
        debug!(id = %id, "Ignoring toggle for unknown recipient");
    }
    back()
}

/// Toggle every row.
pub async fn toggle_all(State(state): State<AppState>) -> Response {
    if let Some(redirect) = require_session(&state).await {
        return redirect;
    }

    state.console.lock().await.store.toggle_all();
    back()
}

/// Open the compose modal. Ignored while nothing is selected.
pub async fn open_compose(State(state): State<AppState>) -> Response {
    if let Some(redirect) = require_session(&state).await {
        return redirect;
    }

    let mut console = state.console.lock().await;
    let has_selection = !console.store.selection().is_empty();
    console.modal_open = has_selection;
    back()
}

/// Close the compose modal, keeping the draft.
pub async fn close_compose(State(state): State<AppState>) -> Response {
    if let Some(redirect) = require_session(&state).await {
        return redirect;
    }

    state.console.lock().await.modal_open = false;
    back()
}

/// Apply editor contents to the draft.
///
/// Malformed markup is reported as a toast and the draft stays as it was.
fn apply_form(console: &mut Console, form: ComposeForm) -> bool {
    console.composer.set_subject(form.subject);
    match console.composer.edit(Edit::ReplaceMarkup(form.body)) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Rejected alert body edit");
            console
                .toasts
                .push(Notification::error(format!("Invalid alert body: {}", err)));
            false
        }
    }
}

/// Live edit from the modal editor.
pub async fn edit_compose(State(state): State<AppState>, Form(form): Form<ComposeForm>) -> Response {
    if let Some(redirect) = require_session(&state).await {
        return redirect;
    }

    let mut console = state.console.lock().await;
    apply_form(&mut console, form);
    render(&mut console, state.dispatcher.is_sending()).into_response()
}

/// Send the alert to the selected recipients.
pub async fn send(State(state): State<AppState>, Form(form): Form<ComposeForm>) -> Response {
    if let Some(redirect) = require_session(&state).await {
        return redirect;
    }

    let prepared = {
        let mut console = state.console.lock().await;
        if state.dispatcher.is_sending() {
            info!("Send already in progress; keeping draft");
            return render(&mut console, true).into_response();
        }
        if !apply_form(&mut console, form) {
            return render(&mut console, state.dispatcher.is_sending()).into_response();
        }

        match state
            .dispatcher
            .prepare(&console.store, console.composer.draft())
        {
            Ok(prepared) => prepared,
            Err(err) => {
                // Trigger is disabled in these states; nothing to send.
                match err {
                    DispatchError::EmptySelection => console.modal_open = false,
                    DispatchError::InFlight => {}
                }
                info!(reason = %err, "Send not started");
                return render(&mut console, state.dispatcher.is_sending()).into_response();
            }
        }
    };

    let outcome = prepared.dispatch(state.api.as_ref()).await;

    let mut console = state.console.lock().await;
    if outcome.close_modal {
        console.modal_open = false;
    }
    console.toasts.push(outcome.notification);
    render(&mut console, state.dispatcher.is_sending()).into_response()
}

/// Console state as JSON.
pub async fn console_api(State(state): State<AppState>) -> Json<ConsoleSnapshot> {
    let console = state.console.lock().await;
    Json(ConsoleSnapshot {
        authenticated: console.session.is_authenticated,
        rows: rows(&console),
        selected: console
            .store
            .selection()
            .ids()
            .map(|id| id.to_string())
            .collect(),
        all_selected: console.store.all_selected(),
        loading: console.store.loading(),
        sending: state.dispatcher.is_sending(),
        modal_open: console.modal_open,
        subject: console.composer.subject().to_string(),
        html_content: console.composer.serialize(),
    })
}
