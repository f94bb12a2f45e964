//! Server-rendered users page and its form endpoints.
//!
//! Every request fetches the list through the `get_users` action, so the page
//! never serves stale data. Form posts drive a console task for the duration
//! of the request: success redirects back to `/`, failure re-renders the page
//! with the error banner and the submitted values.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::{error, warn};

use crate::domain::Error;
use crate::domain::ports::{ActionOutcome, USERS_PAGE_PATH, UserRecord};
use crate::inbound::console::{
    ConsoleClosed, ConsoleEvent, ConsoleState, render_console, render_load_error, spawn_console,
};

use super::ApiResult;
use super::state::HttpState;

/// Name and email submitted by the user form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(body)
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

fn console_closed(err: ConsoleClosed) -> Error {
    error!(error = %err, "console stopped before settling");
    Error::internal(err.to_string())
}

/// Users for a form re-render; a failed fetch degrades to an empty list.
async fn current_users(state: &HttpState) -> Vec<UserRecord> {
    match state.actions.get_users().await {
        ActionOutcome::Succeeded(users) => users,
        ActionOutcome::Failed { error } => {
            warn!(%error, "could not load users for the form page");
            Vec::new()
        }
    }
}

/// Run `events` through a fresh console and answer with the settled result.
async fn submit(state: &HttpState, events: Vec<ConsoleEvent>) -> ApiResult<HttpResponse> {
    let users = current_users(state).await;
    let console = spawn_console(
        users,
        Arc::clone(&state.actions),
        state.invalidations.subscribe(USERS_PAGE_PATH),
    );
    for event in events {
        console.send(event).await.map_err(console_closed)?;
    }
    let settled = console.settled().await.map_err(console_closed)?;
    if settled.error().is_some() {
        return Ok(html(render_console(&settled)));
    }
    Ok(see_other(USERS_PAGE_PATH))
}

fn fill(form: UserForm) -> [ConsoleEvent; 3] {
    [
        ConsoleEvent::NameChanged(form.name),
        ConsoleEvent::EmailChanged(form.email),
        ConsoleEvent::Submit,
    ]
}

/// Render the user list with an empty create form.
#[get("/")]
pub async fn users_page(state: web::Data<HttpState>) -> HttpResponse {
    match state.actions.get_users().await {
        ActionOutcome::Succeeded(users) => html(render_console(&ConsoleState::new(users))),
        ActionOutcome::Failed { error } => html(render_load_error(&error)),
    }
}

/// Render the page with the form bound to an existing user.
///
/// Unknown ids redirect back to the list.
#[get("/users/{id}/edit")]
pub async fn edit_user_page(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    let users = match state.actions.get_users().await {
        ActionOutcome::Succeeded(users) => users,
        ActionOutcome::Failed { error } => return html(render_load_error(&error)),
    };
    let Some(user) = users.iter().find(|user| user.id == id).cloned() else {
        return see_other(USERS_PAGE_PATH);
    };
    let mut console = ConsoleState::new(users);
    console.apply(ConsoleEvent::EditRequested(user));
    html(render_console(&console))
}

#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    form: web::Form<UserForm>,
) -> ApiResult<HttpResponse> {
    submit(&state, fill(form.into_inner()).into()).await
}

#[post("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: web::Form<UserForm>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let form = form.into_inner();
    // Only the id of the edit target matters; the submitted values replace
    // the stored ones.
    let target = UserRecord {
        id,
        name: form.name.clone(),
        email: form.email.clone(),
        created_at: None,
        updated_at: None,
    };
    let mut events = vec![ConsoleEvent::EditRequested(target)];
    events.extend(fill(form));
    submit(&state, events).await
}

#[post("/users/{id}/delete")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    submit(&state, vec![ConsoleEvent::DeleteRequested(path.into_inner())]).await
}

/// Register the page routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users_page)
        .service(edit_user_page)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}
