//! HTML rendering of a [`ConsoleState`].
//!
//! The markup is plain forms so the page works without scripts: the form
//! posts to `/users` or `/users/{id}`, each row carries an edit link and a
//! delete form. Every interpolated value passes through [`escape`].

use super::state::ConsoleState;
use crate::domain::ports::UserRecord;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto}\
.error{color:#b00020;border:1px solid #b00020;padding:.5rem;margin-bottom:1rem}\
.pending{color:#555}ul{padding:0}li{list-style:none;display:flex;gap:1rem;\
align-items:center;padding:.25rem 0}form.inline{display:inline}";

/// Escape text for HTML element content and quoted attribute values.
///
/// # Examples
/// ```
/// use user_admin::inbound::console::escape;
///
/// assert_eq!(escape("<b>\"Ada\" & 'co'</b>"), "&lt;b&gt;&quot;Ada&quot; &amp; &#39;co&#39;&lt;/b&gt;");
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>User Management</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<h1>User Management</h1>\n{body}</body>\n</html>\n"
    )
}

/// Page shown when the initial user list could not be loaded.
pub fn render_load_error(error: &str) -> String {
    document(&format!(
        "<div class=\"error\" role=\"alert\">Error loading users: {}</div>\n",
        escape(error)
    ))
}

/// Full page for the console.
pub fn render_console(state: &ConsoleState) -> String {
    let mut body = String::new();
    if let Some(error) = state.error() {
        body.push_str(&format!(
            "<div class=\"error\" role=\"alert\">{}</div>\n",
            escape(error)
        ));
    }
    body.push_str(&render_form(state));
    if state.is_pending() {
        body.push_str("<p class=\"pending\" aria-live=\"polite\">Saving changes...</p>\n");
    }
    body.push_str(&render_list(state));
    document(&body)
}

fn render_form(state: &ConsoleState) -> String {
    let disabled = if state.is_pending() { " disabled" } else { "" };
    let (action, heading) = match &state.editing {
        Some(user) => (format!("/users/{}", escape(&user.id)), "Edit User"),
        None => ("/users".to_owned(), "Add User"),
    };
    let submit_label = match (state.is_pending(), state.editing.is_some()) {
        (true, _) => "<span class=\"spinner\" aria-label=\"Saving\">&#8987;</span>",
        (false, true) => "Update User",
        (false, false) => "Create User",
    };
    let cancel = if state.editing.is_some() {
        if state.is_pending() {
            "<button type=\"button\" disabled>Cancel Edit</button>\n".to_owned()
        } else {
            "<a href=\"/\" role=\"button\">Cancel Edit</a>\n".to_owned()
        }
    } else {
        String::new()
    };
    format!(
        "<h2>{heading}</h2>\n<form method=\"post\" action=\"{action}\">\n\
         <label>Name <input type=\"text\" name=\"name\" value=\"{name}\" required{disabled}></label>\n\
         <label>Email <input type=\"email\" name=\"email\" value=\"{email}\" required{disabled}></label>\n\
         <button type=\"submit\"{disabled}>{submit_label}</button>\n{cancel}</form>\n",
        name = escape(&state.name),
        email = escape(&state.email),
    )
}

fn render_list(state: &ConsoleState) -> String {
    if state.users.is_empty() {
        return "<h2>Users</h2>\n<p>No users yet.</p>\n".to_owned();
    }
    let disabled = if state.is_pending() { " disabled" } else { "" };
    let rows: String = state
        .users
        .iter()
        .map(|user| render_row(user, disabled))
        .collect();
    format!("<h2>Users</h2>\n<ul>\n{rows}</ul>\n")
}

fn render_row(user: &UserRecord, disabled: &str) -> String {
    let id = escape(&user.id);
    format!(
        "<li><span class=\"name\">{name}</span> <span class=\"email\">{email}</span> \
         <a href=\"/users/{id}/edit\">Edit</a> \
         <form class=\"inline\" method=\"post\" action=\"/users/{id}/delete\">\
         <button type=\"submit\"{disabled}>Delete</button></form></li>\n",
        name = escape(&user.name),
        email = escape(&user.email),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::console::{ConsoleEvent, RequestState};
    use rstest::{fixture, rstest};

    #[fixture]
    fn ada() -> UserRecord {
        UserRecord {
            id: "1".to_owned(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            created_at: None,
            updated_at: None,
        }
    }

    #[rstest]
    fn idle_console_offers_create(ada: UserRecord) {
        let html = render_console(&ConsoleState::new(vec![ada]));

        assert!(html.contains("action=\"/users\""));
        assert!(html.contains(">Create User</button>"));
        assert!(html.contains("href=\"/users/1/edit\""));
        assert!(html.contains("action=\"/users/1/delete\""));
        assert!(!html.contains("disabled"));
        assert!(!html.contains("Cancel Edit"));
        assert!(!html.contains("Saving changes..."));
    }

    #[rstest]
    fn editing_targets_the_user_and_offers_cancel(ada: UserRecord) {
        let mut state = ConsoleState::new(vec![ada.clone()]);
        state.apply(ConsoleEvent::EditRequested(ada));
        let html = render_console(&state);

        assert!(html.contains("action=\"/users/1\""));
        assert!(html.contains(">Update User</button>"));
        assert!(html.contains("Cancel Edit"));
        assert!(html.contains("value=\"Ada\""));
    }

    #[rstest]
    fn pending_console_disables_controls(ada: UserRecord) {
        let mut state = ConsoleState::new(vec![ada]);
        state.apply(ConsoleEvent::NameChanged("Grace".to_owned()));
        state.apply(ConsoleEvent::Submit);
        let html = render_console(&state);

        assert!(html.contains("Saving changes..."));
        assert!(html.contains("required disabled"));
        assert!(html.contains("<button type=\"submit\" disabled><span class=\"spinner\""));
        assert!(!html.contains("Create User"));
    }

    #[rstest]
    fn errors_render_in_a_banner() {
        let state = ConsoleState {
            request: RequestState::Failed("A user with this email already exists".to_owned()),
            ..ConsoleState::default()
        };
        let html = render_console(&state);

        assert!(html.contains(
            "<div class=\"error\" role=\"alert\">A user with this email already exists</div>"
        ));
        assert!(html.contains("No users yet."));
    }

    #[rstest]
    fn user_text_is_escaped() {
        let mut state = ConsoleState::default();
        state.apply(ConsoleEvent::NameChanged("<script>alert(1)</script>".to_owned()));
        let html = render_console(&state);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[rstest]
    fn load_errors_are_shown_verbatim() {
        let html = render_load_error("connection refused");
        assert!(html.contains("Error loading users: connection refused"));
    }
}
