//! HTML for the handful of pages the app serves. Everything interpolated
//! from user input goes through [`escape`].

use std::fmt::Write;

use axum::response::Html;

use grievance_types::models::Complaint;

const SIGNUP_FORM: &str = include_str!("../assets/signup.html");
const LOGIN_FORM: &str = include_str!("../assets/login.html");

/// GET /signup
pub async fn signup_form() -> Html<&'static str> {
    Html(SIGNUP_FORM)
}

/// GET /login
pub async fn login_form() -> Html<&'static str> {
    Html(LOGIN_FORM)
}

pub fn home(is_authenticated: bool) -> String {
    let nav = if is_authenticated {
        r#"<a href="/admin">Complaints</a> | <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/login">Log in</a> | <a href="/signup">Sign up</a>"#
    };

    layout(
        "Submit a complaint",
        &format!(
            r#"<nav>{nav}</nav>
<h1>Submit a complaint</h1>
<form method="post" action="/" enctype="multipart/form-data">
  <label>Email <input type="email" name="user_email" required></label>
  <label>Name <input type="text" name="user_name" required></label>
  <label>Location <input type="text" name="user_location" required></label>
  <label>Message <textarea name="user_message" required></textarea></label>
  <label>Attachment <input type="file" name="uploaded_file"></label>
  <button type="submit">Send</button>
</form>"#
        ),
    )
}

pub fn admin(viewer: &str, complaints: &[Complaint]) -> String {
    let mut rows = String::new();
    for c in complaints {
        let attachment = match c.attachment_name() {
            Some(name) => format!(r#"<a href="/uploads/{0}">{0}</a>"#, escape(name)),
            None => "-".to_string(),
        };
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&c.created_at),
            escape(&c.email),
            escape(&c.name),
            escape(&c.location),
            escape(&c.message),
            attachment,
        );
    }

    let body = if complaints.is_empty() {
        "<p>No complaints yet.</p>".to_string()
    } else {
        format!(
            "<table>\n<tr><th>Submitted</th><th>Email</th><th>Name</th><th>Location</th><th>Message</th><th>Attachment</th></tr>\n{rows}</table>"
        )
    };

    layout(
        "Complaints",
        &format!(
            r#"<nav>Signed in as {} | <a href="/">Home</a> | <a href="/logout">Log out</a></nav>
<h1>Complaints ({})</h1>
{body}"#,
            escape(viewer),
            complaints.len(),
        ),
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(message: &str, attachment: Option<&str>) -> Complaint {
        Complaint {
            id: 1,
            email: "a@b.com".into(),
            name: "A".into(),
            location: "X".into(),
            message: message.into(),
            attachment_path: attachment.map(String::from),
            created_at: "2026-10-15 09:00:00".into(),
        }
    }

    #[test]
    fn home_nav_follows_session() {
        assert!(home(true).contains("Log out"));
        assert!(!home(false).contains("Log out"));
        assert!(home(false).contains(r#"name="uploaded_file""#));
    }

    #[test]
    fn admin_escapes_user_content() {
        let page = admin("boss@b.com", &[complaint("<script>alert(1)</script>", None)]);
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn admin_links_attachments() {
        let page = admin("boss@b.com", &[complaint("hi", Some("uploads/1-2-a.png"))]);
        assert!(page.contains(r#"href="/uploads/1-2-a.png""#));
    }
}
