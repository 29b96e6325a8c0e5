// src/views/login.rs
// Sign in / sign up form.

use crate::app::{CredentialsForm, Field, Page};
use crate::defs::{paint, Colors};

pub fn render(page: Page, form: &CredentialsForm) -> Vec<String> {
    let register = page == Page::Register;
    let (title, action, other) = if register {
        ("Sign up", "Register", "Login")
    } else {
        ("Sign in", "Login", "Register")
    };

    let field = |label: &str, value: String, focus: Field| {
        let marker = if form.focus == focus { ">" } else { " " };
        format!("{marker} {label:<9} {value}")
    };

    let mut lines = vec![
        title.to_string(),
        String::new(),
        field("Username", form.username.clone(), Field::Username),
        field("Password", "*".repeat(form.password.chars().count()), Field::Password),
        String::new(),
    ];
    if form.busy {
        lines.push(paint(Colors::dim(), &format!("[Enter] {action} ...")));
    } else {
        lines.push(format!("[Enter] {action}   [Tab] switch field   [F2] or {other}   [Esc] quit"));
    }
    if let Some(error) = &form.error {
        lines.push(String::new());
        lines.push(paint(Colors::red(), error));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::plain;

    #[test]
    fn test_password_is_masked() {
        let form = CredentialsForm {
            username: "ann".into(),
            password: "secret".into(),
            focus: Field::Password,
            ..CredentialsForm::default()
        };
        let lines: Vec<String> = render(Page::Login, &form).iter().map(|l| plain(l)).collect();
        assert_eq!(lines[0], "Sign in");
        assert_eq!(lines[2], "  Username  ann");
        assert_eq!(lines[3], "> Password  ******");
        assert!(!lines.iter().any(|l| l.contains("secret")));
    }

    #[test]
    fn test_busy_form_shows_progress() {
        let form = CredentialsForm { busy: true, ..CredentialsForm::default() };
        let lines: Vec<String> = render(Page::Login, &form).iter().map(|l| plain(l)).collect();
        assert_eq!(lines[5], "[Enter] Login ...");
    }

    #[test]
    fn test_register_mode_and_error() {
        let form = CredentialsForm { error: Some("Registration failed".into()), ..CredentialsForm::default() };
        let lines: Vec<String> = render(Page::Register, &form).iter().map(|l| plain(l)).collect();
        assert_eq!(lines[0], "Sign up");
        assert!(lines.iter().any(|l| l.contains("[F2] or Login")));
        assert_eq!(lines.last().map(String::as_str), Some("Registration failed"));
    }
}
