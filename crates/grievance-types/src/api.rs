use serde::{Deserialize, Serialize};

// -- Session --

/// Claims carried by the `auth_token` cookie. `sub` is the user's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth forms --

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub user_email: String,
    pub user_pwd1: String,
    pub user_pwd2: String,
}

impl SignupForm {
    pub fn passwords_match(&self) -> bool {
        self.user_pwd1 == self.user_pwd2
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub user_email: String,
    pub user_pwd: String,
}

// -- Complaint form --

/// Multipart field names of the public complaint form.
pub mod complaint_fields {
    pub const EMAIL: &str = "user_email";
    pub const NAME: &str = "user_name";
    pub const LOCATION: &str = "user_location";
    pub const MESSAGE: &str = "user_message";
    pub const ATTACHMENT: &str = "uploaded_file";
}

/// Text portion of a complaint submission. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintSubmission {
    pub email: String,
    pub name: String,
    pub location: String,
    pub message: String,
}

impl ComplaintSubmission {
    /// Assign a text field by its form name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            complaint_fields::EMAIL => &mut self.email,
            complaint_fields::NAME => &mut self.name,
            complaint_fields::LOCATION => &mut self.location,
            complaint_fields::MESSAGE => &mut self.message,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_routes_known_names() {
        let mut sub = ComplaintSubmission::default();
        assert!(sub.set_field("user_email", "a@b.com".into()));
        assert!(sub.set_field("user_message", "hi".into()));
        assert!(!sub.set_field("uploaded_file", "x".into()));

        assert_eq!(sub.email, "a@b.com");
        assert_eq!(sub.message, "hi");
        assert!(sub.name.is_empty());
    }

    #[test]
    fn password_confirmation() {
        let form = SignupForm {
            user_email: "a@b.com".into(),
            user_pwd1: "p1".into(),
            user_pwd2: "p2".into(),
        };
        assert!(!form.passwords_match());
    }
}
