use crate::auth::login;
use core::fmt::{self, Debug, Formatter};

/// What the user has typed into the login form so far.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Email address, as typed.
    pub email: String,

    /// Password, as typed. Never logged.
    pub password: String,
}

impl Credentials {
    /// Construct credentials from what's in the form fields.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check that both fields are filled in and the email looks like an email
    /// address (one `@`, text on both sides, no spaces), then turn the
    /// credentials into a login request. The email is trimmed; the password is
    /// sent exactly as typed.
    ///
    /// ## Errors
    ///
    /// Returns the first problem found, checking the email before the
    /// password.
    pub fn validate(&self) -> Result<login::Req, Invalid> {
        let email = self.email.trim();

        if email.is_empty() {
            return Err(Invalid::MissingEmail);
        }

        // Exactly one `@` with text on both sides, and no whitespace anywhere.
        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.contains(char::is_whitespace) => {}
            _ => return Err(Invalid::MalformedEmail),
        }

        if self.password.is_empty() {
            return Err(Invalid::MissingPassword);
        }

        Ok(login::Req {
            email: email.to_owned(),
            password: self.password.clone(),
        })
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reasons the form can't be submitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Invalid {
    /// Nothing in the email field.
    #[error("Please fill in your email.")]
    MissingEmail,

    /// Something in the email field, but not an email address.
    #[error("Please enter a valid email address.")]
    MalformedEmail,

    /// Nothing in the password field.
    #[error("Please fill in your password.")]
    MissingPassword,
}
