use crate::User;
use core::fmt::{self, Debug, Formatter};
use serde::{Deserialize, Serialize};

/// The request to log into the server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Req {
    /// Email the account was registered with.
    pub email: String,

    /// Plaintext password to use for login.
    pub password: String,
}

impl Debug for Req {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Req")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of logging in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resp {
    /// Session token to use for future requests.
    pub token: String,

    /// Who we logged in as.
    pub user: User,
}

/// Where the login endpoint lives.
pub const PATH: &str = "/users/login";
