use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user object the server sends back after logging in. We only look at a
/// couple of fields; everything else is kept so it survives a round trip
/// through the rest of the app untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The server's ID for this user.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The email address the user logged in with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Any other fields the server included.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// A short name to greet the user by. Prefers the email address, then the
    /// ID.
    pub fn display_name(&self) -> Option<&str> {
        self.email.as_deref().or(self.id.as_deref())
    }
}
