//! Common code for CollabTalk clients: talking to the auth server and the
//! values that pass between the server and the UI.

/// Authenticate with the CollabTalk server.
pub mod auth;

/// What the user types into the login form.
pub mod credentials;
pub use credentials::Credentials;

/// The authenticated user, as the server describes them.
pub mod user;
pub use user::User;
