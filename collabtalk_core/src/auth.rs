/// Things that can go wrong while logging in
pub mod error;
pub use error::Error;

/// Logging in with email and password
pub mod login;

/// HTTP client for the auth API
pub mod client;
pub use client::Client;
