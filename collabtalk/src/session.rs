use collabtalk_core::User;
use std::{io, path::PathBuf, sync::Arc};
use tokio::{fs, sync::watch};

/// The key (file name, in the data directory) the session token lives under.
pub const TOKEN_KEY: &str = "token";

/// Durable storage for the session token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Where the token gets written
    dir: PathBuf,
}

impl SessionStore {
    /// Store session data under the given directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Where the token file lives
    pub fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    /// Save the token, replacing any previous one.
    ///
    /// ## Errors
    ///
    /// Any IO error creating the directory or writing the file.
    pub async fn set_token(&self, token: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.token_path(), token).await
    }
}

/// Who is logged in right now. Clones share the same value, so any part of
/// the app holding one sees updates made through any other.
#[derive(Debug, Clone)]
pub struct CurrentUser(Arc<watch::Sender<Option<User>>>);

impl CurrentUser {
    /// Start with nobody logged in.
    pub fn new() -> Self {
        Self(Arc::new(watch::Sender::new(None)))
    }

    /// Replace the current user.
    pub fn set(&self, user: Option<User>) {
        // `send_replace` works whether or not anyone is subscribed.
        self.0.send_replace(user);
    }

    /// Get a copy of the current user.
    pub fn get(&self) -> Option<User> {
        self.0.borrow().clone()
    }
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self::new()
    }
}
