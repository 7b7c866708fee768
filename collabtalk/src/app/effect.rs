use super::{login_form::Submission, Action};
use crate::{config::Config, session::SessionStore};
use collabtalk_core::{
    auth::{self, error::FALLBACK_MESSAGE, login},
    User,
};
use tokio::io;

/// Connections to external services that effects use. We keep these around
/// to have some level of connection sharing for the app as a whole.
pub struct EffectContext {
    /// an HTTP client with reqwest
    http: reqwest::Client,

    /// Where the auth API lives
    auth: auth::Client,

    /// Where the session token goes
    session: SessionStore,
}

impl EffectContext {
    /// Set up connections according to the config
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth: auth::Client::new(config.server.clone()),
            session: SessionStore::new(config.data_dir()),
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Log in to an existing account.
    LogIn {
        /// Which attempt this is
        submission: Submission,

        /// Email and password to send
        req: login::Req,
    },

    /// Persist the session token, then finish logging in as `user`.
    SaveToken {
        /// Which attempt this belongs to
        submission: Submission,

        /// The token the server gave us
        token: String,

        /// Who we logged in as
        user: User,
    },
}

impl Effect {
    /// Which login attempt this effect is part of
    fn submission(&self) -> Submission {
        match self {
            Self::LogIn { submission, .. } | Self::SaveToken { submission, .. } => *submission,
        }
    }

    /// Can we drop this effect on the floor when exiting? Network requests can
    /// be abandoned; writes to disk should finish.
    pub fn is_interruptible(&self) -> bool {
        matches!(self, Self::LogIn { .. })
    }

    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run(self, conn: &EffectContext) -> Option<Action> {
        let submission = self.submission();

        match self.run_inner(conn).await {
            Ok(action) => action,
            Err(problem) => {
                match &problem {
                    Problem::Server(auth::Error::Rejected { status, .. }) => {
                        tracing::warn!(%status, "login rejected");
                    }
                    _ => tracing::error!(?problem, "problem running effect"),
                }

                Some(Action::LoginFailed {
                    submission,
                    message: problem.user_message().to_owned(),
                })
            }
        }
    }

    /// The actual implementation of `run`, but with a `Result` wrapper to make
    /// it more ergonomic to write.
    async fn run_inner(self, conn: &EffectContext) -> Result<Option<Action>, Problem> {
        match self {
            Self::LogIn { submission, req } => {
                tracing::info!(email = %req.email, "logging in");

                let resp = conn.auth.login(&conn.http, &req).await?;

                Ok(Some(Action::LoggedIn { submission, resp }))
            }

            Self::SaveToken {
                submission,
                token,
                user,
            } => {
                tracing::info!(path = ?conn.session.token_path(), "saving session token");

                conn.session.set_token(&token).await?;

                Ok(Some(Action::SavedToken { submission, user }))
            }
        }
    }
}

/// Problems that can happen while running an `Effect`.
#[derive(Debug, thiserror::Error)]
pub enum Problem {
    /// We had a problem writing to disk, for example with permissions or
    /// missing directories.
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// We had a problem communicating with the server, for example due to a bad
    /// URL or wrong credentials.
    #[error("Problem communicating with the server: {0}")]
    Server(#[from] auth::Error),
}

impl Problem {
    /// What to show in the login form for this problem
    pub fn user_message(&self) -> &str {
        match self {
            Self::Server(err) => err.user_message(),
            Self::IO(_) => FALLBACK_MESSAGE,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::path::PathBuf;
    use tempdir::TempDir;

    pub(crate) fn context(server: &str, data_dir: PathBuf) -> EffectContext {
        EffectContext {
            http: reqwest::Client::new(),
            auth: auth::Client::new(server),
            session: SessionStore::new(data_dir),
        }
    }

    fn user() -> User {
        serde_json::from_value(serde_json::json!({ "email": "ada@example.com" })).unwrap()
    }

    #[test]
    fn only_login_is_interruptible() {
        let log_in = Effect::LogIn {
            submission: Submission(1),
            req: login::Req {
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
            },
        };
        let save = Effect::SaveToken {
            submission: Submission(1),
            token: "abc".to_string(),
            user: user(),
        };

        assert!(log_in.is_interruptible());
        assert!(!save.is_interruptible());
    }

    #[tokio::test]
    async fn save_token_persists_and_reports_user() {
        let dir = TempDir::new("collabtalk-effect").unwrap();
        let conn = context("http://localhost:3000", dir.path().to_owned());

        let action = Effect::SaveToken {
            submission: Submission(3),
            token: "abc.def.ghi".to_string(),
            user: user(),
        }
        .run(&conn)
        .await;

        assert!(
            matches!(
                &action,
                Some(Action::SavedToken {
                    submission: Submission(3),
                    user: saved,
                }) if *saved == user()
            ),
            "{action:?}"
        );
        assert_eq!(
            tokio::fs::read_to_string(dir.path().join("token"))
                .await
                .unwrap(),
            "abc.def.ghi"
        );
    }

    #[tokio::test]
    async fn save_token_failure_is_a_login_failure() {
        let dir = TempDir::new("collabtalk-effect").unwrap();
        // A file where the data directory should be means we can't create it.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        let conn = context("http://localhost:3000", blocked);

        let action = Effect::SaveToken {
            submission: Submission(4),
            token: "abc".to_string(),
            user: user(),
        }
        .run(&conn)
        .await;

        assert!(
            matches!(
                &action,
                Some(Action::LoginFailed {
                    submission: Submission(4),
                    message,
                }) if message == FALLBACK_MESSAGE
            ),
            "{action:?}"
        );
    }

    #[tokio::test]
    async fn bad_server_url_is_a_login_failure() {
        let dir = TempDir::new("collabtalk-effect").unwrap();
        let conn = context("not a url", dir.path().to_owned());

        let action = Effect::LogIn {
            submission: Submission(5),
            req: login::Req {
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
            },
        }
        .run(&conn)
        .await;

        assert!(
            matches!(
                &action,
                Some(Action::LoginFailed {
                    submission: Submission(5),
                    message,
                }) if message == FALLBACK_MESSAGE
            ),
            "{action:?}"
        );
    }
}
