use super::login_form::Submission;
use collabtalk_core::{auth::login, User};
use crossterm::event::KeyEvent;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// Something bad happened outside of logging in; display it to the user
    Problem(String),

    /// The server accepted our credentials
    LoggedIn {
        /// Which attempt this answers
        submission: Submission,

        /// The token and user the server sent back
        resp: login::Resp,
    },

    /// We saved the session token and can finish logging in
    SavedToken {
        /// Which attempt this finishes
        submission: Submission,

        /// Who we logged in as
        user: User,
    },

    /// Logging in didn't work out
    LoginFailed {
        /// Which attempt this answers
        submission: Submission,

        /// What to show the user
        message: String,
    },
}
