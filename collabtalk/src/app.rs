/// Things that can happen to the app
mod action;
pub use action::Action;

/// Side effects the app asks the shell to perform
mod effect;
pub use effect::{Effect, EffectContext};

/// The login screen's form
mod login_form;
use login_form::{LoginForm, Outcome, Submission};

use crate::session::CurrentUser;
use chrono::{Datelike, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::process::ExitCode;

/// The name we show in the navbar and footer
const PRODUCT: &str = "AI Enhanced CollabTalk";

/// The "functional core" of the app.
pub struct App {
    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// Which screen we're on
    route: Route,

    /// Who is logged in, shared with anything else that needs to know
    current_user: CurrentUser,

    /// The ID the next login attempt will get
    next_submission: u64,

    /// Set once we're done and want to exit with this code
    exit: Option<ExitCode>,
}

/// The screens the app can show.
#[derive(Debug)]
pub enum Route {
    /// `/login`: the login form
    Login(LoginForm),

    /// `/`: where we end up after logging in
    Home,
}

impl Route {
    /// The path this route lives at
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login(_) => "/login",
            Self::Home => "/",
        }
    }
}

impl App {
    /// Create a new instance of the app, starting on the login screen.
    pub fn new(current_user: CurrentUser) -> Self {
        Self {
            status_line: None,
            route: Route::Login(LoginForm::default()),
            current_user,
            next_submission: 0,
            exit: None,
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let [nav_area, body_area, footer_area, status_area] = vertical.areas(frame.area());

        Self::render_nav(frame, nav_area);

        match &self.route {
            Route::Login(form) => form.render(body_area, frame),
            Route::Home => self.render_home(frame, body_area),
        }

        Self::render_footer(frame, footer_area);

        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.as_str(),
            None => "Esc or Ctrl-C to quit",
        })
        .fg(Color::DarkGray);

        frame.render_widget(status, status_area);
    }

    /// The bar across the top of every screen
    fn render_nav(frame: &mut Frame, area: Rect) {
        let [title_area, links_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(16)]).areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("⚡ ", Style::new().fg(Color::Magenta)),
                Span::styled(
                    PRODUCT,
                    Style::new()
                        .fg(Color::LightMagenta)
                        .add_modifier(Modifier::BOLD),
                ),
            ])),
            title_area,
        );

        frame.render_widget(
            Paragraph::new("Login  Register")
                .right_aligned()
                .fg(Color::Magenta),
            links_area,
        );
    }

    /// The bar across the bottom of every screen
    fn render_footer(frame: &mut Frame, area: Rect) {
        let [credit_area, links_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(23)]).areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(format!("© {} ", Local::now().year())),
                Span::styled(PRODUCT, Style::new().fg(Color::Magenta).bold()),
                Span::raw(". Powered by Adley Services."),
            ]))
            .fg(Color::Gray),
            credit_area,
        );

        frame.render_widget(
            Paragraph::new("Privacy  Terms  Contact")
                .right_aligned()
                .fg(Color::Gray),
            links_area,
        );
    }

    /// The screen we show once logged in
    fn render_home(&self, frame: &mut Frame, body_area: Rect) {
        let [area] = Layout::vertical([Constraint::Length(3)])
            .flex(Flex::Center)
            .areas(body_area);

        let name = self
            .current_user
            .get()
            .and_then(|user| user.display_name().map(str::to_owned));

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(format!("Welcome, {}!", name.as_deref().unwrap_or("there")))
                    .bold(),
                Line::default(),
                Line::from("Press q to quit.").fg(Color::Gray),
            ])
            .centered(),
            area,
        );
    }

    /// Handle an `Action`, updating the app's state and producing some side
    /// effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => self.handle_key(key),

            Action::Problem(problem) => {
                self.status_line = Some(problem);

                vec![]
            }

            Action::LoggedIn { submission, resp } => match &self.route {
                Route::Login(form) if form.is_pending_on(submission) => {
                    vec![Effect::SaveToken {
                        submission,
                        token: resp.token,
                        user: resp.user,
                    }]
                }
                _ => {
                    tracing::debug!(?submission, "discarding late login response");

                    vec![]
                }
            },

            Action::SavedToken { submission, user } => {
                if let Route::Login(form) = &mut self.route {
                    if form.succeed(submission) {
                        tracing::info!(user = ?user.display_name(), "logged in");

                        self.current_user.set(Some(user));
                        self.navigate(Route::Home);
                        self.status_line = Some("Logged in".to_owned());

                        return vec![];
                    }
                }

                tracing::debug!(?submission, "discarding late login completion");

                vec![]
            }

            Action::LoginFailed {
                submission,
                message,
            } => {
                let accepted = match &mut self.route {
                    Route::Login(form) => form.fail(submission, message),
                    Route::Home => false,
                };

                if !accepted {
                    tracing::debug!(?submission, "discarding late login failure");
                }

                vec![]
            }
        }
    }

    /// Handle a key press, wherever we are.
    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');

        if ctrl_c || key.code == KeyCode::Esc {
            self.exit = Some(ExitCode::SUCCESS);

            return vec![];
        }

        let next_submission = Submission(self.next_submission);

        match &mut self.route {
            Route::Login(form) => match form.handle_event(key) {
                Outcome::Continue => vec![],
                Outcome::Submit => match form.submit(next_submission) {
                    Some(req) => {
                        self.next_submission += 1;
                        self.status_line = None;

                        vec![Effect::LogIn {
                            submission: next_submission,
                            req,
                        }]
                    }
                    None => vec![],
                },
            },

            Route::Home => {
                if key.code == KeyCode::Char('q') {
                    self.exit = Some(ExitCode::SUCCESS);
                }

                vec![]
            }
        }
    }

    /// Move to another screen. Whatever state the old screen had is dropped.
    fn navigate(&mut self, route: Route) {
        tracing::debug!(from = self.route.path(), to = route.path(), "navigating");

        self.route = route;
    }

    /// Which screen we're on
    #[cfg(test)]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }
}
