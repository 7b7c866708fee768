use crate::form_fields;
use collabtalk_core::{
    auth::login,
    credentials::{Credentials, Invalid},
};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Identifies one login request, so its response can be matched up with the
/// form that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission(pub u64);

/// Where the form is in the submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Waiting for the user
    #[default]
    Idle,

    /// A login request is in flight
    Pending(Submission),

    /// The last attempt failed; show this to the user
    Error(String),
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do; keep editing
    Continue,

    /// The user asked to submit the form
    Submit,
}

/// The login screen's form: email, password, and a button.
#[derive(Debug)]
pub struct LoginForm {
    /// Which field has focus
    active: Field,

    /// Who are you?
    email: Input,

    /// What's your password? (Will be masked)
    password: Input,

    /// Idle, in flight, or failed
    state: SubmissionState,

    /// Why the last submit didn't go anywhere, if it didn't
    invalid: Option<Invalid>,
}

form_fields!(Field, Email => "Email", Password => "Password", Submit => "Login");

impl LoginForm {
    /// Render the form centered in the body area.
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, body_area: Rect, frame: &mut Frame<'_>) {
        let popup_horiz = Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);
        let [popup_column] = popup_horiz.areas(body_area);

        // The error or hint wraps, so the form grows to fit it.
        let message = match (self.invalid(), self.error()) {
            (Some(invalid), _) => Some((invalid.to_string(), Style::default().fg(Color::Yellow))),
            (None, Some(error)) => Some((
                error.to_string(),
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            (None, None) => None,
        };
        let message_rows = message.as_ref().map_or(1, |(text, _)| {
            wrapped_rows(text, popup_column.width.saturating_sub(2))
        });

        // 3 email + 3 password + 3 button + 1 gap + 1 signup + 2 border
        let popup_vert =
            Layout::vertical([Constraint::Length(13 + message_rows)]).flex(Flex::Center);
        let [popup_area] = popup_vert.areas(popup_column);
        frame.render_widget(Clear, popup_area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(" Login ").bold().centered())
            .border_style(Style::default().fg(Color::Magenta));
        let inner_area = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let [email_area, password_area, message_area, button_area, _, signup_area] =
            Layout::vertical(Constraint::from_lengths([3, 3, message_rows, 3, 1, 1]))
                .areas(inner_area);

        // -2 for the border, -1 for the cursor
        let width = inner_area.width.saturating_sub(2 + 1) as usize;

        // EMAIL AND PASSWORD
        for (field, input, area) in [
            (Field::Email, &self.email, email_area),
            (Field::Password, &self.password, password_area),
        ] {
            let scroll = input.visual_scroll(width);

            let shown = match field {
                Field::Password => "*".repeat(input.value().chars().count()),
                _ => input.value().to_string(),
            };

            let border_style = if self.active == field {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let widget = Paragraph::new(shown).scroll((0, scroll as u16)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(field.label())
                    .border_style(border_style),
            );

            frame.render_widget(widget, area);

            if self.active == field {
                frame.set_cursor_position((
                    area.x
                        + (input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                        + 1, // just past the end of the text
                    area.y + 1, // +1 row for the border/title
                ));
            }
        }

        // ERROR OR VALIDATION HINT
        if let Some((text, style)) = message {
            frame.render_widget(
                Paragraph::new(text).style(style).wrap(Wrap { trim: true }),
                message_area,
            );
        }

        // SUBMIT
        {
            let (label, style) = if self.is_pending() {
                (
                    "Logging in...",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::DIM),
                )
            } else if self.active == Field::Submit {
                (
                    Field::Submit.label(),
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (Field::Submit.label(), Style::default().fg(Color::Magenta))
            };

            let button = Paragraph::new(label)
                .centered()
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_style(style));

            frame.render_widget(button, button_area);
        }

        frame.render_widget(
            Paragraph::new("New here? Create an account")
                .centered()
                .fg(Color::Gray),
            signup_area,
        );
    }

    /// Handle a key press: move focus, edit the focused field, or ask to
    /// submit.
    pub fn handle_event(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.active = self.active.next();
                Outcome::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = self.active.prev();
                Outcome::Continue
            }
            KeyCode::Enter => Outcome::Submit,
            KeyCode::Char(' ') if self.active == Field::Submit => Outcome::Submit,
            _ => {
                let event = Event::Key(key);

                let changed = match self.active {
                    Field::Email => self.email.handle_event(&event),
                    Field::Password => self.password.handle_event(&event),
                    Field::Submit => None,
                };

                if changed.is_some_and(|change| change.value) {
                    self.invalid = None;
                }

                Outcome::Continue
            }
        }
    }

    /// Try to submit the form as `submission`. Returns the request to send, or
    /// `None` if the form is already waiting on a response or isn't filled in
    /// properly. In the latter case the form shows why and focuses the field
    /// that needs attention.
    pub fn submit(&mut self, submission: Submission) -> Option<login::Req> {
        if self.is_pending() {
            return None;
        }

        match self.credentials().validate() {
            Ok(req) => {
                self.invalid = None;
                self.state = SubmissionState::Pending(submission);
                Some(req)
            }
            Err(invalid) => {
                self.active = match invalid {
                    Invalid::MissingEmail | Invalid::MalformedEmail => Field::Email,
                    Invalid::MissingPassword => Field::Password,
                };
                self.invalid = Some(invalid);
                None
            }
        }
    }

    /// Finish `submission` successfully. Returns `false` (and changes nothing)
    /// if the form isn't waiting on that submission.
    pub fn succeed(&mut self, submission: Submission) -> bool {
        if !self.is_pending_on(submission) {
            return false;
        }

        self.state = SubmissionState::Idle;
        true
    }

    /// Finish `submission` with an error to show. Returns `false` (and changes
    /// nothing) if the form isn't waiting on that submission.
    pub fn fail(&mut self, submission: Submission, message: String) -> bool {
        if !self.is_pending_on(submission) {
            return false;
        }

        self.state = SubmissionState::Error(message);
        true
    }

    /// What's currently in the fields
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.value(), self.password.value())
    }

    /// Where we are in the submit cycle
    #[cfg(test)]
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Is a request in flight? If so, the submit button is disabled.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, SubmissionState::Pending(_))
    }

    /// Is a request in flight for this particular submission?
    pub fn is_pending_on(&self, submission: Submission) -> bool {
        self.state == SubmissionState::Pending(submission)
    }

    /// The error from the last attempt, if it failed
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Why the last submit was refused before sending anything
    pub fn invalid(&self) -> Option<Invalid> {
        self.invalid
    }
}

/// How many rows `text` takes up when word-wrapped to `width` columns.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut rows = 1;
    let mut used = 0;

    for word in text.split_whitespace() {
        let len = word.chars().count();

        if used > 0 && used + 1 + len <= width {
            used += 1 + len;
            continue;
        }

        if used > 0 {
            rows += 1;
        }

        // words longer than a row get broken across rows
        used = len;
        while used > width {
            rows += 1;
            used -= width;
        }
    }

    u16::try_from(rows).unwrap_or(u16::MAX)
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            active: Field::first(),
            email: Input::default(),
            password: Input::default(),
            state: SubmissionState::Idle,
            invalid: None,
        }
    }
}
