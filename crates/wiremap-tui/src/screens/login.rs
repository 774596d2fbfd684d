//! Login screen. Replaces the whole frame until a session exists.
//!
//! Submission goes through `Action::SubmitLogin`; the app spawns the
//! actual authentication call and reports back with `LoginFinished`.
//! Configured credentials arrive through the same action, so the
//! throbber shows for auto-login exactly as for a typed one.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use secrecy::SecretString;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Username,
    Password,
}

pub struct LoginScreen {
    focused: bool,
    username: String,
    password: String,
    field: LoginField,
    show_password: bool,
    authenticating: bool,
    error: Option<String>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl LoginScreen {
    pub fn new(initial_username: Option<String>) -> Self {
        Self {
            focused: false,
            username: initial_username.unwrap_or_default(),
            password: String::new(),
            field: LoginField::Username,
            show_password: false,
            authenticating: false,
            error: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn cycle_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    fn submit(&mut self) -> Option<Action> {
        if self.username.trim().is_empty() {
            self.error = Some("username is required".into());
            return None;
        }
        if self.password.is_empty() {
            self.error = Some("password is required".into());
            return None;
        }
        Some(Action::SubmitLogin {
            username: self.username.trim().to_owned(),
            password: SecretString::from(self.password.clone()),
        })
    }

    fn render_centered_panel(&self, frame: &mut Frame, area: Rect) -> Rect {
        let panel_w = 46u16.min(area.width.saturating_sub(4));
        let panel_h = 16u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(panel_w)) / 2;
        let y = (area.height.saturating_sub(panel_h)) / 2;
        let panel = Rect::new(area.x + x, area.y + y, panel_w, panel_h);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "wiremap",
                    Style::default()
                        .fg(theme::COPPER)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::COPPER));

        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        inner
    }

    fn render_input_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        label: &str,
        value: &str,
        active: bool,
        masked: bool,
    ) {
        if area.height < 3 {
            return;
        }

        let label_area = Rect::new(area.x, area.y, area.width, 1);
        let label_style = if active {
            Style::default().fg(theme::STEEL_BLUE)
        } else {
            Style::default().fg(theme::DIM_TEXT)
        };
        frame.render_widget(Paragraph::new(Span::styled(label, label_style)), label_area);

        let display = if masked && !value.is_empty() {
            "\u{25CF}".repeat(value.chars().count())
        } else {
            value.to_string()
        };

        let border_color = if active {
            theme::COPPER
        } else {
            theme::BORDER_GRAY
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let block_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
        let inner = block.inner(block_area);
        frame.render_widget(block, block_area);

        let text = if active && !self.authenticating {
            format!("{display}\u{2588}")
        } else {
            display
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                text,
                Style::default().fg(theme::STEEL_BLUE),
            )),
            inner,
        );
    }
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.authenticating {
            return Ok(None);
        }
        if key.code != KeyCode::Enter {
            self.error = None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.cycle_field();
            }
            KeyCode::Enter => return Ok(self.submit()),
            KeyCode::Backspace => {
                self.active_input_mut().pop();
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'u' {
                    self.show_password = !self.show_password;
                } else {
                    self.active_input_mut().push(c);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SubmitLogin { username, .. } => {
                // Auto-login from the config lands here too; mirror the
                // name so the panel shows who is signing in.
                if self.username.is_empty() {
                    self.username.clone_from(username);
                }
                self.authenticating = true;
                self.error = None;
            }
            Action::LoginFinished(result) => {
                self.authenticating = false;
                match result {
                    Ok(()) => {
                        self.password.clear();
                        self.error = None;
                    }
                    Err(msg) => self.error = Some(msg.clone()),
                }
            }
            Action::Tick => {
                if self.authenticating {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            area,
        );

        let inner = self.render_centered_panel(frame, area);

        let layout = Layout::vertical([
            Constraint::Length(2), // heading
            Constraint::Length(4), // username
            Constraint::Length(4), // password
            Constraint::Length(1), // throbber
            Constraint::Length(1), // error
            Constraint::Min(1),    // hints
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Sign in to the inventory",
                Style::default().fg(theme::DIM_TEXT),
            ))
            .alignment(Alignment::Center),
            layout[0],
        );

        self.render_input_field(
            frame,
            layout[1],
            " Username",
            &self.username,
            self.field == LoginField::Username,
            false,
        );
        self.render_input_field(
            frame,
            layout[2],
            " Password",
            &self.password,
            self.field == LoginField::Password,
            !self.show_password,
        );

        if self.authenticating {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label(" Signing in...")
                .style(Style::default().fg(theme::STEEL_BLUE))
                .throbber_style(Style::default().fg(theme::COPPER));
            frame.render_stateful_widget(throbber, layout[3], &mut self.throbber_state.clone());
        }

        if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    err.as_str(),
                    Style::default().fg(theme::FAULT_RED),
                ))
                .alignment(Alignment::Center),
                layout[4],
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Tab field  Ctrl+U show  Enter sign in  Ctrl+C quit",
                theme::key_hint(),
            ))
            .alignment(Alignment::Center),
            layout[5],
        );
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "login"
    }
}
