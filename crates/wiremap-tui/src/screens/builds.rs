//! Buildings screen. The landing table; Enter drills into a building's
//! floors.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use wiremap_core::Build;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct BuildsScreen {
    focused: bool,
    builds: Arc<Vec<Build>>,
    table_state: TableState,
}

impl BuildsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            builds: Arc::new(Vec::new()),
            table_state: TableState::default(),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let clamped = if self.builds.is_empty() {
            0
        } else {
            idx.min(self.builds.len() - 1)
        };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        if self.builds.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_possible_wrap)]
        let next = (current + delta).clamp(0, self.builds.len() as isize - 1);
        self.select(next as usize);
    }

    fn selected_build(&self) -> Option<&Build> {
        self.builds.get(self.selected_index())
    }
}

impl Component for BuildsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') => {
                if !self.builds.is_empty() {
                    self.select(self.builds.len() - 1);
                }
                Ok(None)
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(10);
                Ok(None)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(-10);
                Ok(None)
            }
            KeyCode::Enter => Ok(self
                .selected_build()
                .map(|build| Action::Navigate(format!("/builds/{}", build.short_name)))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::BuildsLoaded(builds) = action {
            self.builds = Arc::clone(builds);
            if !self.builds.is_empty() && self.selected_index() >= self.builds.len() {
                self.select(self.builds.len() - 1);
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let count = self.builds.len();
        let block = Block::default()
            .title(format!(" Buildings ({count}) "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let header = Row::new(vec![
            Cell::from("Short").style(theme::table_header()),
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Address").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .builds
            .iter()
            .enumerate()
            .map(|(i, build)| {
                let prefix = if i == selected_idx { "\u{25b8}" } else { " " };
                let row_style = if i == selected_idx {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Row::new(vec![
                    Cell::from(format!("{prefix}{}", build.short_name)),
                    Cell::from(build.name.clone()),
                    Cell::from(build.addr.clone()),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Min(24),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("floors", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "builds"
    }
}
