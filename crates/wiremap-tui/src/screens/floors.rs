//! Floors of one building. Drill-in target of the buildings table.
//!
//! The building context arrives as `ViewBuild` when the navigation
//! commits; the floor list follows as `FloorsLoaded`. Adding a floor
//! needs the full building record (name and address seed the form), so
//! the `a` key waits until the builds cache has supplied it.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use wiremap_core::model::{Build, Floor};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;

pub struct FloorsScreen {
    focused: bool,
    /// Short name from the route parameter.
    build_short: String,
    /// Full record, once the builds cache knows it.
    build: Option<Build>,
    floors: Arc<Vec<Floor>>,
    table_state: TableState,
}

impl FloorsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            build_short: String::new(),
            build: None,
            floors: Arc::new(Vec::new()),
            table_state: TableState::default(),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let clamped = if self.floors.is_empty() {
            0
        } else {
            idx.min(self.floors.len() - 1)
        };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        if self.floors.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_possible_wrap)]
        let next = (current + delta).clamp(0, self.floors.len() as isize - 1);
        self.select(next as usize);
    }

    fn selected_floor(&self) -> Option<&Floor> {
        self.floors.get(self.selected_index())
    }
}

impl Component for FloorsScreen {
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
                if !self.floors.is_empty() {
                    self.select(self.floors.len() - 1);
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
            KeyCode::Enter => Ok(self.selected_floor().map(|floor| {
                Action::Navigate(format!("/builds/{}/{}", self.build_short, floor.number))
            })),
            KeyCode::Char('a') => Ok(Some(self.build.as_ref().map_or_else(
                || {
                    Action::Notify(Notification::warning(
                        "Building details are still loading",
                    ))
                },
                |build| Action::OpenFloorAdd {
                    build_name: build.name.clone(),
                    build_addr: build.addr.clone(),
                },
            ))),
            KeyCode::Char('d') => Ok(self.selected_floor().map(|floor| {
                Action::RequestDeleteFloor {
                    build: self.build_short.clone(),
                    number: floor.number,
                }
            })),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ViewBuild { short_name, build } => {
                if *short_name != self.build_short {
                    self.build_short.clone_from(short_name);
                    self.floors = Arc::new(Vec::new());
                    self.table_state.select(Some(0));
                    self.build = None;
                }
                if let Some(record) = build {
                    self.build = Some((**record).clone());
                }
            }
            Action::FloorsLoaded { build, floors } => {
                if *build == self.build_short {
                    self.floors = Arc::clone(floors);
                    if !self.floors.is_empty() && self.selected_index() >= self.floors.len() {
                        self.select(self.floors.len() - 1);
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = self.build.as_ref().map_or_else(
            || format!(" {} ({} floors) ", self.build_short, self.floors.len()),
            |build| format!(" {} ({} floors) ", build.name, self.floors.len()),
        );
        let block = Block::default()
            .title(title)
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
            Constraint::Length(1), // address line
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let addr = self.build.as_ref().map_or("", |b| b.addr.as_str());
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  {addr}"), theme::table_row())),
            layout[0],
        );

        let header = Row::new(vec![
            Cell::from("Floor").style(theme::table_header()),
            Cell::from("Building").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .floors
            .iter()
            .enumerate()
            .map(|(i, floor)| {
                let prefix = if i == selected_idx { "\u{25b8}" } else { " " };
                let row_style = if i == selected_idx {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Row::new(vec![
                    Cell::from(format!("{prefix}{}", floor.number)),
                    Cell::from(floor.build_name.clone()),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [Constraint::Length(8), Constraint::Min(20)];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[1], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("plan  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("add floor  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("back", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "floors"
    }
}
