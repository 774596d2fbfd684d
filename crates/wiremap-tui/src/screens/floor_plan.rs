//! Floor plan screen. One floor of one building, with placed switches
//! plotted in a schematic area and the full floor list beside it.
//!
//! Stored positions are free-form plan coordinates; plotting scales
//! them against the largest seen value so any plan fits the panel.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use wiremap_core::Switch;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct FloorPlanScreen {
    focused: bool,
    build: String,
    number: i32,
    switches: Arc<Vec<Switch>>,
    table_state: TableState,
}

impl FloorPlanScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            build: String::new(),
            number: 0,
            switches: Arc::new(Vec::new()),
            table_state: TableState::default(),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let clamped = if self.switches.is_empty() {
            0
        } else {
            idx.min(self.switches.len() - 1)
        };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        if self.switches.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_possible_wrap)]
        let next = (current + delta).clamp(0, self.switches.len() as isize - 1);
        self.select(next as usize);
    }

    fn selected_switch(&self) -> Option<&Switch> {
        self.switches.get(self.selected_index())
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn render_plan(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Plan ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 8 || inner.height < 2 {
            return;
        }

        let placed: Vec<(usize, f64, f64)> = self
            .switches
            .iter()
            .enumerate()
            .filter_map(|(i, sw)| match (sw.position_top, sw.position_left) {
                (Some(top), Some(left)) => Some((i, top, left)),
                _ => None,
            })
            .collect();

        if placed.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no placed switches on this floor",
                    theme::key_hint(),
                )),
                inner,
            );
            return;
        }

        let max_top = placed.iter().map(|(_, top, _)| *top).fold(1.0_f64, f64::max);
        let max_left = placed
            .iter()
            .map(|(_, _, left)| *left)
            .fold(1.0_f64, f64::max);

        let selected_idx = self.selected_index();
        for (idx, top, left) in placed {
            let name = &self.switches[idx].name;
            let label = format!("\u{25a3} {name}");
            let label_w = (label.chars().count() as u16).min(inner.width);

            let x_span = f64::from(inner.width.saturating_sub(label_w));
            let y_span = f64::from(inner.height.saturating_sub(1));
            let x = inner.x + ((left / max_left) * x_span).round() as u16;
            let y = inner.y + ((top / max_top) * y_span).round() as u16;

            let style = if idx == selected_idx {
                Style::default()
                    .fg(theme::COPPER)
                    .add_modifier(ratatui::style::Modifier::BOLD)
            } else {
                Style::default().fg(theme::STEEL_BLUE)
            };

            let slot = Rect::new(x, y, label_w, 1);
            frame.render_widget(Paragraph::new(Span::styled(label, style)), slot);
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Switches ({}) ", self.switches.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("IP").style(theme::table_header()),
            Cell::from("Uplink").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .switches
            .iter()
            .enumerate()
            .map(|(i, sw)| {
                let prefix = if i == selected_idx { "\u{25b8}" } else { " " };
                let placed = if sw.position_top.is_some() { "" } else { " *" };
                let row_style = if i == selected_idx {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Row::new(vec![
                    Cell::from(format!("{prefix}{}{placed}", sw.name)),
                    Cell::from(sw.ip.clone()),
                    Cell::from(format!("{} {}", sw.up_switch_name, sw.up_link)),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Min(14),
            Constraint::Length(15),
            Constraint::Min(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, inner, &mut state);
    }
}

impl Component for FloorPlanScreen {
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
                if !self.switches.is_empty() {
                    self.select(self.switches.len() - 1);
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
            KeyCode::Char('a') => Ok(Some(Action::OpenSwitchAdd {
                build: Some(self.build.clone()),
                floor: Some(self.number),
            })),
            KeyCode::Char('e') => Ok(self
                .selected_switch()
                .map(|sw| Action::OpenSwitchEdit(Box::new(sw.clone())))),
            KeyCode::Char('d') => Ok(self.selected_switch().map(|sw| {
                Action::RequestDeleteSwitch {
                    name: sw.name.clone(),
                }
            })),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ViewFloor { build, number } => {
                if *build != self.build || *number != self.number {
                    self.build.clone_from(build);
                    self.number = *number;
                    self.switches = Arc::new(Vec::new());
                    self.table_state.select(Some(0));
                }
            }
            Action::PlanLoaded {
                build,
                number,
                switches,
            } => {
                if *build == self.build && *number == self.number {
                    self.switches = Arc::clone(switches);
                    if !self.switches.is_empty() && self.selected_index() >= self.switches.len() {
                        self.select(self.switches.len() - 1);
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} \u{2022} floor {} ", self.build, self.number))
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
            Constraint::Min(1),    // panels
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let panels =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(layout[0]);

        self.render_plan(frame, panels[0]);
        self.render_list(frame, panels[1]);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("add  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("back  ", theme::key_hint()),
            Span::styled("* ", theme::key_hint_key()),
            Span::styled("unplaced", theme::key_hint()),
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
        "floor-plan"
    }
}
