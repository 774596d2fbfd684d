//! Switches screen. Every switch in the inventory, searchable, with
//! inline detail expansion.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use wiremap_core::Switch;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct SwitchesScreen {
    focused: bool,
    switches: Arc<Vec<Switch>>,
    table_state: TableState,
    search_query: String,
    detail_open: bool,
    cached_filtered: Vec<Switch>,
}

impl SwitchesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            switches: Arc::new(Vec::new()),
            table_state: TableState::default(),
            search_query: String::new(),
            detail_open: false,
            cached_filtered: Vec::new(),
        }
    }

    fn recompute_filtered(&mut self) {
        let q = self.search_query.to_lowercase();
        let mut switches: Vec<_> = self
            .switches
            .iter()
            .filter(|sw| {
                if q.is_empty() {
                    return true;
                }
                sw.name.to_lowercase().contains(&q)
                    || sw.ip.to_lowercase().contains(&q)
                    || sw.mac.to_lowercase().contains(&q)
                    || sw.up_switch_name.to_lowercase().contains(&q)
                    || sw.serial.to_lowercase().contains(&q)
                    || sw
                        .build_short_name
                        .as_deref()
                        .unwrap_or("")
                        .to_lowercase()
                        .contains(&q)
            })
            .cloned()
            .collect();
        switches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        self.cached_filtered = switches;
    }

    fn filtered_switches(&self) -> &[Switch] {
        &self.cached_filtered
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let filtered_len = self.filtered_switches().len();
        let clamped = if filtered_len == 0 {
            0
        } else {
            idx.min(filtered_len - 1)
        };
        self.table_state.select(Some(clamped));
    }

    #[allow(clippy::cast_sign_loss, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) {
        let filtered_len = self.filtered_switches().len();
        if filtered_len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_possible_wrap)]
        let next = (current + delta).clamp(0, filtered_len as isize - 1);
        self.select(next as usize);
    }

    fn selected_switch(&self) -> Option<&Switch> {
        self.filtered_switches().get(self.selected_index())
    }

    // ── Detail rendering ────────────────────────────────────────

    #[allow(clippy::unused_self)]
    fn render_detail(&self, frame: &mut Frame, area: Rect, switch: &Switch) {
        let title = format!(" {}  \u{b7}  {}  \u{b7}  {} ", switch.name, switch.ip, switch.mac);
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height < 3 || inner.width < 20 {
            return;
        }

        let label = Style::default().fg(theme::DIM_TEXT);
        let value = Style::default().fg(theme::STEEL_BLUE);
        let accent = Style::default().fg(theme::COPPER);
        let on_style = Style::default().fg(theme::SIGNAL_GREEN);
        let off_style = Style::default().fg(theme::BORDER_GRAY);

        let placeholder = "\u{2500}";
        let build = switch.build_short_name.as_deref().unwrap_or(placeholder);
        let floor = switch
            .floor_number
            .map_or_else(|| placeholder.into(), |n| n.to_string());
        let uplink = if switch.up_switch_name.is_empty() {
            placeholder.to_string()
        } else {
            format!("{} port {}", switch.up_switch_name, switch.up_link)
        };
        let placement = match (switch.position_top, switch.position_left) {
            (Some(top), Some(left)) => format!("{left:.0},{top:.0}"),
            _ => "not placed".into(),
        };
        let revision = if switch.revision.is_empty() {
            placeholder
        } else {
            &switch.revision
        };
        let serial = if switch.serial.is_empty() {
            placeholder
        } else {
            &switch.serial
        };

        let flag_span = |v: bool| -> Span<'static> {
            if v {
                Span::styled("on".to_string(), on_style)
            } else {
                Span::styled("off".to_string(), off_style)
            }
        };

        let detail_layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  IP via         ", label),
                Span::styled(switch.ip_resolve_method.to_string(), value),
                Span::styled("       Community    ", label),
                Span::styled(switch.snmp_community.clone(), value),
            ]),
            Line::from(vec![
                Span::styled("  Uplink         ", label),
                Span::styled(uplink, accent),
                Span::styled("       Placement    ", label),
                Span::styled(placement, value),
            ]),
            Line::from(vec![
                Span::styled("  Building       ", label),
                Span::styled(build.to_string(), accent),
                Span::styled("       Floor        ", label),
                Span::styled(floor, accent),
            ]),
            Line::from(vec![
                Span::styled("  Revision       ", label),
                Span::styled(revision.to_string(), value),
                Span::styled("       Serial       ", label),
                Span::styled(serial.to_string(), value),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Net data       ", label),
                flag_span(switch.retrieve_from_net_data),
                Span::styled("       Seen uplinks ", label),
                flag_span(switch.retrieve_up_link_from_seens),
                Span::styled("       SNMP probe   ", label),
                flag_span(switch.retrieve_tech_data_from_snmp),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), detail_layout[0]);

        let hints = Line::from(vec![
            Span::styled("  e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("close", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), detail_layout[1]);
    }
}

impl Component for SwitchesScreen {
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
                let len = self.filtered_switches().len();
                if len > 0 {
                    self.select(len - 1);
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
            KeyCode::Enter => {
                if self.selected_switch().is_some() {
                    self.detail_open = !self.detail_open;
                }
                Ok(None)
            }
            KeyCode::Char('a') => Ok(Some(Action::OpenSwitchAdd {
                build: None,
                floor: None,
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
            Action::SwitchesLoaded(switches) => {
                self.switches = Arc::clone(switches);
                self.recompute_filtered();
                let filtered_len = self.filtered_switches().len();
                if filtered_len > 0 && self.selected_index() >= filtered_len {
                    self.select(filtered_len - 1);
                }
            }
            Action::SearchInput(query) => {
                self.search_query.clone_from(query);
                self.recompute_filtered();
                self.table_state.select(Some(0));
            }
            Action::CloseSearch => {
                self.search_query.clear();
                self.recompute_filtered();
            }
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let total = self.switches.len();
        let shown = self.filtered_switches().len();

        let title = if self.search_query.is_empty() {
            format!(" Switches ({shown}) ")
        } else {
            format!(" Switches ({shown}/{total}) [\"{}\"] ", self.search_query)
        };
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

        let (table_area, detail_area) = if self.detail_open {
            let chunks =
                Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(table_area);

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("IP").style(theme::table_header()),
            Cell::from("via").style(theme::table_header()),
            Cell::from("Building").style(theme::table_header()),
            Cell::from("Floor").style(theme::table_header()),
            Cell::from("Uplink").style(theme::table_header()),
            Cell::from("Revision").style(theme::table_header()),
        ]);

        let placeholder = "\u{2500}";
        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .filtered_switches()
            .iter()
            .enumerate()
            .map(|(i, sw)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "\u{25b8}" } else { " " };
                let row_style = if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };

                let name_style = Style::default()
                    .fg(theme::STEEL_BLUE)
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });

                let build = sw.build_short_name.as_deref().unwrap_or(placeholder);
                let floor = sw
                    .floor_number
                    .map_or_else(|| placeholder.into(), |n| n.to_string());
                let uplink = if sw.up_switch_name.is_empty() {
                    placeholder.to_string()
                } else {
                    format!("{} {}", sw.up_switch_name, sw.up_link)
                };
                let revision = if sw.revision.is_empty() {
                    placeholder
                } else {
                    &sw.revision
                };

                Row::new(vec![
                    Cell::from(format!("{prefix}{}", sw.name)).style(name_style),
                    Cell::from(sw.ip.clone()),
                    Cell::from(sw.ip_resolve_method.to_string()),
                    Cell::from(build.to_string()).style(Style::default().fg(theme::COPPER)),
                    Cell::from(floor),
                    Cell::from(uplink),
                    Cell::from(revision.to_string()),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Min(14),
            Constraint::Length(15),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Min(14),
            Constraint::Length(10),
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
            Span::styled("detail  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("add  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("/ ", theme::key_hint_key()),
            Span::styled("search", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);

        if let Some(detail_area) = detail_area {
            if let Some(switch) = self.selected_switch() {
                self.render_detail(frame, detail_area, switch);
            }
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "switches"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremap_core::IpResolveMethod;

    fn switch(name: &str, ip: &str, build: Option<&str>) -> Switch {
        Switch {
            name: name.into(),
            ip_resolve_method: IpResolveMethod::Dns,
            ip: ip.into(),
            mac: "00:11:22:33:44:55".into(),
            up_switch_name: String::new(),
            up_link: String::new(),
            snmp_community: "public".into(),
            revision: String::new(),
            serial: String::new(),
            build_short_name: build.map(Into::into),
            floor_number: None,
            retrieve_from_net_data: false,
            retrieve_up_link_from_seens: false,
            retrieve_tech_data_from_snmp: false,
            position_top: None,
            position_left: None,
        }
    }

    fn loaded(switches: Vec<Switch>) -> SwitchesScreen {
        let mut screen = SwitchesScreen::new();
        screen
            .update(&Action::SwitchesLoaded(Arc::new(switches)))
            .expect("update");
        screen
    }

    #[test]
    fn filter_matches_name_and_building() {
        let mut screen = loaded(vec![
            switch("core-a", "10.0.0.1", Some("hq")),
            switch("edge-b", "10.0.0.2", Some("lab")),
            switch("edge-c", "10.0.0.3", Some("hq")),
        ]);

        screen
            .update(&Action::SearchInput("edge".into()))
            .expect("update");
        assert_eq!(screen.filtered_switches().len(), 2);

        screen
            .update(&Action::SearchInput("HQ".into()))
            .expect("update");
        let names: Vec<_> = screen
            .filtered_switches()
            .iter()
            .map(|sw| sw.name.as_str())
            .collect();
        assert_eq!(names, vec!["core-a", "edge-c"]);
    }

    #[test]
    fn close_search_restores_full_list() {
        let mut screen = loaded(vec![
            switch("core-a", "10.0.0.1", None),
            switch("edge-b", "10.0.0.2", None),
        ]);

        screen
            .update(&Action::SearchInput("core".into()))
            .expect("update");
        assert_eq!(screen.filtered_switches().len(), 1);

        screen.update(&Action::CloseSearch).expect("update");
        assert_eq!(screen.filtered_switches().len(), 2);
    }

    #[test]
    fn reload_clamps_selection() {
        let mut screen = loaded(vec![
            switch("a", "10.0.0.1", None),
            switch("b", "10.0.0.2", None),
            switch("c", "10.0.0.3", None),
        ]);
        screen.select(2);

        screen
            .update(&Action::SwitchesLoaded(Arc::new(vec![switch(
                "a", "10.0.0.1", None,
            )])))
            .expect("update");
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn filtered_list_is_sorted_by_name() {
        let screen = loaded(vec![
            switch("zeta", "10.0.0.1", None),
            switch("Alpha", "10.0.0.2", None),
            switch("mid", "10.0.0.3", None),
        ]);
        let names: Vec<_> = screen
            .filtered_switches()
            .iter()
            .map(|sw| sw.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "mid", "zeta"]);
    }
}
