//! Topology screen. Uplink hierarchy of every switch, rendered as a
//! tree with a detail panel for the selected node.

use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use wiremap_core::Switch;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

// ── Tree node ────────────────────────────────────────────────────────

struct TreeNode {
    switch_idx: usize,
    depth: u32,
    is_last_child: bool,
}

pub struct TopologyScreen {
    focused: bool,
    switches: Arc<Vec<Switch>>,
    scroll_offset: usize,
    selected_idx: usize,
    /// Flat node list in render order (pre-order DFS).
    nodes: Vec<TreeNode>,
}

impl TopologyScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            switches: Arc::new(Vec::new()),
            scroll_offset: 0,
            selected_idx: 0,
            nodes: Vec::new(),
        }
    }

    /// Rebuild the tree from the current switch list.
    fn rebuild_tree(&mut self) {
        let switches = &self.switches;
        if switches.is_empty() {
            self.nodes.clear();
            return;
        }

        // Map name → switch index for uplink resolution.
        let name_to_idx: HashMap<&str, usize> = switches
            .iter()
            .enumerate()
            .map(|(i, sw)| (sw.name.as_str(), i))
            .collect();

        // parent_of[child_idx] = parent_idx
        let mut parent_of: HashMap<usize, usize> = HashMap::new();
        let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();

        for (i, sw) in switches.iter().enumerate() {
            if sw.up_switch_name.is_empty() {
                continue;
            }
            if let Some(&parent_idx) = name_to_idx.get(sw.up_switch_name.as_str()) {
                if parent_idx != i {
                    parent_of.insert(i, parent_idx);
                    children_of.entry(parent_idx).or_default().push(i);
                }
            }
        }

        // Roots = switches with no known parent, sorted by name
        let mut root_idxs: Vec<usize> = (0..switches.len())
            .filter(|i| !parent_of.contains_key(i))
            .collect();
        root_idxs.sort_by(|&a, &b| switches[a].name.cmp(&switches[b].name));

        // Pre-order DFS to build flat node list
        let mut nodes: Vec<TreeNode> = Vec::with_capacity(switches.len());
        let mut stack: Vec<(usize, u32)> = Vec::new();
        let mut visited = vec![false; switches.len()];

        for &root_idx in root_idxs.iter().rev() {
            stack.push((root_idx, 0));
        }

        loop {
            while let Some((sw_idx, depth)) = stack.pop() {
                if visited[sw_idx] {
                    continue;
                }
                visited[sw_idx] = true;

                nodes.push(TreeNode {
                    switch_idx: sw_idx,
                    depth,
                    is_last_child: false, // computed below
                });

                if let Some(kids) = children_of.get(&sw_idx) {
                    let mut sorted_kids = kids.clone();
                    sorted_kids.sort_by(|&a, &b| switches[a].name.cmp(&switches[b].name));
                    for &kid in sorted_kids.iter().rev() {
                        stack.push((kid, depth + 1));
                    }
                }
            }

            // Uplink cycles never reach a root; sweep members in as
            // extra roots so every switch shows up exactly once.
            match visited.iter().position(|v| !v) {
                Some(idx) => stack.push((idx, 0)),
                None => break,
            }
        }

        // Compute is_last_child from the flat list
        let len = nodes.len();
        for i in 0..len {
            let d = nodes[i].depth;
            let mut is_last = true;
            for j in (i + 1)..len {
                if nodes[j].depth == d {
                    is_last = false;
                    break;
                }
                if nodes[j].depth < d {
                    break;
                }
            }
            nodes[i].is_last_child = is_last;
        }

        self.nodes = nodes;

        if self.selected_idx >= self.nodes.len() {
            self.selected_idx = self.nodes.len().saturating_sub(1);
        }
    }

    /// Adjust `scroll_offset` so the selected node is visible.
    fn ensure_visible(&mut self, viewport_height: usize) {
        if self.selected_idx < self.scroll_offset {
            self.scroll_offset = self.selected_idx;
        } else if self.selected_idx + 1 > self.scroll_offset + viewport_height {
            self.scroll_offset = (self.selected_idx + 1).saturating_sub(viewport_height);
        }
    }

    fn selected_switch(&self) -> Option<&Switch> {
        self.nodes
            .get(self.selected_idx)
            .map(|node| &self.switches[node.switch_idx])
    }

    /// Tree guide prefix spans for one node line.
    fn guide_prefix<'a>(
        guides: &[bool],
        depth: usize,
        is_last_child: bool,
        guide_style: Style,
    ) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        let connector_depth = depth.saturating_sub(1);

        for l in 0..connector_depth {
            let ch = if guides.get(l).copied().unwrap_or(false) {
                "\u{2502}   "
            } else {
                "    "
            };
            spans.push(Span::styled(ch.to_string(), guide_style));
        }
        if depth > 0 {
            let ch = if is_last_child {
                "\u{2514}\u{2500}\u{2500} "
            } else {
                "\u{251c}\u{2500}\u{2500} "
            };
            spans.push(Span::styled(ch.to_string(), guide_style));
        }
        spans
    }

    fn render_right_panel(&self, frame: &mut Frame, area: Rect) {
        let Some(switch) = self.selected_switch() else {
            return;
        };

        let block = Block::default()
            .title(format!(" {} ", switch.name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height < 2 || inner.width < 10 {
            return;
        }

        let label = Style::default().fg(theme::BORDER_GRAY);
        let val = Style::default().fg(theme::STEEL_BLUE);

        let placeholder = "\u{2500}";
        let build = switch.build_short_name.as_deref().unwrap_or(placeholder);
        let floor = switch
            .floor_number
            .map_or_else(|| placeholder.into(), |n| n.to_string());
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
        let uplink = if switch.up_switch_name.is_empty() {
            placeholder.to_string()
        } else {
            format!("{} port {}", switch.up_switch_name, switch.up_link)
        };

        let mut lines: Vec<Line<'_>> = vec![
            Line::from(vec![
                Span::styled(" IP       ", label),
                Span::styled(switch.ip.clone(), val),
                Span::styled("  via ", label),
                Span::styled(switch.ip_resolve_method.to_string(), val),
            ]),
            Line::from(vec![
                Span::styled(" MAC      ", label),
                Span::styled(switch.mac.clone(), val),
            ]),
            Line::from(vec![
                Span::styled(" Uplink   ", label),
                Span::styled(uplink, Style::default().fg(theme::COPPER)),
            ]),
            Line::from(vec![
                Span::styled(" Location ", label),
                Span::styled(
                    format!("{build} floor {floor}"),
                    Style::default().fg(theme::COPPER),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Revision ", label),
                Span::styled(revision.to_string(), val),
                Span::styled("  Serial ", label),
                Span::styled(serial.to_string(), val),
            ]),
            Line::from(""),
        ];

        // Direct downstream switches
        let downstream: Vec<&Switch> = self
            .switches
            .iter()
            .filter(|sw| sw.up_switch_name == switch.name && sw.name != switch.name)
            .collect();

        lines.push(Line::from(Span::styled(
            format!(" Downstream ({})", downstream.len()),
            Style::default()
                .fg(theme::STEEL_BLUE)
                .add_modifier(Modifier::BOLD),
        )));

        if downstream.is_empty() {
            lines.push(Line::from(Span::styled(
                "   (none)",
                Style::default().fg(theme::BORDER_GRAY),
            )));
        } else {
            for kid in downstream {
                lines.push(Line::from(vec![
                    Span::styled("   ", label),
                    Span::styled(kid.name.clone(), val),
                    Span::styled(
                        format!("  port {}", kid.up_link),
                        Style::default().fg(theme::DIM_TEXT),
                    ),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for TopologyScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.nodes.is_empty() {
                    self.selected_idx = (self.selected_idx + 1).min(self.nodes.len() - 1);
                    self.ensure_visible(30);
                }
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_idx = self.selected_idx.saturating_sub(1);
                self.ensure_visible(30);
                Ok(None)
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected_idx = 0;
                self.scroll_offset = 0;
                Ok(None)
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected_idx = self.nodes.len().saturating_sub(1);
                self.ensure_visible(30);
                Ok(None)
            }
            KeyCode::Char('e') => Ok(self
                .selected_switch()
                .map(|sw| Action::OpenSwitchEdit(Box::new(sw.clone())))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SwitchesLoaded(switches) => {
                self.switches = Arc::clone(switches);
                self.rebuild_tree();
            }
            _ => {}
        }
        Ok(None)
    }

    #[allow(clippy::too_many_lines, clippy::as_conversions)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Topology \u{b7} {} switches ", self.switches.len()))
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

        if inner.height < 3 || inner.width < 20 {
            return;
        }

        let chunks =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(inner);
        let tree_area = chunks[0];
        let right_area = chunks[1];

        let content_area = Rect {
            x: tree_area.x,
            y: tree_area.y,
            width: tree_area.width,
            height: tree_area.height.saturating_sub(1),
        };
        let hints_area = Rect {
            x: tree_area.x,
            y: tree_area.y + tree_area.height.saturating_sub(1),
            width: tree_area.width,
            height: 1,
        };

        if self.nodes.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No switches found",
                Style::default().fg(theme::BORDER_GRAY),
            )));
            frame.render_widget(empty, content_area);
        } else {
            let mut lines: Vec<Line<'_>> = Vec::new();
            let guide_style = Style::default().fg(theme::BORDER_GRAY);

            // Track which depth levels have more siblings coming
            let mut guides: Vec<bool> = Vec::new();

            for (node_idx, node) in self.nodes.iter().enumerate() {
                let sw = &self.switches[node.switch_idx];
                let d = node.depth as usize;
                let is_selected = node_idx == self.selected_idx;

                while guides.len() < d {
                    guides.push(false);
                }
                guides.truncate(d);
                if d > 0 {
                    if guides.len() < d {
                        guides.resize(d, false);
                    }
                    guides[d - 1] = !node.is_last_child;
                }

                let mut spans =
                    Self::guide_prefix(&guides, d, node.is_last_child, guide_style);

                if is_selected {
                    spans.push(Span::styled(
                        "\u{25b8} ",
                        Style::default()
                            .fg(theme::COPPER)
                            .add_modifier(Modifier::BOLD),
                    ));
                } else {
                    spans.push(Span::raw("  "));
                }

                let name_color = if d == 0 {
                    theme::COPPER
                } else {
                    theme::STEEL_BLUE
                };
                spans.push(Span::styled(
                    sw.name.clone(),
                    Style::default().fg(name_color).add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ));

                if !sw.ip.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", sw.ip),
                        Style::default().fg(theme::DIM_TEXT),
                    ));
                }
                if d > 0 && !sw.up_link.is_empty() {
                    spans.push(Span::styled(
                        format!("  port {}", sw.up_link),
                        Style::default().fg(theme::BORDER_GRAY),
                    ));
                }

                lines.push(Line::from(spans));
            }

            let viewport_h = content_area.height as usize;
            let scroll = self
                .scroll_offset
                .min(lines.len().saturating_sub(viewport_h));
            let visible: Vec<Line<'_>> =
                lines.into_iter().skip(scroll).take(viewport_h).collect();

            frame.render_widget(Paragraph::new(visible), content_area);
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("g/G ", theme::key_hint_key()),
            Span::styled("top/bottom  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);

        self.render_right_panel(frame, right_area);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "topology"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremap_core::IpResolveMethod;

    fn switch(name: &str, uplink: &str) -> Switch {
        Switch {
            name: name.into(),
            ip_resolve_method: IpResolveMethod::Dns,
            ip: "10.0.0.1".into(),
            mac: "00:11:22:33:44:55".into(),
            up_switch_name: uplink.into(),
            up_link: String::new(),
            snmp_community: "public".into(),
            revision: String::new(),
            serial: String::new(),
            build_short_name: None,
            floor_number: None,
            retrieve_from_net_data: false,
            retrieve_up_link_from_seens: false,
            retrieve_tech_data_from_snmp: false,
            position_top: None,
            position_left: None,
        }
    }

    fn loaded(switches: Vec<Switch>) -> TopologyScreen {
        let mut screen = TopologyScreen::new();
        screen
            .update(&Action::SwitchesLoaded(Arc::new(switches)))
            .expect("update");
        screen
    }

    fn flat_names(screen: &TopologyScreen) -> Vec<(&str, u32)> {
        screen
            .nodes
            .iter()
            .map(|n| (screen.switches[n.switch_idx].name.as_str(), n.depth))
            .collect()
    }

    #[test]
    fn children_nest_under_their_uplink() {
        let screen = loaded(vec![
            switch("edge-b", "core"),
            switch("core", ""),
            switch("edge-a", "core"),
        ]);
        assert_eq!(
            flat_names(&screen),
            vec![("core", 0), ("edge-a", 1), ("edge-b", 1)]
        );

        let last_flags: Vec<bool> = screen.nodes.iter().map(|n| n.is_last_child).collect();
        assert_eq!(last_flags, vec![true, false, true]);
    }

    #[test]
    fn unknown_uplink_becomes_root() {
        let screen = loaded(vec![switch("floater", "ghost")]);
        assert_eq!(flat_names(&screen), vec![("floater", 0)]);
    }

    #[test]
    fn self_uplink_is_ignored() {
        let screen = loaded(vec![switch("loner", "loner")]);
        assert_eq!(flat_names(&screen), vec![("loner", 0)]);
    }

    #[test]
    fn uplink_cycle_members_appear_exactly_once() {
        let screen = loaded(vec![
            switch("a", "b"),
            switch("b", "a"),
            switch("island", ""),
        ]);

        let mut names: Vec<&str> = flat_names(&screen).into_iter().map(|(n, _)| n).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b", "island"]);
    }

    #[test]
    fn deep_chain_increments_depth() {
        let screen = loaded(vec![
            switch("root", ""),
            switch("mid", "root"),
            switch("leaf", "mid"),
        ]);
        assert_eq!(
            flat_names(&screen),
            vec![("root", 0), ("mid", 1), ("leaf", 2)]
        );
    }
}
