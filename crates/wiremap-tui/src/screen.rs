//! Screen identifiers and tab-bar ordering.

use std::fmt;

/// Every screen the console can show.
///
/// Only the entries in [`ScreenId::TABS`] appear in the tab bar; the
/// drill-in screens (floors of a building, one floor's plan) highlight
/// their parent tab, and Login replaces the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Login,
    Builds,
    Floors,
    FloorPlan,
    Switches,
    Topology,
}

impl ScreenId {
    /// Top-level tabs in display order.
    pub const TABS: [ScreenId; 3] = [Self::Builds, Self::Switches, Self::Topology];

    /// The tab a screen belongs under.
    pub fn tab(self) -> ScreenId {
        match self {
            Self::Login | Self::Builds | Self::Floors | Self::FloorPlan => Self::Builds,
            Self::Switches => Self::Switches,
            Self::Topology => Self::Topology,
        }
    }

    /// 1-indexed tab number as shown in the tab bar.
    pub fn number(self) -> usize {
        let tab = self.tab();
        Self::TABS
            .iter()
            .position(|candidate| *candidate == tab)
            .map_or(1, |idx| idx + 1)
    }

    /// Map a number key to a tab.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Builds),
            2 => Some(Self::Switches),
            3 => Some(Self::Topology),
            _ => None,
        }
    }

    /// Next tab in cycle order.
    pub fn next(self) -> Self {
        let idx = self.number() - 1;
        Self::TABS[(idx + 1) % Self::TABS.len()]
    }

    /// Previous tab in cycle order.
    pub fn prev(self) -> Self {
        let idx = self.number() - 1;
        Self::TABS[(idx + Self::TABS.len() - 1) % Self::TABS.len()]
    }

    /// Navigation path of the tab this screen belongs under.
    pub fn tab_path(self) -> &'static str {
        match self.tab() {
            Self::Switches => "/switches",
            Self::Topology => "/vis",
            _ => "/builds",
        }
    }

    /// Tab-bar label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Builds => "Buildings",
            Self::Floors => "Floors",
            Self::FloorPlan => "Floor Plan",
            Self::Switches => "Switches",
            Self::Topology => "Topology",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn number_keys_round_trip_through_tabs() {
        for (idx, tab) in ScreenId::TABS.iter().enumerate() {
            let n = u8::try_from(idx + 1).expect("tab count fits in u8");
            assert_eq!(ScreenId::from_number(n), Some(*tab));
            assert_eq!(tab.number(), idx + 1);
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(4), None);
    }

    #[test]
    fn drill_in_screens_highlight_the_buildings_tab() {
        assert_eq!(ScreenId::Floors.tab(), ScreenId::Builds);
        assert_eq!(ScreenId::FloorPlan.tab(), ScreenId::Builds);
        assert_eq!(ScreenId::Floors.number(), ScreenId::Builds.number());
    }

    #[test]
    fn tab_cycling_wraps_both_ways() {
        assert_eq!(ScreenId::Builds.next(), ScreenId::Switches);
        assert_eq!(ScreenId::Topology.next(), ScreenId::Builds);
        assert_eq!(ScreenId::Builds.prev(), ScreenId::Topology);
        // Cycling from a drill-in starts at its parent tab.
        assert_eq!(ScreenId::FloorPlan.next(), ScreenId::Switches);
    }

    #[test]
    fn tab_paths_match_the_route_table() {
        assert_eq!(ScreenId::Builds.tab_path(), "/builds");
        assert_eq!(ScreenId::Switches.tab_path(), "/switches");
        assert_eq!(ScreenId::Topology.tab_path(), "/vis");
        assert_eq!(ScreenId::Floors.tab_path(), "/builds");
    }
}
