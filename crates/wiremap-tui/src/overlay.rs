//! Editing state behind the form overlays.
//!
//! Each overlay is seeded from the matching core form draft when it
//! opens and stays purely textual while the operator types. `Enter`
//! asks `build_submission` for the typed value set; parse problems come
//! back as a message for the error line instead of a submission.

use wiremap_core::form::{FloorDraft, FloorSubmission, SwitchDraft, SwitchSubmission};
use wiremap_core::model::IpResolveMethod;

fn toggle_label(v: bool) -> String {
    if v { "On".into() } else { "Off".into() }
}

// ── Switch overlay ───────────────────────────────────────────────────

pub struct SwitchOverlay {
    pub name: String,
    pub resolve: IpResolveMethod,
    pub ip: String,
    pub mac: String,
    pub up_switch: String,
    pub up_link: String,
    pub snmp_community: String,
    pub revision: String,
    pub serial: String,
    pub build: String,
    pub floor: String,
    pub net_data: bool,
    pub seen_uplinks: bool,
    pub snmp_probe: bool,
    /// Which field is currently focused (0-indexed).
    pub field_idx: usize,
    /// Renaming is not supported while editing, so the name field is
    /// frozen then.
    pub name_locked: bool,
    pub error: Option<String>,
}

impl SwitchOverlay {
    pub const FIELD_COUNT: usize = 14;

    pub fn from_draft(draft: &SwitchDraft, name_locked: bool) -> Self {
        Self {
            name: draft.name.clone(),
            resolve: draft.ip_resolve_method,
            ip: draft.ip.clone(),
            mac: draft.mac.clone(),
            up_switch: draft.up_switch_name.clone(),
            up_link: draft.up_link.clone(),
            snmp_community: draft.snmp_community.clone(),
            revision: draft.revision.clone(),
            serial: draft.serial.clone(),
            build: draft.build_short_name.clone().unwrap_or_default(),
            floor: draft.floor_number.map_or_else(String::new, |n| n.to_string()),
            net_data: draft.retrieve_from_net_data,
            seen_uplinks: draft.retrieve_up_link_from_seens,
            snmp_probe: draft.retrieve_tech_data_from_snmp,
            field_idx: 0,
            name_locked,
            error: None,
        }
    }

    pub fn field_label(idx: usize) -> &'static str {
        match idx {
            0 => "Name",
            1 => "IP via",
            2 => "IP address",
            3 => "MAC",
            4 => "Uplink switch",
            5 => "Uplink port",
            6 => "SNMP community",
            7 => "Revision",
            8 => "Serial",
            9 => "Building",
            10 => "Floor",
            11 => "Net data",
            12 => "Seen uplinks",
            13 => "SNMP probe",
            _ => "",
        }
    }

    pub fn field_value(&self, idx: usize) -> String {
        match idx {
            0 => self.name.clone(),
            1 => self.resolve.to_string(),
            2 => self.ip.clone(),
            3 => self.mac.clone(),
            4 => self.up_switch.clone(),
            5 => self.up_link.clone(),
            6 => self.snmp_community.clone(),
            7 => self.revision.clone(),
            8 => self.serial.clone(),
            9 => self.build.clone(),
            10 => self.floor.clone(),
            11 => toggle_label(self.net_data),
            12 => toggle_label(self.seen_uplinks),
            13 => toggle_label(self.snmp_probe),
            _ => String::new(),
        }
    }

    pub fn is_toggle_field(idx: usize) -> bool {
        matches!(idx, 1 | 11..=13)
    }

    pub fn toggle(&mut self) {
        match self.field_idx {
            1 => {
                self.resolve = match self.resolve {
                    IpResolveMethod::Dns => IpResolveMethod::Direct,
                    IpResolveMethod::Direct => IpResolveMethod::Dns,
                };
            }
            11 => self.net_data = !self.net_data,
            12 => self.seen_uplinks = !self.seen_uplinks,
            13 => self.snmp_probe = !self.snmp_probe,
            _ => {}
        }
    }

    pub fn next_field(&mut self) {
        self.field_idx = (self.field_idx + 1) % Self::FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.field_idx = if self.field_idx == 0 {
            Self::FIELD_COUNT - 1
        } else {
            self.field_idx - 1
        };
    }

    pub fn handle_text_input(&mut self, ch: char) {
        match self.field_idx {
            0 if !self.name_locked => self.name.push(ch),
            2 => self.ip.push(ch),
            3 => self.mac.push(ch),
            4 => self.up_switch.push(ch),
            5 => self.up_link.push(ch),
            6 => self.snmp_community.push(ch),
            7 => self.revision.push(ch),
            8 => self.serial.push(ch),
            9 => self.build.push(ch),
            10 if ch.is_ascii_digit() || (ch == '-' && self.floor.is_empty()) => {
                self.floor.push(ch);
            }
            _ => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        match self.field_idx {
            0 if !self.name_locked => {
                self.name.pop();
            }
            2 => {
                self.ip.pop();
            }
            3 => {
                self.mac.pop();
            }
            4 => {
                self.up_switch.pop();
            }
            5 => {
                self.up_link.pop();
            }
            6 => {
                self.snmp_community.pop();
            }
            7 => {
                self.revision.pop();
            }
            8 => {
                self.serial.pop();
            }
            9 => {
                self.build.pop();
            }
            10 => {
                self.floor.pop();
            }
            _ => {}
        }
    }

    /// Assemble the typed fields into the value set a submission needs.
    pub fn build_submission(&self) -> Result<SwitchSubmission, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("switch name is required".into());
        }

        let floor = self.floor.trim();
        let floor_number = if floor.is_empty() {
            None
        } else {
            Some(
                floor
                    .parse::<i32>()
                    .map_err(|_| "floor must be a whole number".to_owned())?,
            )
        };

        let build = self.build.trim();
        let build_short_name = if build.is_empty() {
            None
        } else {
            Some(build.to_owned())
        };

        Ok(SwitchSubmission {
            name: name.to_owned(),
            ip_resolve_method: self.resolve,
            ip: self.ip.clone(),
            mac: self.mac.clone(),
            up_switch_name: self.up_switch.clone(),
            up_link: self.up_link.clone(),
            snmp_community: self.snmp_community.clone(),
            revision: self.revision.clone(),
            serial: self.serial.clone(),
            build_short_name,
            floor_number,
            retrieve_from_net_data: self.net_data,
            retrieve_up_link_from_seens: self.seen_uplinks,
            retrieve_tech_data_from_snmp: self.snmp_probe,
        })
    }
}

// ── Floor overlay ────────────────────────────────────────────────────

pub struct FloorOverlay {
    pub number: String,
    pub build_name: String,
    pub build_addr: String,
    /// Which field is currently focused (0-indexed).
    pub field_idx: usize,
    pub error: Option<String>,
}

impl FloorOverlay {
    pub const FIELD_COUNT: usize = 3;

    pub fn from_draft(draft: &FloorDraft) -> Self {
        Self {
            number: draft.number.clone(),
            build_name: draft.build_name.clone(),
            build_addr: draft.build_addr.clone(),
            field_idx: 0,
            error: None,
        }
    }

    pub fn field_label(idx: usize) -> &'static str {
        match idx {
            0 => "Floor number",
            1 => "Building",
            2 => "Address",
            _ => "",
        }
    }

    pub fn field_value(&self, idx: usize) -> String {
        match idx {
            0 => self.number.clone(),
            1 => self.build_name.clone(),
            2 => self.build_addr.clone(),
            _ => String::new(),
        }
    }

    pub fn next_field(&mut self) {
        self.field_idx = (self.field_idx + 1) % Self::FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.field_idx = if self.field_idx == 0 {
            Self::FIELD_COUNT - 1
        } else {
            self.field_idx - 1
        };
    }

    pub fn handle_text_input(&mut self, ch: char) {
        match self.field_idx {
            0 if ch.is_ascii_digit() || (ch == '-' && self.number.is_empty()) => {
                self.number.push(ch);
            }
            1 => self.build_name.push(ch),
            2 => self.build_addr.push(ch),
            _ => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        match self.field_idx {
            0 => {
                self.number.pop();
            }
            1 => {
                self.build_name.pop();
            }
            2 => {
                self.build_addr.pop();
            }
            _ => {}
        }
    }

    /// Assemble the typed fields into the value set a submission needs.
    pub fn build_submission(&self) -> Result<FloorSubmission, String> {
        let number = self
            .number
            .trim()
            .parse::<i32>()
            .map_err(|_| "floor number must be a whole number".to_owned())?;

        let build_name = self.build_name.trim();
        if build_name.is_empty() {
            return Err("building name is required".into());
        }

        Ok(FloorSubmission {
            number,
            build_name: build_name.to_owned(),
            build_addr: self.build_addr.trim().to_owned(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn switch_draft() -> SwitchDraft {
        SwitchDraft {
            name: "sw-b1-3-01".into(),
            ip_resolve_method: IpResolveMethod::Dns,
            ip: "10.20.3.1".into(),
            mac: "aa:bb:cc:dd:ee:01".into(),
            up_switch_name: "core-01".into(),
            up_link: "Gi1/0/48".into(),
            snmp_community: "public".into(),
            revision: "15.2(7)E3".into(),
            serial: "FOC2331X0GK".into(),
            build_short_name: Some("B1".into()),
            floor_number: Some(3),
            retrieve_from_net_data: true,
            retrieve_up_link_from_seens: false,
            retrieve_tech_data_from_snmp: true,
            position_top: Some(12.0),
            position_left: Some(40.0),
        }
    }

    #[test]
    fn switch_overlay_seeds_from_the_draft() {
        let overlay = SwitchOverlay::from_draft(&switch_draft(), true);

        assert_eq!(overlay.name, "sw-b1-3-01");
        assert_eq!(overlay.build, "B1");
        assert_eq!(overlay.floor, "3");
        assert!(overlay.net_data);
        assert!(!overlay.seen_uplinks);
        assert_eq!(overlay.field_idx, 0);
        assert!(overlay.name_locked);
    }

    #[test]
    fn unplaced_draft_seeds_empty_placement_fields() {
        let overlay = SwitchOverlay::from_draft(&SwitchDraft::default(), false);

        assert_eq!(overlay.build, "");
        assert_eq!(overlay.floor, "");
    }

    #[test]
    fn field_cycling_wraps_both_ways() {
        let mut overlay = SwitchOverlay::from_draft(&SwitchDraft::default(), false);

        overlay.prev_field();
        assert_eq!(overlay.field_idx, SwitchOverlay::FIELD_COUNT - 1);
        overlay.next_field();
        assert_eq!(overlay.field_idx, 0);
    }

    #[test]
    fn toggle_flips_the_resolve_method_and_retrieval_fields() {
        let mut overlay = SwitchOverlay::from_draft(&SwitchDraft::default(), false);

        overlay.field_idx = 1;
        overlay.toggle();
        assert_eq!(overlay.resolve, IpResolveMethod::Direct);
        overlay.toggle();
        assert_eq!(overlay.resolve, IpResolveMethod::Dns);

        overlay.field_idx = 11;
        overlay.toggle();
        assert!(overlay.net_data);

        // Text fields are not toggleable.
        overlay.field_idx = 2;
        assert!(!SwitchOverlay::is_toggle_field(overlay.field_idx));
    }

    #[test]
    fn floor_field_accepts_digits_and_a_leading_minus_only() {
        let mut overlay = SwitchOverlay::from_draft(&SwitchDraft::default(), false);
        overlay.field_idx = 10;

        overlay.handle_text_input('-');
        overlay.handle_text_input('2');
        overlay.handle_text_input('x');
        overlay.handle_text_input('-');

        assert_eq!(overlay.floor, "-2");
    }

    #[test]
    fn locked_name_ignores_typing_and_backspace() {
        let mut overlay = SwitchOverlay::from_draft(&switch_draft(), true);
        overlay.field_idx = 0;

        overlay.handle_text_input('x');
        overlay.handle_backspace();

        assert_eq!(overlay.name, "sw-b1-3-01");
    }

    #[test]
    fn submission_maps_typed_fields_and_blank_placement_to_none() {
        let mut overlay = SwitchOverlay::from_draft(&switch_draft(), false);
        overlay.build.clear();
        overlay.floor.clear();

        let sub = overlay.build_submission().expect("valid submission");

        assert_eq!(sub.name, "sw-b1-3-01");
        assert_eq!(sub.build_short_name, None);
        assert_eq!(sub.floor_number, None);
        assert_eq!(sub.ip_resolve_method, IpResolveMethod::Dns);
        assert!(sub.retrieve_from_net_data);
    }

    #[test]
    fn submission_rejects_an_empty_name() {
        let mut overlay = SwitchOverlay::from_draft(&SwitchDraft::default(), false);
        overlay.ip = "10.0.0.1".into();

        let err = overlay.build_submission().expect_err("name missing");
        assert_eq!(err, "switch name is required");
    }

    #[test]
    fn submission_rejects_unparseable_floor_text() {
        let mut overlay = SwitchOverlay::from_draft(&SwitchDraft::default(), false);
        overlay.name = "sw-new".into();
        overlay.floor = "-".into();

        let err = overlay.build_submission().expect_err("bad floor");
        assert_eq!(err, "floor must be a whole number");
    }

    #[test]
    fn floor_overlay_parses_the_number_and_requires_a_building() {
        let mut overlay = FloorOverlay::from_draft(&FloorDraft {
            number: String::new(),
            build_name: "Building One".into(),
            build_addr: "1 Main St".into(),
        });
        overlay.field_idx = 0;
        overlay.handle_text_input('-');
        overlay.handle_text_input('1');

        let sub = overlay.build_submission().expect("valid submission");
        assert_eq!(sub.number, -1);
        assert_eq!(sub.build_name, "Building One");
        assert_eq!(sub.build_addr, "1 Main St");

        let blank = FloorOverlay::from_draft(&FloorDraft::default());
        let err = blank.build_submission().expect_err("number missing");
        assert_eq!(err, "floor number must be a whole number");

        let mut no_build = FloorOverlay::from_draft(&FloorDraft::default());
        no_build.number = "2".into();
        let err = no_build.build_submission().expect_err("building missing");
        assert_eq!(err, "building name is required");
    }
}
