// Wire types for the inventory service.
//
// Field names follow the service's JSON casing: camelCase, with the
// literal `SNMP` run in `retrieveTechDataFromSNMP`. Records are what the
// list endpoints return; payloads are the create/update request bodies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A building in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Routing identifier, used in paths and in switch placement.
    pub short_name: String,
    pub name: String,
    pub addr: String,
}

/// A floor of a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub number: i32,
    pub build_name: String,
    pub build_addr: String,
}

/// How a switch's IP address is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpResolveMethod {
    #[default]
    #[serde(rename = "DNS")]
    Dns,
    Direct,
}

impl fmt::Display for IpResolveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dns => f.write_str("DNS"),
            Self::Direct => f.write_str("Direct"),
        }
    }
}

/// A network switch record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    /// Unique identifier, immutable once created.
    pub name: String,
    pub ip_resolve_method: IpResolveMethod,
    pub ip: String,
    pub mac: String,
    pub up_switch_name: String,
    pub up_link: String,
    pub snmp_community: String,
    pub revision: String,
    pub serial: String,
    #[serde(default)]
    pub build_short_name: Option<String>,
    #[serde(default)]
    pub floor_number: Option<i32>,
    pub retrieve_from_net_data: bool,
    pub retrieve_up_link_from_seens: bool,
    #[serde(rename = "retrieveTechDataFromSNMP")]
    pub retrieve_tech_data_from_snmp: bool,
    /// Floor-plan coordinates. Set when the switch is placed on a plan,
    /// never edited through the form, and omitted from JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_left: Option<f64>,
}

/// Request body for switch create and update.
///
/// Same shape as [`Switch`]; placement fields stay nullable on the wire,
/// the position pair is present only when the caller carries one over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPayload {
    pub name: String,
    pub ip_resolve_method: IpResolveMethod,
    pub ip: String,
    pub mac: String,
    pub up_switch_name: String,
    pub up_link: String,
    pub snmp_community: String,
    pub revision: String,
    pub serial: String,
    pub build_short_name: Option<String>,
    pub floor_number: Option<i32>,
    pub retrieve_from_net_data: bool,
    pub retrieve_up_link_from_seens: bool,
    #[serde(rename = "retrieveTechDataFromSNMP")]
    pub retrieve_tech_data_from_snmp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_left: Option<f64>,
}

/// Request body for floor creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPayload {
    pub number: i32,
    pub build_name: String,
    pub build_addr: String,
}

/// Scope of a switch listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchScope {
    /// Every switch in the inventory.
    All,
    /// Switches placed on one floor of one building.
    Floor { build: String, floor: i32 },
}
