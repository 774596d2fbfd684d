//! Screen implementations. Each screen is a top-level Component.

pub mod builds;
pub mod floor_plan;
pub mod floors;
pub mod login;
pub mod switches;
pub mod topology;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create every routed screen component. The login screen takes the
/// configured username so a half-configured setup still saves typing.
pub fn create_screens(login_user: Option<String>) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Login,
            Box::new(login::LoginScreen::new(login_user)),
        ),
        (ScreenId::Builds, Box::new(builds::BuildsScreen::new())),
        (ScreenId::Floors, Box::new(floors::FloorsScreen::new())),
        (
            ScreenId::FloorPlan,
            Box::new(floor_plan::FloorPlanScreen::new()),
        ),
        (
            ScreenId::Switches,
            Box::new(switches::SwitchesScreen::new()),
        ),
        (
            ScreenId::Topology,
            Box::new(topology::TopologyScreen::new()),
        ),
    ]
}
