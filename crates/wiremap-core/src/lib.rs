//! Business logic for the wiremap admin console.
//!
//! This crate owns the state machines that sit between [`wiremap_api`]
//! and the frontend:
//!
//! - **[`SwitchForm`] / [`FloorForm`]** -- entity form lifecycle
//!   controllers built on one generic [`FormState`]: mode-dependent
//!   draft seeding, explicit typed submissions, an in-flight guard
//!   against re-entrant mutations, and close-resets-everything.
//!
//! - **[`RouteTable`] / [`AccessGuard`]** -- the declarative route
//!   table and the pre-navigation hook that decides allow,
//!   bounce-to-login, or bounce-to-landing from the synchronous
//!   [`SessionQuery`] capability.
//!
//! - **[`Inventory`]** -- facade over the HTTP client: session
//!   establishment, list and delete operations, error translation,
//!   and the mutation seams the forms submit through.
//!
//! Nothing here draws a screen or reads a key; the frontend crate
//! drives these types and renders their state.

pub mod error;
pub mod form;
pub mod inventory;
pub mod model;
pub mod mutation;
pub mod route;
pub mod session;

// ── Primary re-exports ───────────────────────────────────────────────

// Errors
pub use error::CoreError;

// Forms
pub use form::{
    FloorDraft, FloorForm, FloorSubmission, FormMode, FormState, SwitchCall, SwitchDraft,
    SwitchForm, SwitchSubmission,
};

// Routing
pub use route::{
    AccessGuard, LANDING_PATH, LOGIN_PATH, ResolvedRoute, Route, RouteDecision, RouteMeta,
    RouteTable,
};

// Session & services
pub use inventory::Inventory;
pub use mutation::{FloorMutations, SwitchMutations};
pub use session::{SessionQuery, SessionState};
pub use wiremap_api::InventoryClient;

// Domain records (from the API layer)
pub use model::{Build, Floor, FloorPayload, IpResolveMethod, Switch, SwitchPayload, SwitchScope};
