// ── Domain model ──
//
// The wire records from `wiremap-api` ARE the domain model for this
// system; no separate internal representation exists. Re-exported flat
// so consumers depend on `wiremap_core::model` alone.

pub use wiremap_api::types::{
    Build, Floor, FloorPayload, IpResolveMethod, Switch, SwitchPayload, SwitchScope,
};
