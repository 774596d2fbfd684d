//! Seams to the entity mutation API.
//!
//! The form controllers issue create and update calls through these
//! traits rather than the concrete HTTP client, so submission logic can
//! be exercised against recording fakes. [`Inventory`] provides the
//! production implementations.
//!
//! [`Inventory`]: crate::inventory::Inventory

use std::future::Future;

use wiremap_api::types::{FloorPayload, SwitchPayload};

use crate::error::CoreError;

/// Create and update operations for switch records.
pub trait SwitchMutations {
    /// Create a new switch record.
    fn create_switch(
        &self,
        payload: &SwitchPayload,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Replace an existing switch record, addressed by the payload name.
    fn update_switch(
        &self,
        payload: &SwitchPayload,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Create operations for floor records. Floors have no update path;
/// they are created and deleted whole.
pub trait FloorMutations {
    /// Create a new floor on a building.
    fn create_floor(
        &self,
        payload: &FloorPayload,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
