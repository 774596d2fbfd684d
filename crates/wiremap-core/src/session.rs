//! Session authentication state.
//!
//! The route guard consumes authentication through the narrow
//! [`SessionQuery`] capability so it can be exercised without a live
//! backend. [`SessionState`] is the in-memory implementation the
//! console shares between the guard and the [`Inventory`] facade.
//!
//! [`Inventory`]: crate::inventory::Inventory

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Answers "is a valid session currently established?".
///
/// A pure query: implementations must answer instantly from
/// already-resolved state and never issue a network round trip. The
/// guard calls this on every navigation attempt.
pub trait SessionQuery {
    fn is_authenticated(&self) -> bool;
}

/// Shared in-memory session flag, flipped by login and logout outcomes
/// (and cleared when the service reports the cookie expired).
#[derive(Debug, Default)]
pub struct SessionState {
    authenticated: AtomicBool,
}

impl SessionState {
    /// A fresh, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a login or logout outcome.
    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::Release);
    }
}

impl SessionQuery for SessionState {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }
}

impl<T: SessionQuery + ?Sized> SessionQuery for Arc<T> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

impl<T: SessionQuery + ?Sized> SessionQuery for &T {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
