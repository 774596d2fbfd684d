//! Route table and access guard.
//!
//! Every navigation attempt resolves a concrete path against the
//! declarative [`RouteTable`], then passes through [`AccessGuard`]
//! before a screen may mount. The guard never suspends: it consults
//! the session through the synchronous [`SessionQuery`] capability and
//! decides from route metadata alone.

use crate::session::SessionQuery;

/// Path of the login route.
pub const LOGIN_PATH: &str = "/login";
/// Default landing path for authenticated users.
pub const LANDING_PATH: &str = "/builds";

// ── Route table ──────────────────────────────────────────────────────

/// Declarative annotations consumed by the guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Only reachable with an established session.
    pub requires_auth: bool,
    /// Pointless once authenticated (the login screen).
    pub skip_if_auth: bool,
}

impl RouteMeta {
    pub const NONE: Self = Self {
        requires_auth: false,
        skip_if_auth: false,
    };
    pub const REQUIRES_AUTH: Self = Self {
        requires_auth: true,
        skip_if_auth: false,
    };
    pub const SKIP_IF_AUTH: Self = Self {
        requires_auth: false,
        skip_if_auth: true,
    };
}

/// One navigable route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path pattern; `:name` segments capture parameters.
    pub path: &'static str,
    /// Stable identifier, also used for parent lookups.
    pub name: &'static str,
    pub meta: RouteMeta,
    /// Immediate redirect target, followed before the guard runs.
    pub redirect: Option<&'static str>,
    /// Name of the parent route for matched-chain assembly.
    pub parent: Option<&'static str>,
}

/// A concrete navigation target resolved against the table.
#[derive(Debug, Clone)]
pub struct ResolvedRoute<'t> {
    pub route: &'t Route,
    /// The matched route plus its ancestors, root first. Guard rules
    /// look at the whole chain, so a flag on an ancestor covers every
    /// descendant.
    pub chain: Vec<&'t Route>,
    /// Captured `:param` values in path order.
    pub params: Vec<(String, String)>,
    /// The path as originally requested, query string included.
    pub full_path: String,
}

impl ResolvedRoute<'_> {
    /// Captured value of one named parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The declarative route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The wiremap console's route table.
    pub fn console() -> Self {
        Self::new(vec![
            Route {
                path: "/login",
                name: "login",
                meta: RouteMeta::SKIP_IF_AUTH,
                redirect: None,
                parent: None,
            },
            Route {
                path: "/",
                name: "root",
                meta: RouteMeta::REQUIRES_AUTH,
                redirect: Some("/builds"),
                parent: None,
            },
            Route {
                path: "/builds",
                name: "home",
                meta: RouteMeta::REQUIRES_AUTH,
                redirect: None,
                parent: None,
            },
            Route {
                path: "/builds/:build",
                name: "build",
                meta: RouteMeta::REQUIRES_AUTH,
                redirect: None,
                parent: None,
            },
            Route {
                path: "/builds/:build/:floor",
                name: "floor",
                meta: RouteMeta::REQUIRES_AUTH,
                redirect: None,
                parent: None,
            },
            Route {
                path: "/switches",
                name: "switches",
                meta: RouteMeta::REQUIRES_AUTH,
                redirect: None,
                parent: None,
            },
            Route {
                path: "/vis",
                name: "visualization",
                meta: RouteMeta::REQUIRES_AUTH,
                redirect: None,
                parent: None,
            },
        ])
    }

    /// Look a route up by its stable name.
    pub fn find(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Resolve a concrete path (query string allowed) to the first
    /// matching route, its captured params, and its matched chain.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute<'_>> {
        let bare = path.split('?').next().unwrap_or(path);
        let (route, params) = self
            .routes
            .iter()
            .find_map(|route| match_pattern(route.path, bare).map(|params| (route, params)))?;
        Some(ResolvedRoute {
            route,
            chain: self.chain_of(route),
            params,
            full_path: path.to_owned(),
        })
    }

    /// Ancestors (root first) plus the route itself.
    fn chain_of<'t>(&'t self, route: &'t Route) -> Vec<&'t Route> {
        let mut chain = vec![route];
        let mut cursor = route;
        while let Some(parent_name) = cursor.parent {
            let Some(parent) = self.find(parent_name) else {
                break;
            };
            chain.push(parent);
            cursor = parent;
        }
        chain.reverse();
        chain
    }
}

/// Match one concrete path against a pattern, capturing `:name`
/// segments. Trailing slashes are insignificant.
fn match_pattern(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let pattern_segments: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = pattern_segment.strip_prefix(':') {
            if path_segment.is_empty() {
                return None;
            }
            params.push((name.to_owned(), (*path_segment).to_owned()));
        } else if pattern_segment != path_segment {
            return None;
        }
    }
    Some(params)
}

// ── Access guard ─────────────────────────────────────────────────────

/// Outcome of one navigation attempt. Computed fresh for every
/// transition, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Proceed to the requested route.
    Allow,
    /// Bounce to the login route; `redirect` carries the originally
    /// requested full path so login can forward there afterwards.
    RedirectToLogin { redirect: String },
    /// Bounce an already-authenticated visitor to the landing route.
    RedirectToLanding,
}

/// Pre-navigation hook gating every screen change.
///
/// First matching rule wins: a `requires_auth` anywhere in the matched
/// chain demands a session; otherwise a `skip_if_auth` anywhere in the
/// chain turns authenticated visitors away; otherwise the navigation
/// proceeds. A route carrying both flags is an inconsistent table
/// resolved by rule order, not a runtime error.
#[derive(Debug, Clone)]
pub struct AccessGuard<S> {
    session: S,
}

impl<S: SessionQuery> AccessGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn check(&self, target: &ResolvedRoute<'_>) -> RouteDecision {
        if target.chain.iter().any(|route| route.meta.requires_auth) {
            if self.session.is_authenticated() {
                RouteDecision::Allow
            } else {
                RouteDecision::RedirectToLogin {
                    redirect: target.full_path.clone(),
                }
            }
        } else if target.chain.iter().any(|route| route.meta.skip_if_auth) {
            if self.session.is_authenticated() {
                RouteDecision::RedirectToLanding
            } else {
                RouteDecision::Allow
            }
        } else {
            RouteDecision::Allow
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::session::SessionState;

    use super::*;

    struct FixedSession(bool);

    impl SessionQuery for FixedSession {
        fn is_authenticated(&self) -> bool {
            self.0
        }
    }

    fn resolve<'t>(table: &'t RouteTable, path: &str) -> ResolvedRoute<'t> {
        table.resolve(path).expect("path resolves")
    }

    // ── Resolution ───────────────────────────────────────────────────

    #[test]
    fn static_paths_resolve_to_their_routes() {
        let table = RouteTable::console();
        assert_eq!(resolve(&table, "/login").route.name, "login");
        assert_eq!(resolve(&table, "/builds").route.name, "home");
        assert_eq!(resolve(&table, "/switches").route.name, "switches");
        assert_eq!(resolve(&table, "/vis").route.name, "visualization");
    }

    #[test]
    fn parameter_segments_are_captured_in_order() {
        let table = RouteTable::console();
        let target = resolve(&table, "/builds/B1/3");
        assert_eq!(target.route.name, "floor");
        assert_eq!(target.param("build"), Some("B1"));
        assert_eq!(target.param("floor"), Some("3"));
    }

    #[test]
    fn root_carries_a_redirect_to_the_landing_route() {
        let table = RouteTable::console();
        let target = resolve(&table, "/");
        assert_eq!(target.route.name, "root");
        assert_eq!(target.route.redirect, Some("/builds"));
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        let table = RouteTable::console();
        assert!(table.resolve("/nowhere").is_none());
        assert!(table.resolve("/builds/B1/3/extra").is_none());
    }

    #[test]
    fn trailing_slash_and_query_are_tolerated() {
        let table = RouteTable::console();
        assert_eq!(resolve(&table, "/builds/").route.name, "home");

        let target = resolve(&table, "/login?redirect=/switches");
        assert_eq!(target.route.name, "login");
        assert_eq!(target.full_path, "/login?redirect=/switches");
    }

    // ── Guard rules ──────────────────────────────────────────────────

    #[test]
    fn protected_route_bounces_unauthenticated_visitors_to_login() {
        let table = RouteTable::console();
        let guard = AccessGuard::new(FixedSession(false));

        let decision = guard.check(&resolve(&table, "/builds/B1/3"));
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                redirect: "/builds/B1/3".into()
            }
        );
    }

    #[test]
    fn redirect_preserves_the_full_requested_path() {
        let table = RouteTable::console();
        let guard = AccessGuard::new(FixedSession(false));

        let decision = guard.check(&resolve(&table, "/switches?build=B1&floor=3"));
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                redirect: "/switches?build=B1&floor=3".into()
            }
        );
    }

    #[test]
    fn protected_route_admits_authenticated_visitors() {
        let table = RouteTable::console();
        let guard = AccessGuard::new(FixedSession(true));

        assert_eq!(guard.check(&resolve(&table, "/builds")), RouteDecision::Allow);
    }

    #[test]
    fn login_bounces_authenticated_visitors_to_the_landing_route() {
        let table = RouteTable::console();
        let guard = AccessGuard::new(FixedSession(true));

        assert_eq!(
            guard.check(&resolve(&table, "/login")),
            RouteDecision::RedirectToLanding
        );
    }

    #[test]
    fn login_admits_unauthenticated_visitors() {
        let table = RouteTable::console();
        let guard = AccessGuard::new(FixedSession(false));

        assert_eq!(guard.check(&resolve(&table, "/login")), RouteDecision::Allow);
    }

    #[test]
    fn unflagged_route_admits_everyone() {
        let table = RouteTable::new(vec![Route {
            path: "/about",
            name: "about",
            meta: RouteMeta::NONE,
            redirect: None,
            parent: None,
        }]);

        let authed = AccessGuard::new(FixedSession(true));
        let anon = AccessGuard::new(FixedSession(false));
        assert_eq!(authed.check(&resolve(&table, "/about")), RouteDecision::Allow);
        assert_eq!(anon.check(&resolve(&table, "/about")), RouteDecision::Allow);
    }

    #[test]
    fn ancestor_flags_cover_descendants() {
        let table = RouteTable::new(vec![
            Route {
                path: "/admin",
                name: "admin",
                meta: RouteMeta::REQUIRES_AUTH,
                redirect: None,
                parent: None,
            },
            Route {
                path: "/admin/audit",
                name: "audit",
                meta: RouteMeta::NONE,
                redirect: None,
                parent: Some("admin"),
            },
        ]);

        let target = resolve(&table, "/admin/audit");
        assert_eq!(target.chain.len(), 2);
        assert_eq!(target.chain[0].name, "admin");

        let guard = AccessGuard::new(FixedSession(false));
        assert_eq!(
            guard.check(&target),
            RouteDecision::RedirectToLogin {
                redirect: "/admin/audit".into()
            }
        );
    }

    #[test]
    fn requires_auth_wins_when_both_flags_are_set() {
        let table = RouteTable::new(vec![Route {
            path: "/odd",
            name: "odd",
            meta: RouteMeta {
                requires_auth: true,
                skip_if_auth: true,
            },
            redirect: None,
            parent: None,
        }]);

        let authed = AccessGuard::new(FixedSession(true));
        let anon = AccessGuard::new(FixedSession(false));
        assert_eq!(authed.check(&resolve(&table, "/odd")), RouteDecision::Allow);
        assert_eq!(
            anon.check(&resolve(&table, "/odd")),
            RouteDecision::RedirectToLogin {
                redirect: "/odd".into()
            }
        );
    }

    #[test]
    fn decisions_track_the_live_session_state() {
        let table = RouteTable::console();
        let session = Arc::new(SessionState::new());
        let guard = AccessGuard::new(Arc::clone(&session));
        let target = resolve(&table, "/builds");

        assert!(matches!(
            guard.check(&target),
            RouteDecision::RedirectToLogin { .. }
        ));

        session.set_authenticated(true);
        assert_eq!(guard.check(&target), RouteDecision::Allow);

        session.set_authenticated(false);
        assert!(matches!(
            guard.check(&target),
            RouteDecision::RedirectToLogin { .. }
        ));
    }
}
