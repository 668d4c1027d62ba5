//! Static route table.
//!
//! Public paths are unguarded; each guarded path carries the policy its
//! view is wrapped with in `app.rs`. The table is fixed at build time.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use roles::Role;

use crate::state::session::SessionState;
use crate::util::guard::{self, GuardDecision, RoutePolicy};

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

pub const PUBLIC_PATHS: [&str; 3] = [HOME_PATH, LOGIN_PATH, UNAUTHORIZED_PATH];

/// A role-restricted view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardedRoute {
    pub path: &'static str,
    /// Path segments as registered with the router.
    pub segments: [&'static str; 2],
    /// Link text on the home page.
    pub title: &'static str,
    pub policy: RoutePolicy,
}

pub const PATIENT_HISTORY: GuardedRoute = GuardedRoute {
    path: "/patient/history",
    segments: ["patient", "history"],
    title: "My History (Patient)",
    policy: RoutePolicy::allow(&[Role::Patient, Role::SuperAdmin]),
};

pub const DOCTOR_DIAGNOSES: GuardedRoute = GuardedRoute {
    path: "/doctor/diagnoses",
    segments: ["doctor", "diagnoses"],
    title: "Diagnoses (Doctor)",
    policy: RoutePolicy::allow(&[Role::Doctor, Role::SuperAdmin]),
};

pub const ADMIN_DASHBOARD: GuardedRoute = GuardedRoute {
    path: "/admin/dashboard",
    segments: ["admin", "dashboard"],
    title: "Admin Dashboard (Super Admin)",
    policy: RoutePolicy::allow(&[Role::SuperAdmin]),
};

pub static GUARDED_ROUTES: [GuardedRoute; 3] = [PATIENT_HISTORY, DOCTOR_DIAGNOSES, ADMIN_DASHBOARD];

/// Outcome of navigating to a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Public,
    Guarded(GuardDecision),
    NotFound,
}

#[must_use]
pub fn guarded_route(path: &str) -> Option<&'static GuardedRoute> {
    GUARDED_ROUTES.iter().find(|route| route.path == path)
}

/// Resolve a navigation against the current session.
#[must_use]
pub fn navigate(session: &SessionState, path: &str) -> Navigation {
    if PUBLIC_PATHS.contains(&path) {
        return Navigation::Public;
    }
    match guarded_route(path) {
        Some(route) => Navigation::Guarded(guard::evaluate(session, &route.policy)),
        None => Navigation::NotFound,
    }
}
