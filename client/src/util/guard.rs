//! Route guard decision.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected view applies the same rule: no identity goes to `/login`,
//! a resolved role outside the policy goes to `/unauthorized`. The decision
//! is a pure function of the session snapshot so it can be re-evaluated on
//! every navigation and every session change.
//!
//! An identity whose role has not resolved yet is `Pending` and renders
//! nothing, unless the policy explicitly opts into optimistic rendering.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use roles::Role;

use crate::net::identity::Identity;
use crate::state::session::SessionState;
use crate::util::routes::{LOGIN_PATH, UNAUTHORIZED_PATH};

/// What a guard does while the role exchange is still in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnresolvedRole {
    /// Render nothing until the role is known.
    #[default]
    Suspend,
    /// Render the view before the role is known.
    Optimistic,
}

/// Roles allowed to see a protected view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoutePolicy {
    pub allowed_roles: &'static [Role],
    pub unresolved: UnresolvedRole,
}

impl RoutePolicy {
    #[must_use]
    pub const fn allow(allowed_roles: &'static [Role]) -> Self {
        Self { allowed_roles, unresolved: UnresolvedRole::Suspend }
    }

    #[must_use]
    pub const fn optimistic(self) -> Self {
        Self { unresolved: UnresolvedRole::Optimistic, ..self }
    }

    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// Outcome of guarding one navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    RedirectToLogin,
    RedirectToUnauthorized,
    /// Identity present, role still resolving.
    Pending,
    Render,
}

impl GuardDecision {
    /// Target path for redirect decisions.
    #[must_use]
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
            Self::Pending | Self::Render => None,
        }
    }
}

#[must_use]
pub fn decide(identity: Option<&Identity>, role: Option<Role>, policy: &RoutePolicy) -> GuardDecision {
    if identity.is_none() {
        return GuardDecision::RedirectToLogin;
    }
    match role {
        None => match policy.unresolved {
            UnresolvedRole::Suspend => GuardDecision::Pending,
            UnresolvedRole::Optimistic => GuardDecision::Render,
        },
        Some(role) if policy.permits(role) => GuardDecision::Render,
        Some(_) => GuardDecision::RedirectToUnauthorized,
    }
}

/// Guard decision for the current session snapshot.
#[must_use]
pub fn evaluate(session: &SessionState, policy: &RoutePolicy) -> GuardDecision {
    decide(session.identity(), session.role(), policy)
}
