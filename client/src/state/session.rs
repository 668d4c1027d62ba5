//! Session state: current identity, resolved role, and readiness.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided as `RwSignal<SessionState>` context by the root component. Route
//! guards and user-aware pages read it; only `services::session` writes it,
//! and only through the transition methods below.
//!
//! DESIGN
//! ======
//! Every identity notification bumps `generation`. A role resolution started
//! for one notification carries a [`ResolutionTicket`]; when the answer
//! arrives it is applied only if the generation and uid still match, so a
//! slow exchange for a superseded session can never overwrite a newer role.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use roles::Role;

use crate::net::identity::Identity;

/// Lifecycle of the browser session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the provider's first notification.
    #[default]
    Initializing,
    Unauthenticated,
    /// Interactive sign-in in progress.
    Authenticating,
    /// Identity known, role exchange in flight.
    AuthenticatedUnresolved,
    AuthenticatedResolved,
}

/// Tag carried by an in-flight role resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    uid: String,
}

impl ResolutionTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }
}

/// Snapshot of the authenticated session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    identity: Option<Identity>,
    role: Option<Role>,
    ready: bool,
    phase: SessionPhase,
    generation: u64,
    notice: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Resolved role; `None` while signed out or while resolution is in flight.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// True once the provider's first notification has been fully processed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Role-sync failure message from the most recent resolution, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Enter `Authenticating`. Returns `false` when a sign-in is already
    /// running or a user is signed in.
    pub fn begin_sign_in(&mut self) -> bool {
        if self.phase != SessionPhase::Unauthenticated {
            return false;
        }
        self.phase = SessionPhase::Authenticating;
        true
    }

    /// Leave `Authenticating` after the interactive flow failed.
    pub fn sign_in_failed(&mut self) {
        if self.phase == SessionPhase::Authenticating {
            self.phase = SessionPhase::Unauthenticated;
        }
    }

    /// Apply a session-change notification.
    ///
    /// Returns a ticket when the caller must resolve a role for the new
    /// identity. A `None` identity clears the role and invalidates any
    /// resolution still in flight; repeating it while signed out changes
    /// nothing.
    pub fn apply_identity(&mut self, identity: Option<Identity>) -> Option<ResolutionTicket> {
        let Some(identity) = identity else {
            if self.identity.take().is_some() {
                self.generation += 1;
            }
            self.role = None;
            self.notice = None;
            if self.phase != SessionPhase::Authenticating {
                self.phase = SessionPhase::Unauthenticated;
            }
            self.ready = true;
            return None;
        };

        self.generation += 1;
        let same_user = self.identity.as_ref().is_some_and(|current| current.uid == identity.uid);
        if !same_user {
            self.role = None;
            self.notice = None;
        }
        // The same user re-notified keeps the cached role while it refreshes.
        self.phase = if self.role.is_some() {
            SessionPhase::AuthenticatedResolved
        } else {
            SessionPhase::AuthenticatedUnresolved
        };
        let ticket = ResolutionTicket { generation: self.generation, uid: identity.uid.clone() };
        self.identity = Some(identity);
        Some(ticket)
    }

    /// Whether `ticket` still describes the current session.
    #[must_use]
    pub fn is_current(&self, ticket: &ResolutionTicket) -> bool {
        ticket.generation == self.generation
            && self.identity.as_ref().is_some_and(|identity| identity.uid == ticket.uid)
    }

    /// Store a resolved role. Stale tickets are discarded and `false` returned.
    pub fn apply_resolution(&mut self, ticket: &ResolutionTicket, role: Role, notice: Option<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.role = Some(role);
        self.notice = notice;
        self.phase = SessionPhase::AuthenticatedResolved;
        self.ready = true;
        true
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
