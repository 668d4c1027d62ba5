//! Session orchestration: identity notifications, role resolution, login/logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component subscribes once to the identity provider. Every
//! notification runs [`handle_session_change`] on the local executor: the
//! session snapshot is updated, a bearer token is fetched, the backend is
//! asked for the role, and the answer is written back only if the session
//! has not moved on in the meantime.
//!
//! ERROR HANDLING
//! ==============
//! Provider and role-sync failures never escape. Resolution falls back to the
//! least-privileged role and records a notice. Sign-in and sign-out failures
//! are logged and returned so the page can stay put; a failed sign-out keeps
//! the local session because the provider still considers the user signed in.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::rc::Rc;

use leptos::logging::{log, warn};
use leptos::prelude::*;
use roles::wire::SyncRequest;
use roles::{Role, RoleSyncError};

use crate::net::api::RoleSource;
use crate::net::identity::{AuthProviderError, Identity, IdentityProvider, Subscription};
use crate::state::StateStore;
use crate::state::session::SessionState;

/// Outcome of one role exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub role: Role,
    /// Failure that forced the fallback role, if any.
    pub error: Option<RoleSyncError>,
}

impl Resolution {
    fn fallback(error: RoleSyncError) -> Self {
        Self { role: Role::least_privileged(), error: Some(error) }
    }

    /// User-facing notice for a fallback resolution.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| format!("Could not sync your role ({e}). Continuing as {}.", self.role.label()))
    }
}

/// Exchanges bearer credentials for roles, never failing.
#[derive(Clone, Debug)]
pub struct RoleResolver<S> {
    source: S,
}

impl<S: RoleSource> RoleResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolve the caller's role, falling back to the least-privileged role
    /// on any failure.
    pub async fn resolve(&self, token: &str, request: &SyncRequest) -> Resolution {
        match self.source.sync_role(token, request).await {
            Ok(role) => Resolution { role, error: None },
            Err(e) => {
                warn!("role sync failed, falling back to {}: {e}", Role::least_privileged());
                Resolution::fallback(e)
            }
        }
    }
}

fn sync_request_for(identity: &Identity) -> SyncRequest {
    SyncRequest { email: identity.email.clone(), display_name: identity.display_name.clone() }
}

/// Apply one session-change notification and, for a signed-in identity,
/// resolve and store its role.
pub async fn handle_session_change<St, P, S>(
    session: &St,
    provider: &P,
    resolver: &RoleResolver<S>,
    identity: Option<Identity>,
) where
    St: StateStore<SessionState>,
    P: IdentityProvider + ?Sized,
    S: RoleSource,
{
    let request = identity.as_ref().map(sync_request_for).unwrap_or_default();
    let Some(ticket) = session.mutate(|s| s.apply_identity(identity)).flatten() else {
        return;
    };

    let resolution = match provider.id_token().await {
        Ok(token) => resolver.resolve(&token, &request).await,
        Err(e) => {
            warn!("no credential for role sync: {e}");
            Resolution::fallback(RoleSyncError::Credential(e.to_string()))
        }
    };

    let role = resolution.role;
    let notice = resolution.notice();
    let applied = session
        .mutate(|s| s.apply_resolution(&ticket, role, notice))
        .unwrap_or(false);
    if applied {
        log!("session role resolved: {role}");
    } else {
        log!("discarding stale role for {} (generation {})", ticket.uid(), ticket.generation());
    }
}

/// Start the interactive sign-in flow.
///
/// The session itself advances when the provider's notification arrives.
///
/// # Errors
///
/// Returns the provider error after returning the session to
/// `Unauthenticated`.
pub async fn login<St, P>(session: &St, provider: &P) -> Result<(), AuthProviderError>
where
    St: StateStore<SessionState>,
    P: IdentityProvider + ?Sized,
{
    if !session.mutate(SessionState::begin_sign_in).unwrap_or(false) {
        return Ok(());
    }
    match provider.sign_in().await {
        Ok(identity) => {
            log!("signed in as {}", identity.uid);
            Ok(())
        }
        Err(e) => {
            session.mutate(SessionState::sign_in_failed);
            warn!("failed to login: {e}");
            Err(e)
        }
    }
}

/// Sign out and clear the session. Safe to call when already signed out.
///
/// # Errors
///
/// Returns the provider error and leaves the session untouched, since the
/// provider session is still live.
pub async fn logout<St, P>(session: &St, provider: &P) -> Result<(), AuthProviderError>
where
    St: StateStore<SessionState>,
    P: IdentityProvider + ?Sized,
{
    if let Err(e) = provider.sign_out().await {
        warn!("failed to logout: {e}");
        return Err(e);
    }
    session.mutate(|s| s.apply_identity(None));
    Ok(())
}

/// Subscribe the session signal to provider notifications.
///
/// Each notification is handled on the local executor. Dropping the returned
/// handle stops the subscription.
pub fn subscribe_session<P, S>(
    session: RwSignal<SessionState>,
    provider: Rc<P>,
    resolver: Rc<RoleResolver<S>>,
) -> Subscription
where
    P: IdentityProvider + 'static,
    S: RoleSource + 'static,
{
    let handler_provider = Rc::clone(&provider);
    provider.subscribe(Box::new(move |identity| {
        let provider = Rc::clone(&handler_provider);
        let resolver = Rc::clone(&resolver);
        leptos::task::spawn_local(async move {
            handle_session_change(&session, provider.as_ref(), resolver.as_ref(), identity).await;
        });
    }))
}
