use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use futures::channel::oneshot;

use super::*;
use crate::state::session::SessionPhase;
use crate::util::guard::GuardDecision;
use crate::util::routes::{self, Navigation};

fn identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_owned(),
        display_name: Some(format!("User {uid}")),
        email: Some(format!("{uid}@clinic.test")),
    }
}

// =============================================================
// Fakes
// =============================================================

#[derive(Default)]
struct FakeProvider {
    token_error: Option<AuthProviderError>,
    sign_in_error: Option<AuthProviderError>,
    sign_out_error: Option<AuthProviderError>,
    sign_outs: Cell<usize>,
}

#[async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    async fn sign_in(&self) -> Result<Identity, AuthProviderError> {
        match &self.sign_in_error {
            Some(e) => Err(e.clone()),
            None => Ok(identity("u1")),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthProviderError> {
        self.sign_outs.set(self.sign_outs.get() + 1);
        match &self.sign_out_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn subscribe(&self, _on_change: crate::net::identity::SessionCallback) -> Subscription {
        Subscription::new(|| {})
    }

    async fn id_token(&self) -> Result<String, AuthProviderError> {
        match &self.token_error {
            Some(e) => Err(e.clone()),
            None => Ok("token-1".to_owned()),
        }
    }
}

/// Answers role syncs from a script, recording every call.
#[derive(Default)]
struct ScriptedSource {
    answers: RefCell<VecDeque<Result<Role, RoleSyncError>>>,
    calls: RefCell<Vec<(String, SyncRequest)>>,
}

impl ScriptedSource {
    fn answering(answers: impl IntoIterator<Item = Result<Role, RoleSyncError>>) -> Self {
        Self { answers: RefCell::new(answers.into_iter().collect()), calls: RefCell::default() }
    }
}

#[async_trait(?Send)]
impl RoleSource for ScriptedSource {
    async fn sync_role(&self, token: &str, request: &SyncRequest) -> Result<Role, RoleSyncError> {
        self.calls.borrow_mut().push((token.to_owned(), request.clone()));
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RoleSyncError::Transport("unscripted".to_owned())))
    }
}

/// Role source whose answers are released by the test, in any order.
struct GatedSource {
    pending: RefCell<VecDeque<oneshot::Receiver<Result<Role, RoleSyncError>>>>,
}

fn gated(count: usize) -> (GatedSource, Vec<oneshot::Sender<Result<Role, RoleSyncError>>>) {
    let mut senders = Vec::new();
    let mut receivers = VecDeque::new();
    for _ in 0..count {
        let (tx, rx) = oneshot::channel();
        senders.push(tx);
        receivers.push_back(rx);
    }
    (GatedSource { pending: RefCell::new(receivers) }, senders)
}

#[async_trait(?Send)]
impl RoleSource for GatedSource {
    async fn sync_role(&self, _token: &str, _request: &SyncRequest) -> Result<Role, RoleSyncError> {
        let next = self.pending.borrow_mut().pop_front();
        match next {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(RoleSyncError::Transport("cancelled".to_owned()))),
            None => Err(RoleSyncError::Transport("unexpected sync".to_owned())),
        }
    }
}

// =============================================================
// Role resolver
// =============================================================

#[tokio::test]
async fn resolver_returns_backend_role() {
    let resolver = RoleResolver::new(ScriptedSource::answering([Ok(Role::Doctor)]));
    let resolution = resolver.resolve("tok", &SyncRequest::default()).await;
    assert_eq!(resolution, Resolution { role: Role::Doctor, error: None });
    assert_eq!(resolution.notice(), None);
}

#[tokio::test]
async fn resolver_falls_back_to_patient_on_any_failure() {
    let failures = [
        RoleSyncError::Status(300),
        RoleSyncError::Status(500),
        RoleSyncError::Transport("connection refused".to_owned()),
        RoleSyncError::Timeout,
        RoleSyncError::UnknownRole(roles::UnknownRole("GUEST".to_owned())),
    ];
    for failure in failures {
        let resolver = RoleResolver::new(ScriptedSource::answering([Err(failure.clone())]));
        let resolution = resolver.resolve("tok", &SyncRequest::default()).await;
        assert_eq!(resolution.role, Role::Patient);
        assert_eq!(resolution.error, Some(failure));
        assert!(resolution.notice().is_some_and(|n| n.contains("Continuing as Patient")));
    }
}

// =============================================================
// Session changes
// =============================================================

#[tokio::test]
async fn identity_notification_resolves_role_once() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let resolver = RoleResolver::new(ScriptedSource::answering([Ok(Role::Assistant)]));

    handle_session_change(&session, &provider, &resolver, Some(identity("u1"))).await;

    let state = session.borrow();
    assert_eq!(state.phase(), SessionPhase::AuthenticatedResolved);
    assert_eq!(state.role(), Some(Role::Assistant));
    assert!(state.is_ready());
    let calls = resolver.source.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "token-1");
    assert_eq!(calls[0].1.email.as_deref(), Some("u1@clinic.test"));
    assert_eq!(calls[0].1.display_name.as_deref(), Some("User u1"));
}

#[tokio::test]
async fn signed_out_notification_makes_no_exchange() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let resolver = RoleResolver::new(ScriptedSource::default());

    handle_session_change(&session, &provider, &resolver, None).await;

    assert_eq!(session.borrow().phase(), SessionPhase::Unauthenticated);
    assert!(session.borrow().is_ready());
    assert!(resolver.source.calls.borrow().is_empty());
}

#[tokio::test]
async fn sync_failure_settles_on_patient_with_notice() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let resolver = RoleResolver::new(ScriptedSource::answering([Err(RoleSyncError::Status(502))]));

    handle_session_change(&session, &provider, &resolver, Some(identity("u1"))).await;

    let state = session.borrow();
    assert_eq!(state.role(), Some(Role::Patient));
    assert_eq!(state.phase(), SessionPhase::AuthenticatedResolved);
    assert!(state.notice().is_some_and(|n| n.contains("502")));
}

#[tokio::test]
async fn expired_credential_settles_on_patient_without_exchange() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider {
        token_error: Some(AuthProviderError::Token("session expired".to_owned())),
        ..FakeProvider::default()
    };
    let resolver = RoleResolver::new(ScriptedSource::answering([Ok(Role::SuperAdmin)]));

    handle_session_change(&session, &provider, &resolver, Some(identity("u1"))).await;

    assert_eq!(session.borrow().role(), Some(Role::Patient));
    assert!(resolver.source.calls.borrow().is_empty());
}

#[tokio::test]
async fn slow_resolution_for_old_session_is_discarded() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let (source, mut senders) = gated(2);
    let resolver = RoleResolver::new(source);
    let for_b = senders.pop().expect("sender b");
    let for_a = senders.pop().expect("sender a");

    let release = async {
        // B answers first, then the stale answer for A arrives.
        let _ = for_b.send(Ok(Role::Doctor));
        tokio::task::yield_now().await;
        let _ = for_a.send(Ok(Role::SuperAdmin));
    };
    futures::join!(
        handle_session_change(&session, &provider, &resolver, Some(identity("a"))),
        handle_session_change(&session, &provider, &resolver, Some(identity("b"))),
        release,
    );

    let state = session.borrow();
    assert_eq!(state.identity().map(|i| i.uid.as_str()), Some("b"));
    assert_eq!(state.role(), Some(Role::Doctor));
}

#[tokio::test]
async fn old_resolution_finishing_first_is_also_discarded() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let (source, mut senders) = gated(2);
    let resolver = RoleResolver::new(source);
    let for_b = senders.pop().expect("sender b");
    let for_a = senders.pop().expect("sender a");

    let release = async {
        let _ = for_a.send(Ok(Role::SuperAdmin));
        tokio::task::yield_now().await;
        let _ = for_b.send(Ok(Role::Patient));
    };
    futures::join!(
        handle_session_change(&session, &provider, &resolver, Some(identity("a"))),
        handle_session_change(&session, &provider, &resolver, Some(identity("b"))),
        release,
    );

    let state = session.borrow();
    assert_eq!(state.role(), Some(Role::Patient));
}

#[tokio::test]
async fn resolution_landing_after_logout_is_discarded() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let (source, mut senders) = gated(1);
    let resolver = RoleResolver::new(source);
    let for_a = senders.pop().expect("sender a");

    let release = async {
        assert_eq!(logout(&session, &provider).await, Ok(()));
        let _ = for_a.send(Ok(Role::SuperAdmin));
    };
    futures::join!(handle_session_change(&session, &provider, &resolver, Some(identity("a"))), release);

    let state = session.borrow();
    assert_eq!(state.phase(), SessionPhase::Unauthenticated);
    assert_eq!(state.role(), None);
}

// =============================================================
// Login / logout
// =============================================================

#[tokio::test]
async fn login_failure_returns_to_unauthenticated() {
    let session = RefCell::new(SessionState::default());
    session.borrow_mut().apply_identity(None);
    let provider = FakeProvider {
        sign_in_error: Some(AuthProviderError::SignIn("popup closed".to_owned())),
        ..FakeProvider::default()
    };

    let result = login(&session, &provider).await;

    assert_eq!(result, Err(AuthProviderError::SignIn("popup closed".to_owned())));
    assert_eq!(session.borrow().phase(), SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn login_success_waits_for_notification() {
    let session = RefCell::new(SessionState::default());
    session.borrow_mut().apply_identity(None);
    let provider = FakeProvider::default();

    assert_eq!(login(&session, &provider).await, Ok(()));
    assert_eq!(session.borrow().phase(), SessionPhase::Authenticating);
}

#[tokio::test]
async fn logout_twice_is_idempotent() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let resolver = RoleResolver::new(ScriptedSource::answering([Ok(Role::Doctor)]));
    handle_session_change(&session, &provider, &resolver, Some(identity("u1"))).await;

    assert_eq!(logout(&session, &provider).await, Ok(()));
    let after_first = session.borrow().clone();
    assert_eq!(logout(&session, &provider).await, Ok(()));

    assert_eq!(*session.borrow(), after_first);
    assert_eq!(after_first.phase(), SessionPhase::Unauthenticated);
    assert_eq!(provider.sign_outs.get(), 2);
}

#[tokio::test]
async fn failed_logout_keeps_session() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider {
        sign_out_error: Some(AuthProviderError::SignOut("network down".to_owned())),
        ..FakeProvider::default()
    };
    let resolver = RoleResolver::new(ScriptedSource::answering([Ok(Role::Doctor)]));
    handle_session_change(&session, &provider, &resolver, Some(identity("u1"))).await;
    let before = session.borrow().clone();

    let result = logout(&session, &provider).await;

    assert_eq!(result, Err(AuthProviderError::SignOut("network down".to_owned())));
    assert_eq!(*session.borrow(), before);
    assert_eq!(session.borrow().role(), Some(Role::Doctor));
}

// =============================================================
// End-to-end navigation scenarios
// =============================================================

#[tokio::test]
async fn doctor_session_reaches_doctor_view_but_not_admin() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let resolver = RoleResolver::new(ScriptedSource::answering([Ok(Role::Doctor)]));

    handle_session_change(&session, &provider, &resolver, Some(identity("u1"))).await;

    let state = session.borrow();
    assert_eq!(state.phase(), SessionPhase::AuthenticatedResolved);
    assert_eq!(routes::navigate(&state, "/doctor/diagnoses"), Navigation::Guarded(GuardDecision::Render));
    assert_eq!(
        routes::navigate(&state, "/admin/dashboard"),
        Navigation::Guarded(GuardDecision::RedirectToUnauthorized)
    );
}

#[tokio::test]
async fn no_identity_redirects_every_guarded_view_to_login() {
    let session = RefCell::new(SessionState::default());
    let provider = FakeProvider::default();
    let resolver = RoleResolver::new(ScriptedSource::default());

    handle_session_change(&session, &provider, &resolver, None).await;

    let state = session.borrow();
    for route in &routes::GUARDED_ROUTES {
        assert_eq!(
            routes::navigate(&state, route.path),
            Navigation::Guarded(GuardDecision::RedirectToLogin),
            "{}",
            route.path
        );
    }
}
