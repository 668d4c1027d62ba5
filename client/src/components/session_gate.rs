//! Holds back all routed content until the first session resolution settles.

use leptos::prelude::*;

use crate::state::session::SessionState;

/// Renders `children` only once the session is ready, so no view mounts
/// with a half-known identity or role.
#[component]
pub fn SessionGate(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let ready = Memo::new(move |_| session.with(SessionState::is_ready));

    move || ready.get().then(|| children())
}
