//! Role-restricted wrapper for route views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps a view with a [`RoutePolicy`]. The decision is recomputed whenever
//! the session signal changes, so signing out or a role change while the
//! view is mounted redirects immediately.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::state::session::SessionState;
use crate::util::guard::{self, GuardDecision, RoutePolicy};
use crate::util::routes::LOGIN_PATH;

#[component]
pub fn ProtectedRoute(policy: RoutePolicy, children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let decision = Memo::new(move |_| session.with(|s| guard::evaluate(s, &policy)));

    move || match decision.get() {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Pending => ().into_any(),
        redirect => {
            let path = redirect.redirect_path().unwrap_or(LOGIN_PATH);
            view! { <Redirect path=path/> }.into_any()
        }
    }
}
