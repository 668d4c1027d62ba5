//! Login page with provider sign-in.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::state::session::{SessionPhase, SessionState};
use crate::util::routes::HOME_PATH;

/// Signed-in users have nothing to do here.
pub(crate) fn should_redirect_home(session: &SessionState) -> bool {
    session.is_authenticated()
}

pub(crate) fn sign_in_busy(session: &SessionState) -> bool {
    session.phase() == SessionPhase::Authenticating
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let signed_in = Memo::new(move |_| session.with(should_redirect_home));
    let busy = Memo::new(move |_| session.with(sign_in_busy));

    let on_login = move |_| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            // Failures are logged by the service; the page simply stays put.
            let _ = crate::services::session::login(&session, &crate::net::identity::BrowserIdentity).await;
        });
    };

    view! {
        <Show
            when=move || !signed_in.get()
            fallback=|| view! { <Redirect path=HOME_PATH/> }
        >
            <div class="login-page">
                <div class="login-card">
                    <h2>"Welcome Back"</h2>
                    <p class="login-card__subtitle">"Sign in to access your dashboard"</p>
                    <button class="login-button" on:click=on_login disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in with Google" }}
                    </button>
                </div>
            </div>
        </Show>
    }
}
