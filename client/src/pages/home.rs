//! Landing page: greeting, current role, logout, and links to guarded views.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;

use crate::state::session::SessionState;
use crate::util::routes::{GUARDED_ROUTES, LOGIN_PATH};

pub(crate) fn greeting(session: &SessionState) -> String {
    session
        .identity()
        .map(|identity| identity.greeting_name().to_owned())
        .unwrap_or_default()
}

pub(crate) fn role_label(session: &SessionState) -> String {
    session
        .role()
        .map_or_else(|| "Loading...".to_owned(), |role| role.as_str().to_owned())
}

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let signed_in = Memo::new(move |_| session.with(SessionState::is_authenticated));
    let notice = Memo::new(move |_| session.with(|s| s.notice().map(ToOwned::to_owned)));

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            // Failures are logged by the service; the page stays signed in.
            let _ = crate::services::session::logout(&session, &crate::net::identity::BrowserIdentity).await;
        });
    };

    let quick_links = || {
        GUARDED_ROUTES
            .iter()
            .map(|route| {
                view! {
                    <li>
                        <a href=route.path>{route.title}</a>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <div class="home-page">
            <div class="home-card">
                <h1>"Clinical Connect"</h1>
                <Show
                    when=move || signed_in.get()
                    fallback=|| {
                        view! {
                            <div class="home-card__guest">
                                <p>"Please log in to continue."</p>
                                <a href=LOGIN_PATH class="home-card__button">
                                    "Go to Login"
                                </a>
                            </div>
                        }
                    }
                >
                    <p>
                        "Welcome, "
                        <span class="home-card__name">{move || session.with(greeting)}</span>
                    </p>
                    <p class="home-card__role">
                        "Role: " <code>{move || session.with(role_label)}</code>
                    </p>
                    <Show when=move || notice.get().is_some()>
                        <div class="home-card__notice" role="status">
                            <span>{move || notice.get().unwrap_or_default()}</span>
                            <button on:click=move |_| session.update(SessionState::dismiss_notice)>
                                "Dismiss"
                            </button>
                        </div>
                    </Show>
                    <button class="home-card__logout" on:click=on_logout>
                        "Logout"
                    </button>
                </Show>
                <Show when=move || signed_in.get()>
                    <div class="home-card__links">
                        <p>"Quick Links:"</p>
                        <ul>{quick_links()}</ul>
                    </div>
                </Show>
            </div>
        </div>
    }
}
