//! Super-admin dashboard: user table with per-user role selection.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind the super-admin route policy. Loads the user list once on
//! mount and reloads it after every successful role change. Failures surface
//! as a dismissible alert above the table while the table keeps the last
//! known roles.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::prelude::*;
use roles::Role;
use roles::wire::AdminUser;

use crate::state::admin::AdminState;
use crate::util::routes::HOME_PATH;

/// Selector value to role. Unknown values are ignored.
pub(crate) fn parse_role_choice(value: &str) -> Option<Role> {
    value.trim().parse().ok()
}

/// Whether choosing `choice` for `user` would change anything.
pub(crate) fn is_role_change(user: &AdminUser, choice: Role) -> bool {
    user.known_role() != Some(choice)
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let admin = expect_context::<RwSignal<AdminState>>();

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let api = crate::net::api::HttpBackend::from_env();
        crate::services::admin::refresh_users(&admin, &crate::net::identity::BrowserIdentity, &api).await;
    });

    let alert = Memo::new(move |_| admin.with(|a| a.alert.clone()));
    let status = Memo::new(move |_| admin.with(|a| a.status.clone()));
    let loading = Memo::new(move |_| admin.with(|a| a.loading));
    let busy = Memo::new(move |_| admin.with(|a| a.pending_uid.is_some()));

    view! {
        <div class="admin-page">
            <h1>"Super Admin Dashboard"</h1>
            <a href=HOME_PATH>"Back"</a>
            <Show when=move || alert.get().is_some()>
                <div class="admin-page__alert" role="alert">
                    <span>{move || alert.get().unwrap_or_default()}</span>
                    <button on:click=move |_| admin.update(AdminState::dismiss_alert)>"Dismiss"</button>
                </div>
            </Show>
            <Show when=move || status.get().is_some()>
                <p class="admin-page__status">{move || status.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || loading.get()>
                <p class="admin-page__loading">"Loading users..."</p>
            </Show>
            <table class="admin-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Role"</th>
                        <th>"Change Role"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || admin.with(|a| a.users.clone())
                        key=|user| (user.uid.clone(), user.role.clone())
                        children=move |user| view! { <UserRow user=user busy=busy/> }
                    />
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn UserRow(user: AdminUser, busy: Memo<bool>) -> impl IntoView {
    let admin = expect_context::<RwSignal<AdminState>>();
    let uid = user.uid.clone();
    let pending_uid = uid.clone();
    let pending = Memo::new(move |_| admin.with(|a| a.is_pending(&pending_uid)));
    let selected_uid = uid.clone();
    let selected = Memo::new(move |_| admin.with(|a| a.selected_role(&selected_uid)));
    let name = user.display_label().to_owned();
    let email = user.email.clone().unwrap_or_default();
    let role_text = user.role.clone().unwrap_or_else(|| "-".to_owned());

    let on_change = move |ev: leptos::ev::Event| {
        let Some(choice) = parse_role_choice(&event_target_value(&ev)) else {
            return;
        };
        if !is_role_change(&user, choice) {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let uid = uid.clone();
            leptos::task::spawn_local(async move {
                let api = crate::net::api::HttpBackend::from_env();
                // The alert is raised through the admin state.
                let _ = crate::services::admin::change_user_role(
                    &admin,
                    &crate::net::identity::BrowserIdentity,
                    &api,
                    &uid,
                    choice,
                )
                .await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = &uid;
    };

    view! {
        <tr>
            <td>{name}</td>
            <td>{email}</td>
            <td>
                <code>{role_text}</code>
                <Show when=move || pending.get()>
                    <span class="admin-table__pending">" updating..."</span>
                </Show>
            </td>
            <td>
                // Bound to state so a rejected choice reverts once the alert is raised.
                <select
                    on:change=on_change
                    prop:value=move || selected.get().map_or("", Role::as_str)
                    disabled=move || busy.get()
                >
                    <option value="" disabled=true>
                        "Select role"
                    </option>
                    {Role::ALL
                        .iter()
                        .map(|role| view! { <option value=role.as_str()>{role.label()}</option> })
                        .collect_view()}
                </select>
            </td>
        </tr>
    }
}
