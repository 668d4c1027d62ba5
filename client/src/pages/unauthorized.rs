//! Shown when a signed-in user's role does not permit the requested view.

use leptos::prelude::*;

use crate::util::routes::HOME_PATH;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="status-page status-page--denied">
            <h1>"403 - Unauthorized"</h1>
            <p>"You do not have permission to view this page."</p>
            <a href=HOME_PATH>"Go Home"</a>
        </div>
    }
}
