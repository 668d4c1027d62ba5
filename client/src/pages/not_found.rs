use leptos::prelude::*;

use crate::util::routes::HOME_PATH;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="status-page">
            <h1>"Page not found"</h1>
            <a href=HOME_PATH>"Go Home"</a>
        </div>
    }
}
