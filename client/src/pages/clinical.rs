//! Role-restricted clinical views.
//!
//! Content is a placeholder; access control lives in the route wrapper, so
//! these components render unconditionally once mounted.

use leptos::prelude::*;

use crate::util::routes::HOME_PATH;

#[component]
pub fn PatientHistoryPage() -> impl IntoView {
    view! {
        <div class="clinical-page">
            <h1>"Patient Medical History"</h1>
            <p>"Your visits, prescriptions and lab results appear here."</p>
            <a href=HOME_PATH>"Back"</a>
        </div>
    }
}

#[component]
pub fn DoctorDiagnosesPage() -> impl IntoView {
    view! {
        <div class="clinical-page">
            <h1>"Doctor Diagnoses Panel"</h1>
            <p>"Record and review diagnoses for your patients."</p>
            <a href=HOME_PATH>"Back"</a>
        </div>
    }
}
