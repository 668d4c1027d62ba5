//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` owns the session and admin signals and, in the browser, the single
//! identity-provider subscription that feeds the session. Routed content sits
//! behind `SessionGate`, and every role-restricted view is wrapped in a
//! `ProtectedRoute` carrying the policy from the route table.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::protected_route::ProtectedRoute;
use crate::components::session_gate::SessionGate;
use crate::pages::{
    admin::AdminDashboardPage,
    clinical::{DoctorDiagnosesPage, PatientHistoryPage},
    home::HomePage,
    login::LoginPage,
    not_found::NotFoundPage,
    unauthorized::UnauthorizedPage,
};
use crate::state::{admin::AdminState, session::SessionState};
use crate::util::routes::{ADMIN_DASHBOARD, DOCTOR_DIAGNOSES, PATIENT_HISTORY};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let admin = RwSignal::new(AdminState::default());

    provide_context(session);
    provide_context(admin);

    #[cfg(feature = "hydrate")]
    {
        use std::rc::Rc;

        use crate::net::api::HttpBackend;
        use crate::net::identity::BrowserIdentity;
        use crate::services::session::{RoleResolver, subscribe_session};

        let resolver = Rc::new(RoleResolver::new(HttpBackend::from_env()));
        let subscription = StoredValue::new_local(Some(subscribe_session(session, Rc::new(BrowserIdentity), resolver)));
        on_cleanup(move || {
            // Dropping the subscription detaches the provider listener.
            subscription.update_value(|sub| drop(sub.take()));
        });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/clinical-connect.css"/>
        <Title text="Clinical Connect"/>

        <SessionGate>
            <Router>
                <Routes fallback=NotFoundPage>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("unauthorized") view=UnauthorizedPage/>
                    <Route
                        path=(StaticSegment(PATIENT_HISTORY.segments[0]), StaticSegment(PATIENT_HISTORY.segments[1]))
                        view=|| {
                            view! {
                                <ProtectedRoute policy=PATIENT_HISTORY.policy>
                                    <PatientHistoryPage/>
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route
                        path=(StaticSegment(DOCTOR_DIAGNOSES.segments[0]), StaticSegment(DOCTOR_DIAGNOSES.segments[1]))
                        view=|| {
                            view! {
                                <ProtectedRoute policy=DOCTOR_DIAGNOSES.policy>
                                    <DoctorDiagnosesPage/>
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route
                        path=(StaticSegment(ADMIN_DASHBOARD.segments[0]), StaticSegment(ADMIN_DASHBOARD.segments[1]))
                        view=|| {
                            view! {
                                <ProtectedRoute policy=ADMIN_DASHBOARD.policy>
                                    <AdminDashboardPage/>
                                </ProtectedRoute>
                            }
                        }
                    />
                </Routes>
            </Router>
        </SessionGate>
    }
}
