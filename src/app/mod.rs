use crate::pages::{AuthCallbackPage, DashboardPage, HomePage, SessionGate};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("auth/callback") view=AuthCallbackPage />
                <Route path=path!("dashboard") view=move || view! {
                    <SessionGate>
                        <DashboardPage />
                    </SessionGate>
                } />
                <Route path=path!("") view=HomePage />
            </Routes>
        </Router>
    }
}
