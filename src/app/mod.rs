use crate::pages::{HomePage, LoginPage, NotesPage, RequireAuth, SignupPage};
use crate::state::{AppContext, AppState};
use icons::Feather;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use wasm_bindgen::JsCast;

/// Splash duration before the router takes over, matching the original
/// client's timed preloader.
const PRELOADER_MS: i32 = 3000;

#[component]
fn Preloader() -> impl IntoView {
    view! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-background">
            <div class="text-center">
                <div class="mx-auto mb-6 w-fit animate-pulse rounded-2xl bg-card p-6 shadow-2xl">
                    <Feather class="size-16 text-primary" />
                </div>
                <h1 class="text-4xl font-bold text-foreground">"NoteFlow"</h1>
            </div>
        </div>
    }
}

/// Unknown routes bounce to the landing page.
#[component]
fn NotFoundRedirect() -> impl IntoView {
    Effect::new(move |_| {
        let _ = window().location().set_href("/");
    });
}

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    let dark = state.dark_mode;
    provide_context(AppContext(state));

    let show_preloader = RwSignal::new(true);

    Effect::new(move |_| {
        let Some(win) = web_sys::window() else {
            return;
        };
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            show_preloader.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            PRELOADER_MS,
        );
    });

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <div class=move || if dark.get() { "dark" } else { "" }>
            <Show when=move || !show_preloader.get() fallback=|| view! { <Preloader /> }>
                <Router>
                    <Routes fallback=|| view! { <NotFoundRedirect /> }>
                        <Route path=path!("login") view=LoginPage />
                        <Route path=path!("signup") view=SignupPage />
                        <Route path=path!("notes") view=move || view! {
                            <RequireAuth>
                                <NotesPage />
                            </RequireAuth>
                        } />
                        <Route path=path!("") view=HomePage />
                    </Routes>
                </Router>
            </Show>
        </div>
    }
}
