use crate::api::ApiErrorKind;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner, Textarea,
};
use crate::models::NoteDraft;
use crate::search;
use crate::state::AppContext;
use crate::storage::{self, save_dark_mode, TOKEN_KEY};
use icons::{Feather, Moon, Pencil, Plus, Search, Sun, Trash2};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

fn goto(href: &str) {
    let _ = window().location().set_href(href);
}

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let dark = app_state.0.dark_mode;

    let on_toggle = move |_| {
        let next = !dark.get_untracked();
        dark.set(next);
        save_dark_mode(next);
    };

    view! {
        <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon on:click=on_toggle attr:aria-label="Toggle theme">
            <Show when=move || dark.get() fallback=|| view! { <Moon class="size-5" /> }>
                <Sun class="size-5 text-yellow-400" />
            </Show>
        </Button>
    }
}

#[component]
fn BrandMark() -> impl IntoView {
    view! {
        <a href="/" class="flex items-center gap-3">
            <div class="rounded-lg bg-card p-2 shadow-md">
                <Feather class="size-6 text-primary" />
            </div>
            <span class="text-xl font-bold text-foreground">"NoteFlow"</span>
        </a>
    }
}

/// Gate for protected routes.
///
/// Tracks the session signal, so this is not a one-time mount check: a
/// 401-triggered clear deep in the transport layer flips the signal and the
/// redirect fires mid-session. A `storage` listener additionally picks up a
/// sign-out performed in another tab of the same browser.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;
    let is_authenticated = move || session.is_authenticated();

    Effect::new(move |_| {
        if !session.is_authenticated() {
            goto("/login");
        }
    });

    let storage_listener = window_event_listener(ev::storage, move |_ev: web_sys::StorageEvent| {
        if storage::get_item(TOKEN_KEY).is_none() {
            session.clear_memory();
        }
    });
    on_cleanup(move || storage_listener.remove());

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=|| ().into_view()>
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let features: [(&'static str, &'static str); 4] = [
        ("Secure", "Your notes, behind your account"),
        ("Collaborate", "Make a note public to share it"),
        ("Smart Search", "Find anything quickly"),
        ("Fast", "Lightning fast performance"),
    ];

    view! {
        <div class="min-h-screen w-full bg-background transition-colors duration-500">
            <nav class="flex items-center justify-between p-6">
                <BrandMark />
                <div class="flex items-center gap-4">
                    <ThemeToggle />
                    <Button variant=ButtonVariant::Outline on:click=move |_| goto("/login")>"Login"</Button>
                    <Button on:click=move |_| goto("/signup")>"Sign Up"</Button>
                </div>
            </nav>

            <main class="mx-auto max-w-3xl px-6 py-16 text-center">
                <h1 class="text-5xl font-bold leading-tight text-foreground">
                    "Write, Organize, "
                    <span class="bg-gradient-to-r from-primary to-blue-500 bg-clip-text text-transparent">
                        "Create Magic"
                    </span>
                </h1>
                <p class="mt-6 text-lg leading-relaxed text-muted-foreground">
                    "The intelligent note-taking app that helps you capture ideas, \
                     organize thoughts, and unleash your creativity."
                </p>
                <div class="mt-8">
                    <Button size=ButtonSize::Lg on:click=move |_| goto("/notes")>"Start Writing Now"</Button>
                </div>

                <div class="mt-20 grid grid-cols-1 gap-6 text-left sm:grid-cols-2">
                    {features
                        .into_iter()
                        .map(|(title, description)| {
                            view! {
                                <div class="rounded-2xl border border-border bg-card p-6 shadow-md">
                                    <h3 class="text-xl font-semibold text-foreground">{title}</h3>
                                    <p class="mt-1 text-muted-foreground">{description}</p>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </main>

            <footer class="py-8 text-center text-muted-foreground">
                <p>"Made for productive minds"</p>
            </footer>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;
    let api = app_state.0.api.clone();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let api = api.clone();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api.login(&email_val, &password_val).await {
                Ok(token) => {
                    session.set(token);
                    goto("/notes");
                }
                Err(e) => {
                    // 4xx carries the backend's inline message; a 401 means
                    // bad credentials here (no session existed to lose).
                    let msg = match e.kind {
                        ApiErrorKind::Validation => e.message,
                        ApiErrorKind::Unauthorized => "Invalid email or password".to_string(),
                        _ => "Login failed. Please try again.".to_string(),
                    };
                    error.set(Some(msg));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen w-full bg-background transition-colors duration-500">
            <nav class="flex items-center justify-between p-6">
                <BrandMark />
                <div class="flex items-center gap-4">
                    <ThemeToggle />
                    <a href="/signup" class="text-lg font-medium text-foreground hover:underline">"Sign Up"</a>
                </div>
            </nav>

            <main class="flex items-center justify-center px-6 py-12">
                <Card class="w-full max-w-md">
                    <CardHeader>
                        <CardTitle class="text-2xl">"Welcome Back"</CardTitle>
                        <CardDescription>"Sign in to your NoteFlow account"</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-6" on:submit=on_submit>
                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-center text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <div class="flex flex-col gap-2">
                                <Label html_for="email">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="Enter your email"
                                    bind_value=email
                                    required=true
                                />
                            </div>

                            <div class="flex flex-col gap-2">
                                <Label html_for="password">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="Enter your password"
                                    bind_value=password
                                    required=true
                                />
                            </div>

                            <Button class="w-full" attr:disabled=move || loading.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing In..." } else { "Sign In" }}
                                </span>
                            </Button>

                            <div class="border-t border-border pt-4 text-center text-muted-foreground">
                                "Don't have an account? "
                                <a href="/signup" class="font-semibold text-primary hover:underline">"Sign up"</a>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </main>
        </div>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let name: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let api = app_state.0.api.clone();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        let name_val = name.get();
        let email_val = email.get();
        let password_val = password.get();
        let confirm_val = confirm_password.get();
        let api = api.clone();

        if name_val.is_empty() || email_val.is_empty() || password_val.is_empty() {
            error.set(Some("All fields are required".to_string()));
            return;
        }
        if password_val != confirm_val {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }

        loading.set(true);

        spawn_local(async move {
            match api.signup(&name_val, &email_val, &password_val).await {
                Ok(()) => {
                    // No session is established on signup; the user signs in.
                    goto("/login");
                }
                Err(e) => {
                    let msg = match e.kind {
                        ApiErrorKind::Validation => e.message,
                        _ => "Signup failed. Try again.".to_string(),
                    };
                    error.set(Some(msg));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen w-full bg-background transition-colors duration-500">
            <nav class="flex items-center justify-between p-6">
                <BrandMark />
                <div class="flex items-center gap-4">
                    <ThemeToggle />
                    <a href="/login" class="text-lg font-medium text-foreground hover:underline">"Login"</a>
                </div>
            </nav>

            <main class="flex items-center justify-center px-6 py-12">
                <Card class="w-full max-w-md">
                    <CardHeader>
                        <CardTitle class="text-3xl">"Create Account"</CardTitle>
                        <CardDescription>"Join our NoteFlow community"</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-6" on:submit=on_submit>
                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-center text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <div class="flex flex-col gap-2">
                                <Label html_for="name">"Full Name"</Label>
                                <Input
                                    id="name"
                                    r#type="text"
                                    placeholder="Enter your full name"
                                    bind_value=name
                                    required=true
                                />
                            </div>

                            <div class="flex flex-col gap-2">
                                <Label html_for="email">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="Enter your email"
                                    bind_value=email
                                    required=true
                                />
                            </div>

                            <div class="flex flex-col gap-2">
                                <Label html_for="password">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="Enter your password"
                                    bind_value=password
                                    required=true
                                />
                            </div>

                            <div class="flex flex-col gap-2">
                                <Label html_for="confirm_password">"Confirm Password"</Label>
                                <Input
                                    id="confirm_password"
                                    r#type="password"
                                    placeholder="Confirm your password"
                                    bind_value=confirm_password
                                    required=true
                                />
                            </div>

                            <Button class="w-full" attr:disabled=move || loading.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Creating Account..." } else { "Sign Up" }}
                                </span>
                            </Button>

                            <div class="border-t border-border pt-4 text-center text-muted-foreground">
                                "Already have an account? "
                                <a href="/login" class="font-semibold text-primary hover:underline">"Login"</a>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </main>
        </div>
    }
}

#[component]
pub fn NotesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;
    let api = app_state.0.api.clone();
    let store = app_state.0.notes.clone();

    // Copy handles for the view closures; the signals themselves are Copy.
    let notes_sig = store.notes;
    let loading_sig = store.loading;
    let editing_id = store.editing_id;
    let draft_title = store.draft_title;
    let draft_content = store.draft_content;
    let draft_is_public = store.draft_is_public;

    // Transient search state; never persisted.
    let term: RwSignal<String> = RwSignal::new(String::new());

    let form_error: RwSignal<Option<String>> = RwSignal::new(None);
    let list_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);

    // Initial load. A 401 is handled globally (the cleared session makes
    // RequireAuth redirect); other failures keep the previous list.
    {
        let store = store.clone();
        Effect::new(move |_| {
            let store = store.clone();
            spawn_local(async move {
                let _ = store.fetch_all().await;
            });
        });
    }

    // Pure derivations, recomputed on every notes/term change.
    let visible_notes = move || search::filtered_notes(&notes_sig.get(), &term.get());
    let title_suggestions = move || search::suggestions(&notes_sig.get(), &term.get());
    let is_editing = move || editing_id.get().is_some();

    let on_submit = {
        let store = store.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();

            let store = store.clone();
            if draft_title.get_untracked().trim().is_empty() {
                form_error.set(Some("Title is required".to_string()));
                return;
            }

            saving.set(true);
            form_error.set(None);

            spawn_local(async move {
                let draft = store.draft();
                let result = match store.editing_id.get_untracked() {
                    Some(id) => store.update(&id, &draft).await.map(|_| ()),
                    None => store.create(&draft).await.map(|_| ()),
                };

                match result {
                    Ok(()) => store.clear_draft(),
                    Err(e) => match e.kind {
                        // The guard is already redirecting.
                        ApiErrorKind::Unauthorized => {}
                        ApiErrorKind::Validation => form_error.set(Some(e.message)),
                        _ => form_error.set(Some(
                            "Could not save the note. Please try again.".to_string(),
                        )),
                    },
                }
                saving.set(false);
            });
        }
    };

    let on_cancel_edit = {
        let store = store.clone();
        move |_| {
            store.clear_draft();
            form_error.set(None);
        }
    };

    let on_quick_capture = {
        let store = store.clone();
        move |_| {
            let store = store.clone();
            spawn_local(async move {
                let draft = NoteDraft {
                    title: "Untitled".to_string(),
                    content: String::new(),
                    is_public: false,
                };
                if let Err(e) = store.create_quick(&draft).await {
                    if e.kind != ApiErrorKind::Unauthorized {
                        list_error.set(Some(
                            "Could not create a note. Please try again.".to_string(),
                        ));
                    }
                }
            });
        }
    };

    let on_logout = move |_| {
        let api = api.clone();
        spawn_local(async move {
            // Best-effort server-side logout; the local session goes either
            // way. A 401 on this very call has already cleared it — the
            // second clear is a no-op.
            let _ = api.logout().await;
            session.clear();
        });
    };

    let on_toggle_public = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                draft_is_public.set(input.checked());
            }
        }
    };

    let store_for_list = store.clone();

    view! {
        <div class="min-h-screen w-full bg-background transition-colors duration-500">
            <nav class="flex items-center justify-between p-6">
                <BrandMark />
                <div class="flex items-center gap-4">
                    <ThemeToggle />
                    <Button variant=ButtonVariant::Outline on:click=on_logout>"Logout"</Button>
                </div>
            </nav>

            <main class="mx-auto max-w-4xl space-y-6 px-6 pb-16">
                <Card>
                    <CardHeader>
                        <CardTitle class="text-xl">
                            {move || if is_editing() { "Edit note" } else { "New note" }}
                        </CardTitle>
                    </CardHeader>
                    <CardContent>
                        <form class="flex flex-col gap-4" on:submit=on_submit>
                            <Show when=move || form_error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    form_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <div class="flex flex-col gap-2">
                                <Label html_for="note_title">"Title"</Label>
                                <Input
                                    id="note_title"
                                    placeholder="Note title"
                                    bind_value=draft_title
                                />
                            </div>

                            <div class="flex flex-col gap-2">
                                <Label html_for="note_content">"Content"</Label>
                                <Textarea
                                    id="note_content"
                                    placeholder="Write something..."
                                    bind_value=draft_content
                                />
                            </div>

                            <div class="flex items-center gap-2">
                                <input
                                    type="checkbox"
                                    id="note_public"
                                    class="size-4 accent-primary"
                                    prop:checked=move || draft_is_public.get()
                                    on:change=on_toggle_public
                                />
                                <Label html_for="note_public">"Public note"</Label>
                            </div>

                            <div class="flex items-center gap-2">
                                <Button attr:disabled=move || saving.get()>
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=move || saving.get() fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        {move || if is_editing() { "Save changes" } else { "Add note" }}
                                    </span>
                                </Button>
                                <Show when=is_editing fallback=|| ().into_view()>
                                    <button
                                        type="button"
                                        class="rounded-full px-4 py-2 text-sm font-medium text-muted-foreground transition-colors hover:bg-accent hover:text-accent-foreground"
                                        on:click=on_cancel_edit.clone()
                                    >
                                        "Cancel"
                                    </button>
                                </Show>
                            </div>
                        </form>
                    </CardContent>
                </Card>

                <div class="space-y-2">
                    <div class="relative">
                        <Search class="absolute left-4 top-1/2 size-4 -translate-y-1/2 text-muted-foreground" />
                        <Input
                            id="search"
                            placeholder="Search notes"
                            bind_value=term
                            class="pl-11"
                        />
                    </div>

                    <Show when=move || !title_suggestions().is_empty() fallback=|| ().into_view()>
                        <div class="overflow-hidden rounded-lg border border-border bg-card shadow-md">
                            {move || {
                                title_suggestions()
                                    .into_iter()
                                    .map(|title| {
                                        let fill = title.clone();
                                        view! {
                                            <button
                                                type="button"
                                                class="block w-full px-4 py-2 text-left text-sm text-foreground transition-colors hover:bg-accent"
                                                on:click=move |_| term.set(fill.clone())
                                            >
                                                {title}
                                            </button>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </div>
                    </Show>
                </div>

                <Show when=move || list_error.get().is_some() fallback=|| ().into_view()>
                    {move || {
                        list_error.get().map(|e| view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive">{e}</AlertDescription>
                            </Alert>
                        })
                    }}
                </Show>

                <div class="flex items-center justify-between">
                    <h2 class="text-lg font-semibold text-foreground">
                        {move || format!("{} notes", visible_notes().len())}
                    </h2>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_quick_capture>
                        <Plus class="size-4" />
                        "Quick note"
                    </Button>
                </div>

                <Show
                    when=move || !visible_notes().is_empty()
                    fallback=move || view! {
                        <div class="rounded-2xl border border-border bg-card p-8 text-center text-muted-foreground">
                            {move || if loading_sig.get() { "Loading notes..." } else { "No notes yet." }}
                        </div>
                    }
                >
                    <div class="grid grid-cols-1 gap-4 sm:grid-cols-2">
                        {
                            let store = store_for_list.clone();
                            move || {
                                let store = store.clone();
                                visible_notes()
                                    .into_iter()
                                    .map(|n| {
                                        let is_public = n.is_public;
                                        let title = n.title.clone();
                                        let content = n.content.clone();
                                        let delete_id = n.id.clone();
                                        let edit_store = store.clone();
                                        let delete_store = store.clone();
                                        view! {
                                            <div class="flex flex-col gap-2 rounded-2xl border border-border bg-card p-5 shadow-md">
                                                <div class="flex items-start justify-between gap-2">
                                                    <h3 class="font-semibold text-foreground">{title}</h3>
                                                    <Show when=move || is_public fallback=|| ().into_view()>
                                                        <span class="rounded-full bg-primary/10 px-2 py-0.5 text-xs text-primary">"Public"</span>
                                                    </Show>
                                                </div>
                                                <p class="whitespace-pre-wrap text-sm text-muted-foreground">{content}</p>
                                                <div class="mt-auto flex items-center gap-2 pt-2">
                                                    <Button
                                                        variant=ButtonVariant::Ghost
                                                        size=ButtonSize::Sm
                                                        on:click=move |_| {
                                                            edit_store.start_edit(&n);
                                                            form_error.set(None);
                                                        }
                                                    >
                                                        <Pencil class="size-4" />
                                                        "Edit"
                                                    </Button>
                                                    <Button
                                                        variant=ButtonVariant::Ghost
                                                        size=ButtonSize::Sm
                                                        class="text-destructive"
                                                        on:click=move |_| {
                                                            let store = delete_store.clone();
                                                            let id = delete_id.clone();
                                                            spawn_local(async move {
                                                                if let Err(e) = store.delete(&id).await {
                                                                    if e.kind != ApiErrorKind::Unauthorized {
                                                                        list_error.set(Some(
                                                                            "Could not delete the note. Please try again.".to_string(),
                                                                        ));
                                                                    }
                                                                }
                                                            });
                                                        }
                                                    >
                                                        <Trash2 class="size-4" />
                                                        "Delete"
                                                    </Button>
                                                </div>
                                            </div>
                                        }
                                    })
                                    .collect_view()
                            }
                        }
                    </div>
                </Show>
            </main>
        </div>
    }
}
