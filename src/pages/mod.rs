use crate::api::OAuthProvider;
use crate::components::ui::{
    Avatar, Badge, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, ErrorAlert, Separator, Spinner, Tooltip, TooltipContent,
    TooltipPosition,
};
use crate::components::{AddBookmarkForm, BookmarkList};
use crate::state::session::{resolve_session, sign_in, sign_out};
use crate::state::{AppContext, BookmarkStore, SessionEvent};
use crate::storage::{save_session_to_storage, StoredSession};
use icons::LogOut;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

const FEATURES: [&str; 3] = [
    "Save bookmarks with a title and URL",
    "Private to your account only",
    "Real-time sync across all your tabs",
];

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let loading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    // A stored token goes straight to the dashboard; the gate bounces it
    // back here if the backend no longer accepts it.
    let has_token = app_state.0.backend.get_untracked().is_authenticated();
    Effect::new(move |_| {
        if has_token {
            navigate.with_value(|nav| nav("/dashboard", NavigateOptions::default()));
        }
    });

    let on_sign_in = move |_| {
        loading.set(true);
        error.set(None);
        let backend = app_state.0.backend.get_untracked();
        let origin = window().location().origin().unwrap_or_default();
        spawn_local(async move {
            if let Err(e) = sign_in(&backend, OAuthProvider::Google, &origin).await {
                log::warn!("could not start sign-in: {e}");
                error.set(Some("Could not start sign-in. Please try again.".to_string()));
            }
            loading.set(false);
        });
    };

    view! {
        <main class="min-h-screen flex items-center justify-center bg-background px-4">
            <Card class="w-full max-w-md shadow-xl">
                <CardHeader class="items-center text-center">
                    <CardTitle class="text-3xl font-bold">"Bookmark Manager"</CardTitle>
                    <CardDescription class="text-base">
                        "Save and organize your favorite links in one place."
                    </CardDescription>
                </CardHeader>

                <Separator />

                <CardContent class="flex flex-col gap-6">
                    <ul class="flex flex-col gap-2">
                        {FEATURES
                            .iter()
                            .map(|f| view! {
                                <li class="flex items-center gap-3 text-sm text-muted-foreground">
                                    <span class="font-bold text-green-500">"✓"</span>
                                    <span>{*f}</span>
                                </li>
                            })
                            .collect_view()}
                    </ul>

                    {move || error.get().map(|e| view! { <ErrorAlert message=e /> })}

                    <Button
                        class="w-full"
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Lg
                        attr:disabled=move || loading.get()
                        on:click=on_sign_in
                    >
                        <Show when=move || loading.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        {move || if loading.get() { "Signing in..." } else { "Sign in with Google" }}
                    </Button>
                </CardContent>
            </Card>
        </main>
    }
}

/// Landing spot of the OAuth redirect: keeps the tokens from the URL
/// fragment and moves on to the dashboard.
#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let captured = leptos_dom::helpers::location_hash()
        .as_deref()
        .and_then(StoredSession::from_fragment);

    let failed = match captured {
        Some(stored) => {
            save_session_to_storage(&stored);
            app_state.0.backend.update(|c| c.set_token(stored.access_token.clone()));
            app_state.0.session.update(|s| {
                *s = std::mem::take(s).transition(SessionEvent::Reenter);
            });
            false
        }
        None => {
            log::warn!("auth callback without an access token");
            true
        }
    };

    // Drop the tokens from the address bar along the way.
    Effect::new(move |_| {
        if !failed {
            navigate.with_value(|nav| {
                nav(
                    "/dashboard",
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                )
            });
        }
    });

    view! {
        <main class="min-h-screen flex items-center justify-center px-4">
            <Show when=move || failed fallback=|| view! { <Spinner class="size-6" /> }>
                <div class="flex flex-col items-center gap-3">
                    <ErrorAlert message=String::from("Sign-in did not complete.") />
                    <a class="text-sm text-primary underline underline-offset-4" href="/">"Back to sign in"</a>
                </div>
            </Show>
        </main>
    }
}

/// Renders `children` only for a signed-in user; everyone else is sent to `/`.
#[component]
pub fn SessionGate(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;
    let navigate = StoredValue::new(use_navigate());

    // Every entry asks the backend again.
    session.update(|s| *s = std::mem::take(s).transition(SessionEvent::Reenter));
    {
        let backend = app_state.0.backend.get_untracked();
        spawn_local(async move {
            let resolved = resolve_session(&backend).await;
            session.update(|s| {
                if s.is_resolving() {
                    *s = resolved;
                }
            });
        });
    }

    let backend = app_state.0.backend;
    Effect::new(move |_| {
        if session.with(|s| s.needs_sign_in()) {
            backend.update(|c| c.logout());
            navigate.with_value(|nav| nav("/", NavigateOptions::default()));
        }
    });

    // `Show` re-renders children, so they must be callable more than once.
    let children = StoredValue::new(children);
    let signed_in = move || session.with(|s| s.user().is_some());

    view! {
        <Show
            when=signed_in
            fallback=|| view! {
                <div class="min-h-screen flex items-center justify-center">
                    <Spinner class="size-6" />
                </div>
            }
        >
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;

    // Only rendered inside the gate, so the user is known.
    let Some(user) = session.with_untracked(|s| s.user().cloned()) else {
        return ().into_any();
    };

    let store = RwSignal::new(BookmarkStore::new());
    let sync = app_state.0.config.sync_config();
    let signing_out: RwSignal<bool> = RwSignal::new(false);

    let backend = app_state.0.backend;
    let on_sign_out = move |_| {
        signing_out.set(true);
        let client = backend.get_untracked();
        spawn_local(async move {
            let next = sign_out(&client, session.get_untracked()).await;
            backend.update(|c| c.logout());
            // The gate navigates away once the state flips.
            session.set(next);
            signing_out.set(false);
        });
    };

    // Children are closures; each one gets its own copy.
    let display_name = user.display_name();
    let avatar_url = user.avatar_url();
    let initials = user.initials();
    let greeting = user.greeting();
    let user_id = user.id.clone();
    let email = user.email.clone().unwrap_or_default();
    let email_badge = email.clone();

    view! {
        <main class="min-h-screen bg-muted/30">
            <nav class="sticky top-0 z-10 border-b bg-background">
                <div class="mx-auto flex max-w-3xl items-center justify-between px-4 py-3">
                    <span class="font-bold">"Bookmark Manager"</span>

                    <div class="flex items-center gap-3">
                        <Tooltip>
                            <Avatar src=avatar_url alt=display_name fallback=initials />
                            <TooltipContent position=TooltipPosition::Bottom>{email}</TooltipContent>
                        </Tooltip>
                        <Badge class="hidden sm:inline-flex">{email_badge}</Badge>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            attr:disabled=move || signing_out.get()
                            on:click=on_sign_out
                        >
                            <LogOut class="size-4" />
                            "Logout"
                        </Button>
                    </div>
                </div>
            </nav>

            <div class="mx-auto flex max-w-3xl flex-col gap-6 px-4 py-8">
                <div>
                    <h1 class="text-2xl font-bold">{greeting}</h1>
                    <p class="mt-1 text-sm text-muted-foreground">
                        "Manage your bookmarks below. Changes sync in real-time across all tabs."
                    </p>
                </div>

                <Separator />

                <AddBookmarkForm sync=sync.clone() store=store />

                <Separator />

                <div>
                    <h2 class="mb-4 text-lg font-semibold">"Your Bookmarks"</h2>
                    <BookmarkList sync=sync store=store user_id=user_id />
                </div>
            </div>
        </main>
    }
    .into_any()
}
