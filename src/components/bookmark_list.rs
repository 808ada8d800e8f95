use crate::components::ui::{
    Badge, Button, ButtonSize, ButtonVariant, Card, CardContent, ErrorAlert, Skeleton, Tooltip,
    TooltipContent,
};
use crate::config::SyncConfig;
use crate::error::FlowError;
use crate::models::Bookmark;
use crate::state::{delete_bookmark, load, AppContext, BookmarkStore, ListPhase, SessionState};
use crate::sync::SyncChannel;
use crate::util::{bookmark_count_label, format_created_date, format_url, URL_DISPLAY_MAX};
use icons::{ExternalLink, Trash2};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub(crate) fn BookmarkList(
    /// Channel this list listens on and announces deletes through.
    sync: SyncConfig,
    store: RwSignal<BookmarkStore>,
    user_id: String,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let channel = StoredValue::new_local(SyncChannel::open_or_degrade(&sync));
    channel.with_value(|ch| {
        if let Some(ch) = ch {
            ch.subscribe(move |event| {
                store.update(|s| {
                    s.apply(event);
                });
            });
        }
    });
    on_cleanup(move || {
        let _ = channel.try_update_value(|slot| {
            if let Some(mut ch) = slot.take() {
                ch.close();
            }
        });
    });

    // Initial fetch on mount.
    {
        let backend = app_state.0.backend.get_untracked();
        let user_id = user_id.clone();
        spawn_local(async move {
            if let Err(e) = load(&backend, &store, &user_id).await {
                // Rendered from the store's error phase.
                log::debug!("initial load failed: {e}");
            }
        });
    }

    let session = app_state.0.session;
    let backend_signal = app_state.0.backend;
    let user_id = StoredValue::new(user_id);
    let on_delete = Callback::new(move |id: String| {
        let backend = backend_signal.get_untracked();
        let user_id = user_id.get_value();
        spawn_local(async move {
            match delete_bookmark(&backend, &store, &channel, &user_id, &id).await {
                Ok(()) => {}
                Err(FlowError::Unauthenticated) => session.set(SessionState::Unauthenticated),
                // Already surfaced through the store's notice.
                Err(_) => {}
            }
        });
    });

    let phase = move || store.with(|s| s.phase().clone());
    let count = move || store.with(|s| s.len());
    let has_bookmarks = move || store.with(|s| !s.is_empty());
    let notice = move || store.with(|s| s.notice().map(str::to_string));

    view! {
        {move || match phase() {
            ListPhase::Loading => view! { <ListSkeleton /> }.into_any(),
            ListPhase::Failed(message) => view! { <ErrorAlert message=message /> }.into_any(),
            ListPhase::Ready => view! {
                <div class="flex flex-col gap-4">
                    <p class="text-sm text-muted-foreground">{move || bookmark_count_label(count())}</p>

                    {move || notice().map(|n| view! {
                        <div on:click=move |_| store.update(|s| s.dismiss_notice())>
                            <ErrorAlert message=n />
                        </div>
                    })}

                    <Show when=has_bookmarks fallback=|| view! { <EmptyState /> }>
                        <div class="flex flex-col gap-2">
                            <For
                                each=move || store.with(|s| s.bookmarks().to_vec())
                                key=|b: &Bookmark| b.id.clone()
                                children=move |b: Bookmark| view! { <BookmarkRow bookmark=b on_delete=on_delete /> }
                            />
                        </div>
                    </Show>
                </div>
            }.into_any(),
        }}
    }
}

#[component]
fn BookmarkRow(bookmark: Bookmark, on_delete: Callback<String>) -> impl IntoView {
    let id = bookmark.id.clone();
    let short_url = format_url(&bookmark.url, URL_DISPLAY_MAX);
    let created = format_created_date(&bookmark.created_at);

    view! {
        <Card class="py-0 gap-0 transition-shadow hover:shadow-sm">
            <CardContent class="flex items-center justify-between py-2.5 px-4">
                <div class="flex min-w-0 flex-1 flex-col gap-0.5">
                    <a
                        href=bookmark.url.clone()
                        target="_blank"
                        rel="noopener noreferrer"
                        class="flex items-center gap-1 truncate text-sm font-medium hover:text-primary hover:underline"
                    >
                        {bookmark.title.clone()}
                        <ExternalLink class="size-2.5 shrink-0" />
                    </a>
                    <p class="truncate text-xs text-muted-foreground">{short_url}</p>
                </div>

                <div class="ml-4 flex shrink-0 items-center gap-2">
                    <Badge class="hidden sm:inline-flex">{created}</Badge>
                    <Tooltip>
                        <Button
                            variant=ButtonVariant::Danger
                            size=ButtonSize::Icon
                            attr:aria-label="Delete bookmark"
                            on:click=move |_| on_delete.run(id.clone())
                        >
                            <Trash2 class="size-3.5" />
                        </Button>
                        <TooltipContent>"Delete bookmark"</TooltipContent>
                    </Tooltip>
                </div>
            </CardContent>
        </Card>
    }
}

#[component]
fn ListSkeleton() -> impl IntoView {
    view! {
        <div class="flex flex-col gap-2" aria-busy="true">
            {(0..3)
                .map(|_| view! {
                    <Card class="py-0">
                        <CardContent class="flex items-center justify-between py-3 px-4">
                            <div class="flex flex-1 flex-col gap-1.5">
                                <Skeleton class="h-3.5 w-1/3" />
                                <Skeleton class="h-3 w-1/2" />
                            </div>
                            <Skeleton class="ml-4 size-7" />
                        </CardContent>
                    </Card>
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn EmptyState() -> impl IntoView {
    view! {
        <Card>
            <CardContent class="py-8 text-center text-muted-foreground">
                <p class="text-sm font-medium">"No bookmarks yet!"</p>
                <p class="text-xs">"Add your first bookmark using the form above."</p>
            </CardContent>
        </Card>
    }
}
