use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardHeader, CardTitle, ErrorAlert, Input, Label,
    Spinner,
};
use crate::config::SyncConfig;
use crate::error::FlowError;
use crate::state::{add_bookmark, AppContext, BookmarkDraft, BookmarkStore, SessionState};
use crate::sync::SyncChannel;
use icons::Plus;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub(crate) fn AddBookmarkForm(
    /// Channel this form announces new bookmarks on.
    sync: SyncConfig,
    store: RwSignal<BookmarkStore>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let title: RwSignal<String> = RwSignal::new(String::new());
    let url: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    // Owned by this form instance; released when it unmounts. The list
    // applies incoming events, so this endpoint drains and ignores them.
    let channel = StoredValue::new_local(SyncChannel::open_or_degrade(&sync));
    channel.with_value(|ch| {
        if let Some(ch) = ch {
            ch.subscribe(|_| {});
        }
    });
    on_cleanup(move || {
        let _ = channel.try_update_value(|slot| {
            if let Some(mut ch) = slot.take() {
                ch.close();
            }
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        error.set(None);

        let draft = BookmarkDraft::new(title.get_untracked(), url.get_untracked());
        if let Err(e) = draft.validate() {
            error.set(Some(e.to_string()));
            return;
        }

        loading.set(true);
        let backend = app_state.0.backend.get_untracked();
        let session = app_state.0.session;
        spawn_local(async move {
            match add_bookmark(&backend, &store, &channel, &draft).await {
                Ok(_) => {
                    title.set(String::new());
                    url.set(String::new());
                }
                Err(FlowError::Unauthenticated) => {
                    error.set(Some(FlowError::Unauthenticated.to_string()));
                    // The session gate sends the user to sign in.
                    session.set(SessionState::Unauthenticated);
                }
                // Typed input stays so the user can retry.
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-lg">"Add New Bookmark"</CardTitle>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-4" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="title">"Title"</Label>
                        <Input
                            id="title"
                            placeholder="e.g. My Favorite Website"
                            bind_value=title
                            disabled=loading
                        />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="url">"URL"</Label>
                        <Input
                            id="url"
                            placeholder="e.g. https://example.com"
                            bind_value=url
                            disabled=loading
                        />
                    </div>

                    {move || error.get().map(|e| view! { <ErrorAlert message=e /> })}

                    <Button class="w-full" size=ButtonSize::Default attr:disabled=move || loading.get()>
                        <Show when=move || loading.get() fallback=|| view! { <Plus class="size-4" /> }>
                            <Spinner />
                        </Show>
                        {move || if loading.get() { "Adding..." } else { "Add Bookmark" }}
                    </Button>
                </form>
            </CardContent>
        </Card>
    }
}
