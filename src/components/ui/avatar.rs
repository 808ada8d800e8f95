use leptos::prelude::*;
use tw_merge::tw_merge;

/// Round profile picture; shows `fallback` (initials) when there is no image
/// or it fails to load.
#[component]
pub fn Avatar(
    #[prop(into, optional)] class: String,
    #[prop(into)] src: Option<String>,
    #[prop(into)] alt: String,
    #[prop(into)] fallback: String,
) -> impl IntoView {
    let class = tw_merge!(
        "relative flex size-8 shrink-0 items-center justify-center overflow-hidden rounded-full bg-muted text-xs font-medium",
        class
    );
    let broken = RwSignal::new(false);
    let src = StoredValue::new(src);

    view! {
        <span data-name="Avatar" class=class>
            <Show
                when=move || src.with_value(|s| s.is_some()) && !broken.get()
                fallback=move || view! { <span>{fallback.clone()}</span> }
            >
                <img
                    class="aspect-square size-full"
                    src=move || src.get_value().unwrap_or_default()
                    alt=alt.clone()
                    on:error=move |_| broken.set(true)
                />
            </Show>
        </span>
    }
}
