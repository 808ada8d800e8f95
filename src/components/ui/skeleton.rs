use leptos::prelude::*;
use tw_merge::*;

/// Placeholder block; sized entirely through `class`.
#[component]
pub fn Skeleton(#[prop(into, optional)] class: String) -> impl IntoView {
    let class = tw_merge!("animate-pulse rounded-md bg-muted", class);

    view! { <div data-name="Skeleton" class=class aria-hidden="true" /> }
}
