use icons::CircleAlert;
use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm flex items-start gap-2 [&>svg]:mt-0.5 [&>svg]:shrink-0"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;

/// Inline error box used by the add form and the list.
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<String>) -> impl IntoView {
    view! {
        <Alert class="border-destructive/30 text-destructive" attr:role="alert">
            <CircleAlert class="size-4" />
            <AlertDescription class="text-xs">{move || message.get()}</AlertDescription>
        </Alert>
    }
}
