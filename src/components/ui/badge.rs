use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Badge, span, "inline-flex items-center rounded-md border border-transparent bg-secondary px-2 py-0.5 text-xs font-medium text-secondary-foreground whitespace-nowrap"}
}

pub use components::*;
