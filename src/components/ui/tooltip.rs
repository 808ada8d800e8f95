use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

// Pure CSS: the content shows on hover of the enclosing `Tooltip` group.
clx! {Tooltip, div, "inline-flex relative group/tooltip"}

#[derive(Clone, Copy, Default, strum::AsRefStr)]
pub enum TooltipPosition {
    #[default]
    Top,
    Bottom,
}

#[component]
pub fn TooltipContent(
    #[prop(into, optional)] class: String,
    #[prop(default = TooltipPosition::default())] position: TooltipPosition,
    children: Children,
) -> impl IntoView {
    let position_class = match position {
        TooltipPosition::Top => "left-1/2 -translate-x-1/2 bottom-full mb-1.5",
        TooltipPosition::Bottom => "left-1/2 -translate-x-1/2 top-full mt-1.5",
    };

    let class = tw_merge!(
        "absolute z-50 opacity-0 pointer-events-none transition-opacity duration-200 group-hover/tooltip:opacity-100",
        "rounded-md py-1.5 px-2.5 text-xs whitespace-nowrap shadow-lg text-background bg-foreground/90",
        position_class,
        class,
    );

    view! {
        <div data-name="TooltipContent" data-position=position.as_ref().to_string() class=class role="tooltip">
            {children()}
        </div>
    }
}
