use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-all disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-4 shrink-0 [&_svg]:shrink-0 outline-none focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-[3px] hover:cursor-pointer active:scale-[0.98] touch-manipulation select-none",
        variants: {
            variant: {
                Default: "bg-primary text-primary-foreground shadow-xs hover:bg-primary/90",
                Outline: "border bg-border/30 shadow-xs hover:bg-border/50 hover:text-foreground dark:bg-input/30 dark:border-input dark:hover:bg-input/5",
                Ghost: "hover:bg-accent hover:text-accent-foreground dark:hover:bg-accent/50",
                // Row delete action.
                Danger: "text-red-400 hover:text-red-600 hover:bg-red-50",
            },
            size: {
                Default: "h-9 px-4 py-2 has-[>svg]:px-3",
                Sm: "h-8 rounded-md gap-1.5 px-3 has-[>svg]:px-2.5",
                Lg: "h-11 rounded-md px-6 has-[>svg]:px-4",
                Icon: "size-7",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
