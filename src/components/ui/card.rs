use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "bg-card/70 text-card-foreground flex flex-col gap-4 rounded-2xl border border-border py-6 shadow-xl backdrop-blur-xl"}
    clx! {CardHeader, div, "flex flex-col items-start gap-1.5 px-6"}
    clx! {CardTitle, h2, "leading-none font-bold"}
    clx! {CardDescription, p, "text-muted-foreground text-sm"}
    clx! {CardContent, div, "px-6"}
    clx! {CardFooter, footer, "flex items-center px-6", "gap-2"}
    clx! {CardList, ul, "flex flex-col gap-3"}
    clx! {CardItem, li, "flex items-center [&_svg:not([class*='size-'])]:size-4 [&_svg]:shrink-0"}
}

#[allow(unused_imports)]
pub use components::*;
