use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Table, table, "w-full caption-bottom text-sm"}
    clx! {TableHeader, thead, "[&_tr]:border-b"}
    // `list` marks the body the list controller renders rows into.
    clx! {TableBody, tbody, "list [&_tr:last-child]:border-0"}
    clx! {TableRow, tr, "border-b transition-colors hover:bg-muted/50"}
    clx! {TableHead, th, "h-10 px-2 text-left align-middle font-medium text-muted-foreground"}
    clx! {TableCell, td, "p-2 align-middle"}

    clx! {Badge, span, "inline-flex items-center rounded-md border px-2 py-0.5 text-xs font-medium hover:cursor-pointer"}
    clx! {FieldList, dl, "grid grid-cols-[8rem_1fr] gap-x-4 gap-y-2"}
    clx! {FieldName, dt, "text-sm font-medium text-muted-foreground"}
    clx! {FieldRow, dd, "flex items-start gap-2 text-sm"}
}

pub use components::*;
