//! Calendar Grid Component
//!
//! Month header with prev/next controls and the fixed 42-cell day grid.

use leptos::prelude::*;

use crate::calendar::{CalendarCell, WEEKDAY_LABELS};
use crate::context::AppContext;
use crate::dates::format_iso;

/// Month view of the schedule
#[component]
pub fn CalendarGrid() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let month_label = move || ctx.schedule.with(|s| s.cursor().label());
    let cells = move || ctx.schedule.with(|s| s.month_grid(ctx.today()).cells);

    view! {
        <div class="calendar">
            <div class="calendar-header">
                <button class="prev-month" on:click=move |_| ctx.previous_month()>"‹"</button>
                <span class="month-year">{month_label}</span>
                <button class="next-month" on:click=move |_| ctx.next_month()>"›"</button>
            </div>

            <div class="calendar-weekdays">
                {WEEKDAY_LABELS.iter().map(|label| view! { <div class="weekday">{*label}</div> }).collect_view()}
            </div>

            <div class="calendar-grid">
                {move || cells().into_iter().map(|cell| view! { <CalendarDay cell=cell /> }).collect_view()}
            </div>
        </div>
    }
}

/// One grid cell. Click selects the date, double-click opens the editor.
#[component]
fn CalendarDay(cell: CalendarCell) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let class = cell.css_class();

    let Some(date) = cell.date else {
        return view! { <div class=class></div> }.into_any();
    };

    view! {
        <div
            class=class
            data-date={format_iso(date)}
            on:click=move |_| ctx.select(date)
            on:dblclick=move |_| ctx.open_editor(date, None)
        >
            <div class="day-num">{cell.day()}</div>
            {cell.has_events.then(|| view! { <div class="event-dot"></div> })}
        </div>
    }
    .into_any()
}
