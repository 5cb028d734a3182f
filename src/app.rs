//! Schedule App
//!
//! Calendar on the left, the selected day's events and notes on the right.

use leptos::prelude::*;

use crate::components::{CalendarGrid, EventList, EventModal, NoteEditor};
use crate::config::ScheduleConfig;
use crate::context::AppContext;
use crate::dates::format_iso;

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(ScheduleConfig::default());

    // Provide context to all children
    provide_context(ctx);

    let selected_label = move || ctx.schedule.with(|s| s.selected().map(format_iso).unwrap_or_default());

    view! {
        <div class="schedule-layout">
            <CalendarGrid />

            <aside class="day-panel">
                <h2 class="selected-date">{selected_label}</h2>
                <button class="add-event-btn" on:click=move |_| ctx.add_event()>"Add event"</button>
                <EventList />
                <NoteEditor />
            </aside>

            <EventModal />
        </div>
    }
}
