//! Event List Component
//!
//! Events of the selected date with edit / delete / delete-all actions.

use leptos::prelude::*;

use crate::action::EventAction;
use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::models::Event;

#[component]
pub fn EventList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let placeholder = ctx.config.with_value(|c| c.empty_list_text.clone());

    let items = move || ctx.schedule.with(|s| s.selected_items().to_vec());

    view! {
        <ul class="events-list">
            {move || {
                let items = items();
                if items.is_empty() {
                    view! { <li class="no-events">{placeholder.clone()}</li> }.into_any()
                } else {
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(index, event)| view! { <EventRow index=index event=event /> })
                        .collect_view()
                        .into_any()
                }
            }}
        </ul>
    }
}

/// One event; every button dispatches an `EventAction` with this row's index
#[component]
fn EventRow(index: usize, event: Event) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dispatch = move |action: EventAction| ctx.dispatch(action, index);

    view! {
        <li class="event-item">
            <strong>{event.heading()}</strong>
            <div class="event-desc">{event.desc.clone().unwrap_or_default()}</div>
            <div class="event-actions">
                {EventAction::ALL.iter().map(|&action| {
                    if action.needs_confirmation() {
                        view! {
                            <DeleteConfirmButton
                                label={action.label()}
                                prompt="Delete this event for all dates?"
                                on_confirm={Callback::new(move |_: ()| dispatch(action))}
                            />
                        }.into_any()
                    } else {
                        view! {
                            <button type="button" on:click=move |_| dispatch(action)>
                                {action.label()}
                            </button>
                        }.into_any()
                    }
                }).collect_view()}
            </div>
        </li>
    }
}
