//! Event Modal Component
//!
//! Overlay form for creating or editing an event over a date range.

use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::editor::{EventEditor, FormField};

/// Labelled input bound to one editor field
#[component]
fn FormInput(field: FormField, label: &'static str, input_type: &'static str) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <label class="form-field">
            <span>{label}</span>
            <input
                type=input_type
                name={field.name()}
                prop:value=move || ctx.editor.with(|e| e.field(field))
                on:input=move |ev| ctx.set_field(field, event_target_value(&ev))
            />
        </label>
    }
}

/// Add/edit event modal
#[component]
pub fn EventModal() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.submit_editor();
    };

    view! {
        <Show when=move || ctx.editor.with(EventEditor::is_open)>
            // Clicking the backdrop closes without saving
            <div id="event-modal" class="modal" on:click=move |_| ctx.close_editor()>
                <div class="modal-content" on:click=|ev| ev.stop_propagation()>
                    <h3 id="modal-date-heading">{move || ctx.editor.with(|e| e.heading())}</h3>

                    <form id="event-form" on:submit=on_submit>
                        <FormInput field=FormField::Title label="Title" input_type="text" />
                        <FormInput field=FormField::Time label="Time" input_type="time" />
                        <FormInput field=FormField::Desc label="Description" input_type="text" />
                        <FormInput field=FormField::Start label="Start" input_type="date" />
                        <FormInput field=FormField::End label="End" input_type="date" />

                        <div class="modal-actions">
                            <button type="submit">"Save"</button>
                            <button type="button" class="cancel-btn" on:click=move |_| ctx.close_editor()>
                                "Cancel"
                            </button>
                            <DeleteConfirmButton
                                label="Delete All"
                                prompt="Delete all instances of this event?"
                                on_confirm={Callback::new(move |_: ()| ctx.delete_all_from_editor())}
                            />
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
