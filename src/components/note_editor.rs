//! Note Editor Component
//!
//! Plain-text notes for the selected date.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::AppContext;

/// Notes textarea with save / clear
#[component]
pub fn NoteEditor() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (draft, set_draft) = signal(String::new());
    let selected = Memo::new(move |_| ctx.schedule.with(|s| s.selected()));

    // Reload the draft only when the selected date changes
    Effect::new(move |_| {
        let _ = selected.get();
        let notes = ctx.schedule.with_untracked(|s| s.selected_notes().to_string());
        set_draft.set(notes);
    });

    let save = move |_: web_sys::MouseEvent| ctx.save_notes(draft.get_untracked());
    let clear = move |_: web_sys::MouseEvent| {
        if ctx.clear_notes() {
            set_draft.set(String::new());
        }
    };

    view! {
        <div class="date-notes">
            <textarea
                id="date-note"
                placeholder="Notes for this date..."
                prop:value=move || draft.get()
                on:input=move |ev| {
                    if let Some(textarea) = ev
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
                    {
                        set_draft.set(textarea.value());
                    }
                }
            ></textarea>
            <div class="note-actions">
                <button id="save-note-btn" type="button" on:click=save>"Save note"</button>
                <button id="clear-note-btn" type="button" on:click=clear>"Clear note"</button>
            </div>
        </div>
    }
}
