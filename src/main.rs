//! Schedule Frontend Entry Point

mod action;
mod app;
mod calendar;
mod components;
mod config;
mod context;
mod dates;
mod editor;
mod error;
mod models;
mod schedule;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    mount_to_body(App);
}
