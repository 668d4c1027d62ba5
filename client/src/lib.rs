//! # client
//!
//! Leptos + WASM frontend for Clinical Connect.
//!
//! This crate holds the session context, the role resolver that turns a
//! signed-in identity into a backend-assigned role, the route guard, and the
//! pages it protects. The `ssr` feature renders the same `App` on the server;
//! the `hydrate` feature wires in the browser identity provider and HTTP
//! backend.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod services;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
