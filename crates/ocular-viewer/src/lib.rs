//! Ocular Viewer - Interactive eye anatomy in the browser
//!
//! Renders the built-in eye model with a part list, an info panel and
//! view controls. Start-up options come from the page URL.

mod app;
mod ui;

use wasm_bindgen::prelude::*;

pub use app::run;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build()
    );

    app::run();
}
