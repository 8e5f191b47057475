//! Docflow - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for browsing the bronze/silver/gold blob
//! containers, uploading and deleting files, and running the processing
//! workflow on bronze files.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header                                                      │
//! │  └── WorkflowTrigger (start job, poll status)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent (owns the selection)                            │
//! │  └── FileBrowser                                             │
//! │      ├── UploadDialog                                        │
//! │      ├── DeleteButton (+ confirmation)                       │
//! │      └── one list per container                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Display types (StatusLine, LogLevel)
//! - [`components`] - UI components
//! - [`services`] - Backend communication, timers, file reading

use docflow_core::Selection;
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use components::*;
pub use config::*;
pub use services::*;
pub use types::{LogLevel, StatusLine};

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Docflow - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    // Shared by the browser (writes) and the workflow trigger (reads)
    let (selection, set_selection) = create_signal(Selection::new());

    view! {
        <Header>
            <WorkflowTrigger selection=selection/>
        </Header>

        <div class="container">
            <FileBrowser selection=selection set_selection=set_selection/>
        </div>
    }
}
