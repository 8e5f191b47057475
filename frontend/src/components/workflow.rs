//! Workflow trigger with its status line.
//!
//! The poll loop lives as long as the component: unmounting cancels the
//! token, and a cancelled loop sends no further status requests.

use docflow_core::{run_workflow, CancellationToken, Selection, WorkflowOutcome, WorkflowSettings};
use leptos::*;

use crate::config::{POLL_INTERVAL, REQUIRED_CONTAINER};
use crate::services::{BrowserPause, GlooApi};
use crate::types::{LogLevel, StatusLine};

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(message) {
            log::warn!("alert failed: {:?}", e);
        }
    }
}

#[component]
pub fn WorkflowTrigger(selection: ReadSignal<Selection>) -> impl IntoView {
    let (is_running, set_is_running) = create_signal(false);
    let (status, set_status) = create_signal(None::<StatusLine>);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        on_cleanup(move || cancel.cancel());
    }

    let on_click = move |_| {
        if is_running.get_untracked() {
            return;
        }
        let chosen = selection.get_untracked();
        if let Err(e) = chosen.validate_for(REQUIRED_CONTAINER) {
            alert(&e.to_string());
            return;
        }

        set_is_running.set(true);
        let cancel = cancel.clone();
        spawn_local(async move {
            let settings = WorkflowSettings {
                required: REQUIRED_CONTAINER,
                poll_interval: POLL_INTERVAL,
            };
            let outcome = run_workflow(
                &GlooApi::default(),
                &BrowserPause,
                &chosen,
                &settings,
                &cancel,
                |update| set_status.set(Some(StatusLine::now(LogLevel::Info, update.message()))),
            )
            .await;

            match outcome {
                // Component is gone, its signals with it.
                WorkflowOutcome::Cancelled => log::debug!("Workflow view closed"),
                WorkflowOutcome::Rejected(e) => {
                    alert(&e.to_string());
                    set_is_running.set(false);
                }
                other => {
                    set_status.set(Some(StatusLine::for_outcome(&other)));
                    set_is_running.set(false);
                }
            }
        });
    };

    view! {
        <div class="workflow">
            <button
                class="btn btn-primary"
                disabled=move || is_running.get()
                on:click=on_click
            >
                {move || if is_running.get() { "Processing..." } else { "Start Workflow" }}
            </button>
            {move || status.get().map(|line| view! {
                <span class=format!("workflow-status {}", line.level.css_class())>
                    <span class="log-time">"[" {line.timestamp} "] "</span>
                    {line.message}
                </span>
            })}
        </div>
    }
}
