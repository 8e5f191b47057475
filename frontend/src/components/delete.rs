//! Bulk delete behind a confirmation dialog.

use docflow_core::{BrowserState, DeleteConfirm, Selection, StorageApi};
use leptos::*;

use crate::services::GlooApi;

#[component]
pub fn DeleteButton(
    selection: ReadSignal<Selection>,
    set_selection: WriteSignal<Selection>,
    state: ReadSignal<BrowserState>,
    set_state: WriteSignal<BrowserState>,
    /// Called after every delete round-trip so the listing is re-fetched
    on_deleted: Callback<()>,
) -> impl IntoView {
    let (dialog, set_dialog) = create_signal(DeleteConfirm::default());

    let selected = move || selection.with(|s| s.len());
    let deleting = move || state.with(|s| s.is_deleting());

    let enabled = move || state.with(|s| s.can_delete(selected()));

    let on_open = move |_| {
        let count = selected();
        let busy = state.with_untracked(|s| !s.can_delete(count));
        set_dialog.update(|d| {
            d.request(count, busy);
        });
    };
    let on_cancel = move |_| set_dialog.update(|d| d.cancel());

    let on_confirm = move |_| {
        let mut proceed = false;
        set_dialog.update(|d| proceed = d.confirm());
        if !proceed {
            return;
        }
        let mut files = None;
        set_state.update(|s| files = selection.with_untracked(|sel| s.begin_delete(sel)));
        let Some(files) = files else {
            return;
        };

        log::info!("Deleting {} blobs", files.len());
        spawn_local(async move {
            let result = GlooApi::default().delete(&files).await;
            let mut remaining = selection.get_untracked();
            set_state.update(|s| s.finish_delete(result, &mut remaining));
            set_selection.set(remaining);
            on_deleted.call(());
        });
    };

    view! {
        <button
            class="btn btn-danger"
            disabled=move || !enabled()
            on:click=on_open
        >
            {move || DeleteConfirm::button_label(selected(), deleting())}
        </button>

        <Show when=move || dialog.with(|d| d.is_open()) fallback=|| ()>
            <div class="modal-backdrop">
                <div class="modal">
                    <p>{move || DeleteConfirm::prompt(selected())}</p>
                    <div class="modal-actions">
                        <button class="btn btn-secondary" on:click=on_cancel>"Cancel"</button>
                        <button class="btn btn-danger" on:click=on_confirm>"Delete"</button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
