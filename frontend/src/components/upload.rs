//! Upload dialog: pick a container and one file, send it base64-encoded.
//!
//! The form rules (submit enabled, status line) live in `UploadForm`; this
//! component only feeds it browser events.

use docflow_core::{
    encode_upload, Container, PickedFile, StorageApi, UploadError, UploadForm, UploadStatus,
};
use leptos::*;
use web_sys::{Event, File, HtmlInputElement, SubmitEvent};

use crate::config::{MAX_FILE_SIZE, UPLOAD_CLOSE_DELAY};
use crate::services::{read_file, GlooApi};

#[component]
pub fn UploadDialog(
    /// Called once the server accepted the file
    on_uploaded: Callback<()>,
) -> impl IntoView {
    let (is_open, set_is_open) = create_signal(false);
    let form = create_rw_signal(UploadForm::new(MAX_FILE_SIZE));
    // The browser handle of the picked file, the form only keeps its metadata.
    let picked = store_value(None::<File>);

    let close = move || {
        set_is_open.set(false);
        form.update(|f| f.reset());
        picked.set_value(None);
    };

    let on_container_change = move |ev: Event| {
        if let Ok(container) = event_target_value(&ev).parse::<Container>() {
            form.update(|f| f.set_container(container));
        }
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let file = input.files().and_then(|files| files.get(0));
        let meta = file.as_ref().map(|f| PickedFile {
            name: f.name(),
            size: f.size() as u64,
        });
        form.update(|f| f.pick_file(meta));
        picked.set_value(file);
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let mut begun = Err(UploadError::NoFile);
        form.update(|f| begun = f.begin());
        let meta = match begun {
            Ok(meta) => meta,
            Err(e) => {
                log::warn!("Upload not started: {}", e);
                return;
            }
        };
        let Some(file) = picked.get_value() else {
            form.update(|f| f.finish(Err(UploadError::NoFile)));
            return;
        };
        let container = form.with_untracked(|f| f.container());

        spawn_local(async move {
            log::info!("Uploading {} ({} bytes) to {}", meta.name, meta.size, container);
            let result = match read_file(&file).await {
                Ok(bytes) => {
                    let request = encode_upload(container, &meta.name, &bytes);
                    GlooApi::default()
                        .upload(&request)
                        .await
                        .map(|_| ())
                        .map_err(UploadError::from)
                }
                Err(e) => {
                    log::error!("{}", e);
                    Err(UploadError::Read(e))
                }
            };
            let succeeded = result.is_ok();
            form.update(|f| f.finish(result));

            if succeeded {
                on_uploaded.call(());
                gloo_timers::future::sleep(UPLOAD_CLOSE_DELAY).await;
                close();
            }
        });
    };

    view! {
        <button class="btn btn-primary" on:click=move |_| set_is_open.set(true)>
            "Upload File"
        </button>

        <Show when=move || is_open.get() fallback=|| ()>
            <div class="modal-backdrop">
                <form class="modal upload-form" on:submit=on_submit>
                    <label>
                        "Container"
                        <select
                            on:change=on_container_change
                            prop:disabled=move || form.with(|f| f.is_busy())
                        >
                            {Container::ALL
                                .into_iter()
                                .map(|c| view! {
                                    <option
                                        value=c.as_str()
                                        selected=move || form.with(|f| f.container() == c)
                                    >
                                        {c.as_str()}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </label>
                    <input
                        type="file"
                        on:change=on_file_change
                        prop:disabled=move || form.with(|f| f.is_busy())
                    />

                    {move || match form.with(|f| f.status().clone()) {
                        UploadStatus::Idle => None,
                        UploadStatus::Uploading => Some(view! {
                            <p class="upload-status log-info">"Uploading..."</p>
                        }),
                        UploadStatus::Succeeded(message) => Some(view! {
                            <p class="upload-status log-success">{message}</p>
                        }),
                        UploadStatus::Failed(message) => Some(view! {
                            <p class="upload-status log-error">{message}</p>
                        }),
                    }}

                    <div class="modal-actions">
                        <button
                            type="button"
                            class="btn btn-secondary"
                            disabled=move || form.with(|f| f.is_busy())
                            on:click=move |_| close()
                        >
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class="btn btn-primary"
                            disabled=move || !form.with(|f| f.can_submit())
                        >
                            {move || form.with(|f| f.submit_label())}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
