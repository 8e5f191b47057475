//! File browser: one list per container, one checkbox per file.
//!
//! The selection belongs to the caller; this component only toggles it.

use docflow_core::{BrowserState, Container, FileRef, Selection, StorageApi};
use leptos::*;

use crate::components::{DeleteButton, UploadDialog};
use crate::services::GlooApi;

#[component]
pub fn FileBrowser(
    selection: ReadSignal<Selection>,
    set_selection: WriteSignal<Selection>,
) -> impl IntoView {
    let (state, set_state) = create_signal(BrowserState::new());

    let refresh = move || {
        let mut started = false;
        set_state.update(|s| started = s.begin_refresh());
        if !started {
            return;
        }
        spawn_local(async move {
            let api = GlooApi::default();
            // Requests made while a fetch is in flight are answered by one more.
            loop {
                let result = api.list_files().await;
                let mut again = false;
                set_state.update(|s| again = s.finish_refresh(result));
                if !again {
                    break;
                }
            }
        });
    };
    let on_changed = Callback::new(move |_: ()| refresh());

    refresh();

    view! {
        <div class="file-browser">
            <div class="toolbar">
                <button
                    class="btn btn-secondary"
                    disabled=move || state.with(|s| s.is_refreshing())
                    on:click=move |_| refresh()
                >
                    {move || {
                        if state.with(|s| s.is_refreshing()) { "Refreshing..." } else { "Refresh" }
                    }}
                </button>
                <UploadDialog on_uploaded=on_changed/>
                <DeleteButton
                    selection=selection
                    set_selection=set_selection
                    state=state
                    set_state=set_state
                    on_deleted=on_changed
                />
            </div>

            {move || state.with(|s| s.error().map(str::to_string)).map(|message| view! {
                <div class="error-message">{message}</div>
            })}

            {Container::ALL
                .into_iter()
                .map(|container| view! {
                    <ContainerList
                        container=container
                        state=state
                        selection=selection
                        set_selection=set_selection
                    />
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn ContainerList(
    container: Container,
    state: ReadSignal<BrowserState>,
    selection: ReadSignal<Selection>,
    set_selection: WriteSignal<Selection>,
) -> impl IntoView {
    let files = move || state.with(|s| s.listing().files(container).to_vec());

    view! {
        <section class="container-list">
            <h3>"Container: " {container.as_str()}</h3>
            {move || {
                let files = files();
                if files.is_empty() {
                    view! { <p class="empty">"No files present"</p> }.into_view()
                } else {
                    view! {
                        <ul>
                            {files
                                .into_iter()
                                .map(|file| view! {
                                    <FileRow
                                        file=file
                                        selection=selection
                                        set_selection=set_selection
                                    />
                                })
                                .collect_view()}
                        </ul>
                    }
                    .into_view()
                }
            }}
        </section>
    }
}

#[component]
fn FileRow(
    file: FileRef,
    selection: ReadSignal<Selection>,
    set_selection: WriteSignal<Selection>,
) -> impl IntoView {
    let id = file.path();
    let checked = {
        let file = file.clone();
        move || selection.with(|s| s.is_selected(&file))
    };
    let toggle = {
        let file = file.clone();
        move |_| {
            set_selection.update(|s| {
                s.toggle(&file);
            })
        }
    };

    view! {
        <li class="file-row">
            <input type="checkbox" id=id.clone() prop:checked=checked on:change=toggle/>
            <label for=id>{file.name.clone()}</label>
            " "
            <a href=file.url.clone() target="_blank" rel="noopener">"open"</a>
        </li>
    }
}
