use leptos::*;

use crate::config::APP_NAME;

#[component]
pub fn Header(children: Children) -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">{APP_NAME}</a>
                <span class="badge">"bronze · silver · gold"</span>
            </div>
            <div class="header-right">{children()}</div>
        </header>
    }
}
