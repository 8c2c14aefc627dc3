use dioxus::prelude::*;

use super::app::Route;
use super::http::use_market;
use super::shell::use_shell;

fn page_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

fn segments_of(href: &str) -> Vec<String> {
    href.trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Server-rendered page shown inside the app layout, with the page loader
/// up while it is fetched.
#[component]
pub fn RemoteContent(segments: ReadSignal<Vec<String>>) -> Element {
    let market = use_market();
    let shell = use_shell();

    let page = use_resource(move || {
        let market = market.clone();
        let path = page_path(&segments.read());
        async move {
            let loader = shell.loading();
            let result = market.fetch_page(&path).await;
            drop(loader);
            match result {
                Ok(html) => Some(html),
                Err(e) => {
                    tracing::warn!("Loading {path} failed: {e}");
                    shell.error("Failed to load content");
                    None
                }
            }
        }
    });

    match page.read().clone().flatten() {
        Some(html) => rsx! {
            div { class: "remote-page", dangerous_inner_html: "{html}" }
        },
        None => rsx! {},
    }
}

/// In-app link that loads a server page into the main content area.
#[component]
pub fn ContentLink(href: String, #[props(default)] class: String, children: Element) -> Element {
    let nav = use_navigator();
    let segments = segments_of(&href);

    rsx! {
        a {
            class: "load-content {class}",
            href: "{href}",
            onclick: move |evt: MouseEvent| {
                evt.prevent_default();
                nav.push(Route::RemotePage { segments: segments.clone() });
            },
            {children}
        }
    }
}
