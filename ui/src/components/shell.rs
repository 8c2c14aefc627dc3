//! Application shell: toasts, connectivity, install prompt, page loader and
//! the refresh signal dashboards listen on.

use dioxus::prelude::*;

use agrimarket_common::timing::deadline_after;

use super::browser;
use super::config::{TOAST_DURATION, TOAST_SWEEP};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn alert_class(self) -> &'static str {
        match self {
            ToastKind::Success => "alert-success",
            ToastKind::Error => "alert-danger",
            ToastKind::Info => "alert-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
    /// Epoch milliseconds after which the shell hides it.
    pub expires_at: i64,
}

/// UI-wide state owned by the shell.
#[derive(Clone, Debug)]
pub struct ShellState {
    /// At most one toast; a new one replaces it.
    pub toast: Option<Toast>,
    next_toast_id: u64,
    pub online: bool,
    pub install_available: bool,
    pub loading: bool,
}

impl ShellState {
    pub fn new(online: bool) -> Self {
        Self {
            toast: None,
            next_toast_id: 1,
            online,
            install_available: false,
            loading: false,
        }
    }

    pub fn push_toast(&mut self, kind: ToastKind, text: impl Into<String>, now_ms: i64) -> u64 {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toast = Some(Toast {
            id,
            kind,
            text: text.into(),
            expires_at: deadline_after(now_ms, TOAST_DURATION),
        });
        id
    }

    pub fn toast_expired(&self, now_ms: i64) -> bool {
        self.toast.as_ref().is_some_and(|t| now_ms >= t.expires_at)
    }

    /// Hide the toast if its time is up. Returns whether one was hidden.
    pub fn expire_toast(&mut self, now_ms: i64) -> bool {
        let expired = self.toast_expired(now_ms);
        if expired {
            self.toast = None;
        }
        expired
    }

    /// Hide toast `id` if it is still the one showing.
    pub fn dismiss_toast(&mut self, id: u64) {
        if self.toast.as_ref().is_some_and(|t| t.id == id) {
            self.toast = None;
        }
    }
}

/// Handle to the shell, copied into event handlers.
#[derive(Clone, Copy, PartialEq)]
pub struct Shell {
    state: Signal<ShellState>,
    /// Bumped after a successful mutation; dashboards re-fetch on change.
    refresh: Signal<u32>,
}

impl Shell {
    pub fn state(&self) -> Signal<ShellState> {
        self.state
    }

    /// Show a toast. The sweeper installed by [`use_shell_provider`] hides
    /// it once [`TOAST_DURATION`] has passed, whatever happens to the caller.
    pub fn show_message(&self, text: impl Into<String>, kind: ToastKind) {
        let mut state = self.state;
        let text = text.into();
        if kind == ToastKind::Error {
            tracing::warn!("{text}");
        }
        state.write().push_toast(kind, text, browser::now_millis());
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show_message(text, ToastKind::Success);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show_message(text, ToastKind::Error);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show_message(text, ToastKind::Info);
    }

    pub fn set_loading(&self, loading: bool) {
        let mut state = self.state;
        state.write().loading = loading;
    }

    /// Raise the page loader until the returned guard drops, including when
    /// the owning task is cancelled mid-await.
    pub fn loading(&self) -> OnDrop<impl FnOnce()> {
        let shell = *self;
        shell.set_loading(true);
        OnDrop::new(move || shell.set_loading(false))
    }

    pub fn request_refresh(&self) {
        let mut refresh = self.refresh;
        refresh += 1;
    }

    /// Current refresh generation; reading it subscribes the caller.
    pub fn refresh_generation(&self) -> u32 {
        *self.refresh.read()
    }
}

/// Runs `f` once when dropped.
pub struct OnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> OnDrop<F> {
    pub fn new(f: F) -> Self {
        Self(Some(f))
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

/// Install the shell context, its toast sweeper and its browser listeners.
/// Call once at the root, so the sweeper lives as long as the app.
pub fn use_shell_provider() -> Shell {
    let mut state = use_context_provider(|| Signal::new(ShellState::new(browser::is_online())));
    let refresh = use_signal(|| 0u32);
    let shell = use_context_provider(|| Shell { state, refresh });
    use_future(move || async move {
        loop {
            browser::sleep(TOAST_SWEEP).await;
            let now = browser::now_millis();
            if state.peek().toast_expired(now) {
                state.write().expire_toast(now);
            }
        }
    });
    use_hook(move || {
        browser::watch_connectivity(move |online| {
            let mut connectivity = state;
            connectivity.write().online = online;
            browser::clog(if online {
                "[AGRI] Back online"
            } else {
                "[AGRI] Offline"
            });
        });
        browser::capture_install_prompt(move || {
            let mut install = state;
            install.write().install_available = true;
        });
    });
    shell
}

pub fn use_shell() -> Shell {
    use_context::<Shell>()
}

#[component]
pub fn ToastHost() -> Element {
    let shell = use_shell();
    let mut state = shell.state();
    let toast = state.read().toast.clone();

    let Some(toast) = toast else {
        return rsx! {};
    };
    let class = format!(
        "alert {} alert-dismissible fade show toast-message",
        toast.kind.alert_class()
    );
    let id = toast.id;

    rsx! {
        div { class: "toast-container position-fixed top-0 end-0 p-3",
            div { class: "{class}", role: "alert",
                "{toast.text}"
                button {
                    r#type: "button",
                    class: "btn-close",
                    aria_label: "Close",
                    onclick: move |_| state.write().dismiss_toast(id),
                }
            }
        }
    }
}

#[component]
pub fn OfflineIndicator() -> Element {
    let shell = use_shell();
    let online = shell.state().read().online;

    if online {
        return rsx! {};
    }
    rsx! {
        div { class: "offline-indicator alert alert-warning text-center mb-0",
            "You are offline. Some features may not be available."
        }
    }
}

#[component]
pub fn InstallPrompt() -> Element {
    let shell = use_shell();
    let mut state = shell.state();
    if !state.read().install_available {
        return rsx! {};
    }

    rsx! {
        div { class: "install-prompt alert alert-info d-flex justify-content-between align-items-center",
            span { "Install AgriMarket as an app?" }
            div {
                button {
                    class: "btn btn-sm btn-primary me-2",
                    onclick: move |_| {
                        if browser::show_install_prompt() {
                            browser::clog("[AGRI] Install prompt shown");
                        }
                        state.write().install_available = false;
                    },
                    "Install"
                }
                button {
                    class: "btn btn-sm btn-outline-secondary",
                    onclick: move |_| {
                        browser::dismiss_install_prompt();
                        state.write().install_available = false;
                    },
                    "Later"
                }
            }
        }
    }
}

#[component]
pub fn PageLoader() -> Element {
    let shell = use_shell();
    if !shell.state().read().loading {
        return rsx! {};
    }
    rsx! {
        div { class: "page-loader",
            div { class: "spinner-border text-success", role: "status",
                span { class: "visually-hidden", "Loading..." }
            }
        }
    }
}
