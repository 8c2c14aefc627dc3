//! Thin wrappers over browser APIs. Native builds get inert stand-ins so the
//! components type-check off the web.

use std::time::Duration;

/// Log a message to the browser console.
pub fn clog(msg: &str) {
    #[cfg(target_family = "wasm")]
    web_sys::console::log_1(&msg.into());
    #[cfg(not(target_family = "wasm"))]
    let _ = msg;
}

/// Resolve after `period`. Never resolves off the web, so timers and polls
/// simply do not run there.
pub async fn sleep(period: Duration) {
    #[cfg(target_family = "wasm")]
    gloo_timers::future::TimeoutFuture::new(period.as_millis().min(u32::MAX as u128) as u32).await;
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = period;
        std::future::pending::<()>().await;
    }
}

/// Value of a `?name=` parameter on the current page URL.
pub fn query_param(name: &str) -> Option<String> {
    #[cfg(target_family = "wasm")]
    {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|qs| web_sys::UrlSearchParams::new_with_str(&qs).ok()?.get(name))
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = name;
        None
    }
}

/// `data-*` attribute of `<body>`, keyed in camelCase (`userType`).
pub fn body_data(key: &str) -> Option<String> {
    #[cfg(target_family = "wasm")]
    {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .and_then(|b| b.dataset().get(key))
            .filter(|v| !v.is_empty())
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = key;
        None
    }
}

/// Full page navigation.
pub fn navigate_to(url: &str) {
    #[cfg(target_family = "wasm")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                clog(&format!("[AGRI] Navigation to {url} failed: {e:?}"));
            }
        }
    }
    #[cfg(not(target_family = "wasm"))]
    tracing::debug!("navigate_to({url}) ignored off the web");
}

/// Blocking confirm dialog. Off the web nothing is confirmed.
pub fn confirm(message: &str) -> bool {
    #[cfg(target_family = "wasm")]
    {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = message;
        false
    }
}

pub fn is_online() -> bool {
    #[cfg(target_family = "wasm")]
    {
        web_sys::window()
            .map(|w| w.navigator().on_line())
            .unwrap_or(true)
    }
    #[cfg(not(target_family = "wasm"))]
    true
}

/// Call `on_change(online)` whenever the browser goes on- or offline.
pub fn watch_connectivity(on_change: impl Fn(bool) + 'static) {
    #[cfg(target_family = "wasm")]
    {
        use std::rc::Rc;
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let Some(window) = web_sys::window() else {
            return;
        };
        let on_change = Rc::new(on_change);
        for (event, online) in [("online", true), ("offline", false)] {
            let cb = on_change.clone();
            let handler = Closure::<dyn Fn()>::new(move || cb(online));
            if let Err(e) =
                window.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            {
                clog(&format!("[AGRI] Could not watch {event}: {e:?}"));
            }
            // Lives as long as the page.
            handler.forget();
        }
    }
    #[cfg(not(target_family = "wasm"))]
    let _ = on_change;
}

#[cfg(target_family = "wasm")]
thread_local! {
    static DEFERRED_INSTALL: std::cell::RefCell<Option<web_sys::Event>> =
        const { std::cell::RefCell::new(None) };
}

/// Hold back the browser's install banner and call `on_available` instead.
pub fn capture_install_prompt(on_available: impl Fn() + 'static) {
    #[cfg(target_family = "wasm")]
    {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let Some(window) = web_sys::window() else {
            return;
        };
        let handler = Closure::<dyn Fn(web_sys::Event)>::new(move |evt: web_sys::Event| {
            evt.prevent_default();
            DEFERRED_INSTALL.with(|slot| *slot.borrow_mut() = Some(evt));
            on_available();
        });
        if let Err(e) = window.add_event_listener_with_callback(
            "beforeinstallprompt",
            handler.as_ref().unchecked_ref(),
        ) {
            clog(&format!("[AGRI] Could not watch beforeinstallprompt: {e:?}"));
        }
        handler.forget();
    }
    #[cfg(not(target_family = "wasm"))]
    let _ = on_available;
}

/// Show the held-back install prompt, if any. Returns whether one was shown.
pub fn show_install_prompt() -> bool {
    #[cfg(target_family = "wasm")]
    {
        use wasm_bindgen::JsCast;

        let Some(evt) = DEFERRED_INSTALL.with(|slot| slot.borrow_mut().take()) else {
            return false;
        };
        let prompt = js_sys::Reflect::get(&evt, &"prompt".into())
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        match prompt.map(|f| f.call0(&evt)) {
            Some(Ok(_)) => true,
            Some(Err(e)) => {
                clog(&format!("[AGRI] Install prompt failed: {e:?}"));
                false
            }
            None => false,
        }
    }
    #[cfg(not(target_family = "wasm"))]
    false
}

/// Drop the held-back install prompt without showing it.
pub fn dismiss_install_prompt() {
    #[cfg(target_family = "wasm")]
    DEFERRED_INSTALL.with(|slot| slot.borrow_mut().take());
}

/// Object URL previewing an image the user picked.
pub fn image_preview_url(bytes: &[u8], content_type: &str) -> Option<String> {
    #[cfg(target_family = "wasm")]
    {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let props = web_sys::BlobPropertyBag::new();
        props.set_type(content_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &props).ok()?;
        web_sys::Url::create_object_url_with_blob(&blob).ok()
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = (bytes, content_type);
        None
    }
}

pub fn revoke_preview_url(url: &str) {
    #[cfg(target_family = "wasm")]
    let _ = web_sys::Url::revoke_object_url(url);
    #[cfg(not(target_family = "wasm"))]
    let _ = url;
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date as `YYYY-MM-DD`, for date-input minimums.
pub fn today_iso() -> String {
    agrimarket_common::dates::iso_date(chrono::Local::now().date_naive())
}
