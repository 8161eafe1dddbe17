//! Access to the address bar. There is none natively so there everything is a
//! no-op and the router is the only source of truth.

#[cfg(not(target_arch = "wasm32"))]
pub fn current() -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn push(_location: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn replace(_location: &str) {}

#[cfg(target_arch = "wasm32")]
pub use web::{current, push, replace};

#[cfg(target_arch = "wasm32")]
mod web {
    use tracing::warn;
    use web_sys::wasm_bindgen::JsValue;

    /// Path and query of the page
    pub fn current() -> Option<String> {
        let location = web_sys::window()?.location();
        let path = location.pathname().ok()?;
        let query = location.search().ok().unwrap_or_default();
        Some(format!("{path}{query}"))
    }

    pub fn push(location: &str) {
        let Some(history) = web_sys::window().and_then(|x| x.history().ok()) else {
            warn!("no history available");
            return;
        };
        if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(location)) {
            warn!("failed to push location {location:?}: {e:?}");
        }
    }

    pub fn replace(location: &str) {
        let Some(history) = web_sys::window().and_then(|x| x.history().ok()) else {
            warn!("no history available");
            return;
        };
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(location)) {
            warn!("failed to replace location {location:?}: {e:?}");
        }
    }
}
