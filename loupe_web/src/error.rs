// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use loupe_discovery::DiscoveryConfigError;

/// Error returned when the lightbox cannot be mounted.
///
/// At the `wasm_bindgen` boundary it becomes a JavaScript `Error` carrying
/// the display message.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The configuration string is not valid JSON for the config type.
    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration parsed but holds invalid values.
    #[error("invalid configuration: {0}")]
    Config(#[from] DiscoveryConfigError),
    /// A browser global (window, document, body) is missing.
    #[error("`{0}` is not available")]
    MissingGlobal(&'static str),
    /// A DOM call threw.
    #[error("DOM operation failed: {0}")]
    Dom(String),
    /// Mounting was attempted outside a browser.
    #[error("the diagram lightbox needs a wasm32 browser target")]
    Unsupported,
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
