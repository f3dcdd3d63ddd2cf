/// Failures surfaced to the page
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("fetch of {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to load {source_name}: {error}")]
    Model {
        source_name: String,
        #[source]
        error: objview_core::Error,
    },

    #[error("WebGL: {0}")]
    Gl(String),

    #[error("page: {0}")]
    Dom(String),
}

impl From<WebError> for JsValue {
    fn from(error: WebError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

/// Render a thrown JS value for error messages
pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
