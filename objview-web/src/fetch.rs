/// Fetching OBJ text over HTTP with the browser's fetch API
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::{describe, WebError};

/// Fetch the whole body of `url` as text; no retry
pub async fn fetch_text(url: &str) -> Result<String, WebError> {
    let network = |reason: String| WebError::Network {
        url: url.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| network("no window".into()))?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    let request =
        Request::new_with_str_and_init(url, &init).map_err(|e| network(describe(&e)))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| network(describe(&e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| network("fetch did not resolve to a Response".into()))?;
    if !response.ok() {
        return Err(network(format!("HTTP {}", response.status())));
    }

    let body = response.text().map_err(|e| network(describe(&e)))?;
    let text = JsFuture::from(body)
        .await
        .map_err(|e| network(describe(&e)))?;
    text.as_string()
        .ok_or_else(|| network("response body is not text".into()))
}
