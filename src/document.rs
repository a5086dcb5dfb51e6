use crate::jar::{CookieJar, UnavailableContext};

/// The cookie jar of the current browser document, i.e. `document.cookie`.
///
/// It is only backed by a real document when compiled for `wasm32` with
/// the `wasm` feature enabled, and when a global `document` object exists
/// (web workers, for example, don't have one).
/// Everywhere else, every read and write reports [`UnavailableContext`].
///
/// ```rust
/// use crumb::{CookieJar, DocumentJar};
///
/// # #[cfg(not(target_arch = "wasm32"))]
/// assert!(DocumentJar.read().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentJar;

impl CookieJar for DocumentJar {
    fn read(&self) -> Result<String, UnavailableContext> {
        imp::read()
    }

    fn write(&self, cookie: &str) -> Result<(), UnavailableContext> {
        imp::write(cookie)
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod imp {
    use js_sys::Reflect;
    use wasm_bindgen::JsValue;

    use crate::jar::UnavailableContext;

    fn document() -> Result<JsValue, UnavailableContext> {
        let document = Reflect::get(&js_sys::global(), &JsValue::from_str("document"))
            .map_err(|_| UnavailableContext)?;
        if document.is_undefined() || document.is_null() {
            return Err(UnavailableContext);
        }
        Ok(document)
    }

    pub(super) fn read() -> Result<String, UnavailableContext> {
        let document = document()?;
        Reflect::get(&document, &JsValue::from_str("cookie"))
            .ok()
            .and_then(|cookie| cookie.as_string())
            .ok_or(UnavailableContext)
    }

    pub(super) fn write(cookie: &str) -> Result<(), UnavailableContext> {
        let document = document()?;
        Reflect::set(
            &document,
            &JsValue::from_str("cookie"),
            &JsValue::from_str(cookie),
        )
        .map(|_| ())
        .map_err(|_| UnavailableContext)
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
mod imp {
    use crate::jar::UnavailableContext;

    pub(super) fn read() -> Result<String, UnavailableContext> {
        Err(UnavailableContext)
    }

    pub(super) fn write(_cookie: &str) -> Result<(), UnavailableContext> {
        Err(UnavailableContext)
    }
}
