//! DOM element bindings. All fields are resolved once at startup.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

pub const HIDDEN: &str = "hidden";

/// All DOM element references used by the page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub window: Window,
    pub document: Document,

    /// `#app`; carries the `data-*` configuration.
    pub root: HtmlElement,

    pub message_input: HtmlInputElement,
    pub share_btn: HtmlElement,
    pub connect_btn: HtmlElement,

    pub validation_error: Element,
    pub network_error: Element,
    pub cancel_notice: Element,

    pub loading: Element,
    pub status: Element,
    pub waves: Element,
}

macro_rules! get_el {
    ($doc:expr, $id:expr) => {
        $doc.get_element_by_id($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($doc:expr, $ty:ty, $id:expr) => {
        get_el!($doc, $id)
            .dyn_into::<$ty>()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a {}", $id, stringify!($ty))))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once the document has loaded.
    pub fn bind() -> Result<Elements, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        Ok(Elements {
            root: get_typed!(document, HtmlElement, "app"),

            message_input: get_typed!(document, HtmlInputElement, "messageInput"),
            share_btn: get_typed!(document, HtmlElement, "shareBtn"),
            connect_btn: get_typed!(document, HtmlElement, "connectBtn"),

            validation_error: get_el!(document, "validationError"),
            network_error: get_el!(document, "networkError"),
            cancel_notice: get_el!(document, "cancelNotice"),

            loading: get_el!(document, "loading"),
            status: get_el!(document, "status"),
            waves: get_el!(document, "waves"),

            window,
            document,
        })
    }

    pub fn create(&self, tag: &str, class: &str) -> Result<Element, JsValue> {
        let el = self.document.create_element(tag)?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        Ok(el)
    }
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_visible(el: &Element, visible: bool) {
    toggle_class(el, HIDDEN, !visible);
}

/// Show `text` in `el`, or hide `el` when there is nothing to show.
pub fn show_text(el: &Element, text: Option<&str>) {
    set_text(el, text.unwrap_or_default());
    set_visible(el, text.is_some());
}
