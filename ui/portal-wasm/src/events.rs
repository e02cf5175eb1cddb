//! Event binding. Wires the page's listeners to the portal.

use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::dom::Elements;
use crate::AppPortal;

/// Attach an async handler for `$event`; each firing runs on its own task.
macro_rules! on_async {
    ($el:expr, $event:literal, $portal:expr, $handler:expr) => {{
        let portal = Rc::clone($portal);
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let portal = Rc::clone(&portal);
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&portal).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback($event, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Attach a sync handler for `$event`.
macro_rules! on_event {
    ($el:expr, $event:literal, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::Event)>);
        $el.add_event_listener_with_callback($event, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all listeners. Call once after init.
pub fn bind_events(els: &Elements, portal: &AppPortal) -> Result<(), JsValue> {
    on_async!(els.connect_btn, "click", portal, on_connect);
    on_async!(els.share_btn, "click", portal, on_share);

    {
        let portal = Rc::clone(portal);
        let input = els.message_input.clone();
        on_event!(els.message_input, "input", move |_: web_sys::Event| {
            portal.set_message(input.value());
        });
    }
    {
        let portal = Rc::clone(portal);
        on_event!(els.message_input, "blur", move |_: web_sys::Event| {
            portal.verify_input();
        });
    }

    Ok(())
}

async fn on_connect(portal: &AppPortal) {
    if let Some(account) = portal.connect_wallet().await {
        debug!(%account, "wallet connected from the page");
    }
}

async fn on_share(portal: &AppPortal) {
    let outcome = portal.share_link().await;
    debug!(?outcome, "share finished");
}
