//! Projects [`AppState`] onto the page.

use tracing::warn;
use wasm_bindgen::prelude::*;
use wp_portal_core::view::{self, EntryView};
use wp_portal_core::AppState;

use crate::dom::{self, Elements};

const INPUT_HINT: &str = "Type or paste your project link here.";
const CONNECT_HINT: &str = "Connect a Wallet first";

pub fn render(els: &Elements, state: &AppState) {
    if let Err(err) = try_render(els, state) {
        warn!(error = ?err, "render failed");
    }
}

fn try_render(els: &Elements, state: &AppState) -> Result<(), JsValue> {
    let connected = state.is_connected();

    // Only write on change so typing keeps the caret where it is.
    if els.message_input.value() != state.message {
        els.message_input.set_value(&state.message);
    }
    els.message_input.set_disabled(!connected);
    els.message_input
        .set_title(if connected { INPUT_HINT } else { CONNECT_HINT });
    dom::toggle_class(
        &els.message_input,
        "invalid",
        state.validation_error.is_some(),
    );

    dom::show_text(&els.validation_error, state.validation_error.as_deref());
    dom::show_text(&els.network_error, state.network_error.as_deref());
    dom::show_text(
        &els.cancel_notice,
        view::cancellation_notice(state).as_deref(),
    );
    dom::set_visible(&els.connect_btn, !connected);

    match view::status_line(state) {
        Some(line) => {
            dom::set_text(&els.status, &line);
            dom::set_visible(&els.loading, true);
            dom::set_visible(&els.waves, false);
        }
        None => {
            dom::set_visible(&els.loading, false);
            dom::set_visible(&els.waves, true);
            render_waves(els, &view::entries(state))?;
        }
    }
    Ok(())
}

fn render_waves(els: &Elements, entries: &[EntryView]) -> Result<(), JsValue> {
    dom::set_text(&els.waves, "");
    for entry in entries {
        let card = els.create("div", "data")?;
        let address = pair(els, "Address:", &entry.address)?;
        card.append_child(&address)?;
        let time = pair(els, "Time:", &format_time(entry.timestamp_ms))?;
        card.append_child(&time)?;

        let project = pair(els, "Project:", &entry.message)?;
        if let Some(target) = &entry.link {
            let anchor = els.create("a", "")?;
            anchor.set_attribute("href", target)?;
            anchor.set_attribute("target", "_blank")?;
            anchor.set_attribute("rel", "noopener noreferrer")?;
            dom::set_text(&anchor, "🚀");
            project.append_child(&anchor)?;
        }
        card.append_child(&project)?;

        els.waves.append_child(&card)?;
    }
    Ok(())
}

// Text only; messages are untrusted.
fn pair(els: &Elements, label: &str, value: &str) -> Result<web_sys::Element, JsValue> {
    let row = els.create("div", "data-pair")?;
    let heading = els.create("h4", "")?;
    dom::set_text(&heading, label);
    let body = els.create("p", "")?;
    dom::set_text(&body, value);
    row.append_child(&heading)?;
    row.append_child(&body)?;
    Ok(row)
}

fn format_time(timestamp_ms: u64) -> String {
    js_sys::Date::new(&JsValue::from_f64(timestamp_ms as f64))
        .to_string()
        .into()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use wp_api_types::{Address, Submission};

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount() -> Elements {
        let document = web_sys::window().unwrap().document().unwrap();
        document.body().unwrap().set_inner_html(
            r#"<div id="app">
                 <input id="messageInput" /><button id="shareBtn"></button>
                 <button id="connectBtn"></button>
                 <p id="validationError"></p><div id="networkError"></div><p id="cancelNotice"></p>
                 <div id="loading"><p id="status"></p></div><div id="waves"></div>
               </div>"#,
        );
        Elements::bind().unwrap()
    }

    fn submission(message: &str, timestamp_ms: u64) -> Submission {
        Submission {
            sender: Address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_owned()),
            timestamp_ms,
            message: message.to_owned(),
        }
    }

    #[wasm_bindgen_test]
    fn waves_render_newest_first_as_text() {
        let els = mount();
        let state = AppState {
            session: Some(Address("0xabc".to_owned())),
            submissions: vec![
                submission("https://a.io", 1_000),
                submission("<b>bold</b>", 2_000),
            ],
            ..AppState::default()
        };

        render(&els, &state);

        assert_eq!(els.waves.child_element_count(), 2);
        let newest = els.waves.first_element_child().unwrap();
        assert!(newest.text_content().unwrap().contains("<b>bold</b>"));
        assert!(newest.query_selector("a").unwrap().is_none());

        let link = els.waves.query_selector("a").unwrap().unwrap();
        assert_eq!(link.get_attribute("href").as_deref(), Some("https://a.io"));
        assert!(els.connect_btn.class_list().contains(dom::HIDDEN));
        assert!(!els.message_input.disabled());
    }

    #[wasm_bindgen_test]
    fn loading_hides_the_list() {
        let els = mount();
        let state = AppState {
            loading: true,
            status: wp_portal_core::SubmissionStatus::AwaitingConfirmation,
            ..AppState::default()
        };

        render(&els, &state);

        assert!(els.waves.class_list().contains(dom::HIDDEN));
        assert_eq!(
            els.status.text_content().as_deref(),
            Some("Waiting for wallet confirmation")
        );
        assert!(els.message_input.disabled());
    }
}
