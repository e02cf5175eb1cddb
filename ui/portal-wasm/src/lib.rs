//! WavePortal WASM front end.
//!
//! Binds the page to a [`Portal`] driven by the wallet injected at
//! `window.ethereum`. Each concern lives in its own module.

pub mod config;
pub mod dom;
pub mod ethereum;
pub mod events;
pub mod host;
pub mod logging;
pub mod render;

use std::rc::Rc;
use tracing::info;
use wasm_bindgen::prelude::*;
use wp_portal_core::Portal;

use crate::ethereum::InjectedProvider;
use crate::host::BrowserHost;

pub type AppPortal = Rc<Portal<InjectedProvider, BrowserHost>>;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = config::from_root(&els.root);

    let provider = InjectedProvider::detect();
    if provider.is_none() {
        info!("Make sure you have MetaMask!");
    }

    let portal = Portal::new(config, provider, BrowserHost::new(els.clone()));
    portal.render();
    events::bind_events(&els, &portal)?;

    // Silent reconnect; never prompts the wallet.
    portal.check_wallet().await;

    Ok(())
}
