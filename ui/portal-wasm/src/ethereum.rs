//! EIP-1193 provider backed by the wallet injected at `window.ethereum`.

use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wp_chain_client::{Eip1193Provider, ProviderError};

#[derive(Serialize)]
struct RequestArguments<'a> {
    method: &'a str,
    params: Value,
}

#[derive(Clone, Debug)]
pub struct InjectedProvider {
    ethereum: JsValue,
}

impl InjectedProvider {
    /// `None` when no wallet extension has injected a provider.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        debug!("found window.ethereum");
        Some(Self { ethereum })
    }

    fn request_fn(&self) -> Result<Function, ProviderError> {
        Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ProviderError::Transport("window.ethereum has no request()".to_owned()))
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let args = JsValue::from_serde(&RequestArguments { method, params })
            .map_err(|err| ProviderError::InvalidResponse(format!("encode {method}: {err}")))?;

        let returned = self
            .request_fn()?
            .call1(&self.ethereum, &args)
            .map_err(provider_error)?;
        let promise = returned
            .dyn_into::<Promise>()
            .map_err(|_| ProviderError::InvalidResponse(format!("{method} did not return a promise")))?;

        let result = JsFuture::from(promise).await.map_err(provider_error)?;
        if result.is_undefined() {
            return Ok(Value::Null);
        }
        result
            .into_serde()
            .map_err(|err| ProviderError::InvalidResponse(format!("{method}: {err}")))
    }
}

/// Map a rejected request to a provider error, keeping its EIP-1193 `code`.
fn provider_error(err: JsValue) -> ProviderError {
    let field = |name: &str| Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code").and_then(|code| code.as_f64());
    let message = field("message")
        .and_then(|message| message.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));

    match code {
        Some(code) => ProviderError::from_rpc(code as i64, message),
        None => ProviderError::Transport(message),
    }
}
