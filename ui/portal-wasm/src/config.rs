//! Page configuration from `data-*` attributes on `#app`.

use std::str::FromStr;
use tracing::warn;
use web_sys::HtmlElement;
use wp_api_types::PortalConfig;

/// Read the config from `root`. Missing attributes keep their defaults.
pub fn from_root(root: &HtmlElement) -> PortalConfig {
    overlay(PortalConfig::default(), |name| {
        root.get_attribute(&format!("data-{name}"))
    })
}

/// Overlay looked-up values onto `config`. Recognised names: `contract`,
/// `chain-id`, `network-name`, `gas-limit`, `feed-poll-ms` and
/// `receipt-poll-ms`. Unparseable numbers are logged and ignored.
pub fn overlay(mut config: PortalConfig, lookup: impl Fn(&str) -> Option<String>) -> PortalConfig {
    let text = |name: &str| {
        lookup(name)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    };

    if let Some(address) = text("contract") {
        config.contract_address = address;
    }
    if let Some(name) = text("network-name") {
        config.network_name = name;
    }
    set_number(&mut config.chain_id, "chain-id", text("chain-id"));
    set_number(&mut config.gas_limit, "gas-limit", text("gas-limit"));
    set_number(
        &mut config.feed_poll_interval_ms,
        "feed-poll-ms",
        text("feed-poll-ms"),
    );
    set_number(
        &mut config.receipt_poll_interval_ms,
        "receipt-poll-ms",
        text("receipt-poll-ms"),
    );
    config
}

fn set_number<T: FromStr>(slot: &mut T, name: &str, raw: Option<String>) {
    let Some(raw) = raw else {
        return;
    };
    match raw.parse() {
        Ok(value) => *slot = value,
        Err(_) => warn!(attribute = name, value = %raw, "ignoring unparseable config value"),
    }
}
