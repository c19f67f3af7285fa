#![allow(dead_code)]

use chat_relay::config::RelayConfig;
use service_core::config::Config;

/// Configuration pointing at a random local port with a fake credential.
pub fn test_config(verify_on_startup: bool) -> RelayConfig {
    let common = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    };

    RelayConfig::from_lookup(common, |key| match key {
        "GEMINI_API_KEY" => Some("test-api-key".to_string()),
        "GEMINI_VERIFY_ON_STARTUP" => Some(verify_on_startup.to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}
