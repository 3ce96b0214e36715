//! Configuration schema types for achat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Where the chat server lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// WebSocket URL of the streaming chat endpoint.
    pub url: String,
    /// Seconds to wait for the WebSocket handshake.
    pub connect_timeout_secs: u32,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:5012/ds-ws".into(),
            connect_timeout_secs: 15,
        }
    }
}

/// Static identifying fields sent with every create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub user_uuid: String,
    /// Originating-channel tag.
    pub from: String,
    /// Application id the server routes on.
    pub pid: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_uuid: "user_uuid".into(),
            from: "achat".into(),
            pid: "GoWeaviateDeepseek".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Oldest messages are dropped past this many.
    pub max_messages: u32,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self { max_messages: 1000 }
    }
}

/// Toast language and per-key overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub locale: String,
    pub strings: BTreeMap<String, String>,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            locale: "zh-CN".into(),
            strings: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "achat=info".into(),
        }
    }
}

/// Top-level achat configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AchatConfig {
    pub endpoint: EndpointConfig,
    pub identity: IdentityConfig,
    pub transcript: TranscriptConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_server() {
        let config = AchatConfig::default();
        assert_eq!(config.endpoint.url, "ws://localhost:5012/ds-ws");
        assert_eq!(config.identity.from, "achat");
        assert_eq!(config.identity.pid, "GoWeaviateDeepseek");
        assert_eq!(config.identity.user_uuid, "user_uuid");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AchatConfig = toml::from_str("").unwrap();
        assert_eq!(config.endpoint.connect_timeout_secs, 15);
        assert_eq!(config.transcript.max_messages, 1000);
        assert_eq!(config.notifications.locale, "zh-CN");
        assert!(config.notifications.strings.is_empty());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: AchatConfig = toml::from_str(
            r#"
[endpoint]
url = "wss://chat.example.com/ds-ws"

[notifications.strings]
"notification.copied" = "Got it"
"#,
        )
        .unwrap();
        assert_eq!(config.endpoint.url, "wss://chat.example.com/ds-ws");
        assert_eq!(config.endpoint.connect_timeout_secs, 15);
        assert_eq!(
            config.notifications.strings.get("notification.copied"),
            Some(&"Got it".to_string())
        );
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = AchatConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: AchatConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.identity.pid, config.identity.pid);
        assert_eq!(parsed.logging.level, config.logging.level);
    }
}
