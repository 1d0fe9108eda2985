use serde::Deserialize;

use crate::SerializableSecretString;

const fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for the upstream ERP REST API.
///
/// This intentionally does not implement `Serialize` to avoid accidentally
/// leaking the API key into serialized forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SourceApiConfig {
    /// Base URL of the ERP API, e.g. `https://api.example-erp.com`.
    pub base_url: String,
    /// Bearer token used to authenticate requests. Sensitive and redacted in debug output.
    pub api_key: SerializableSecretString,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults_when_missing() {
        let config: SourceApiConfig = serde_json::from_value(serde_json::json!({
            "base_url": "https://api.example-erp.com",
            "api_key": "key",
        }))
        .unwrap();

        assert_eq!(config.timeout_secs, 30);
    }
}
