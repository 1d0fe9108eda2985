//! Configuration loading and shared configuration types for the sync job.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub mod load;
pub mod shared;

pub use load::{LoadConfigError, load_config};

/// A secret string that can be deserialized from configuration sources.
///
/// Wraps [`SecretString`] so that values like API keys and database passwords can be
/// read from files or environment variables while staying redacted in debug output.
/// Intentionally does not implement `Serialize` to avoid accidental leaks.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub struct SerializableSecretString(SecretString);

impl SerializableSecretString {
    /// Returns the wrapped secret value.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for SerializableSecretString {
    fn from(value: String) -> Self {
        Self(SecretString::new(value))
    }
}

impl fmt::Debug for SerializableSecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SerializableSecretString([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_is_redacted() {
        let secret = SerializableSecretString::from("super-secret-key".to_string());

        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_expose_secret_returns_value() {
        let secret = SerializableSecretString::from("value".to_string());

        assert_eq!(secret.expose_secret(), "value");
    }
}
