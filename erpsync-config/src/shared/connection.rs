use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::SerializableSecretString;

const fn default_port() -> u16 {
    5432
}

/// Session parameters applied to every warehouse connection.
#[derive(Debug, Clone, Copy)]
pub struct DefaultPgConnectionOptions;

impl DefaultPgConnectionOptions {
    /// Returns the options as key-value pairs suitable for sqlx.
    ///
    /// The date style and time zone are pinned so that text renderings of date and
    /// timestamp values are stable regardless of server defaults.
    pub fn to_key_value_pairs() -> Vec<(String, String)> {
        vec![
            ("datestyle".to_string(), "ISO".to_string()),
            ("TimeZone".to_string(), "UTC".to_string()),
            ("client_encoding".to_string(), "UTF8".to_string()),
        ]
    }
}

/// Configuration for connecting to the warehouse Postgres database.
///
/// This intentionally does not implement `Serialize` to avoid accidentally
/// leaking the password into serialized forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WarehouseConnectionConfig {
    /// Hostname or IP address of the warehouse server.
    pub host: String,
    /// Port number on which the warehouse server is listening.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Name of the warehouse database to connect to.
    pub name: String,
    /// Username for authenticating with the warehouse.
    pub username: String,
    /// Password for the specified user. Sensitive and redacted in debug output.
    pub password: Option<SerializableSecretString>,
}

impl WarehouseConnectionConfig {
    /// Creates sqlx connection options for the configured warehouse database.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.username)
            .options(DefaultPgConnectionOptions::to_key_value_pairs());

        if let Some(password) = &self.password {
            options = options.password(password.expose_secret());
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_options_pin_iso_dates_in_utc() {
        let pairs = DefaultPgConnectionOptions::to_key_value_pairs();

        assert!(pairs.contains(&("datestyle".to_string(), "ISO".to_string())));
        assert!(pairs.contains(&("TimeZone".to_string(), "UTC".to_string())));
    }

    #[test]
    fn test_port_defaults_when_missing() {
        let config: WarehouseConnectionConfig = serde_json::from_value(serde_json::json!({
            "host": "warehouse.internal",
            "name": "reporting",
            "username": "loader",
        }))
        .unwrap();

        assert_eq!(config.port, 5432);
        assert!(config.password.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config: WarehouseConnectionConfig = serde_json::from_value(serde_json::json!({
            "host": "warehouse.internal",
            "port": 5433,
            "name": "reporting",
            "username": "loader",
            "password": "hunter2",
        }))
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
