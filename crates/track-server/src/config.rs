//! Server configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use track_synth::{GeneratorConfig, HeartRatePolicy, TimestampStyle};

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Directory with the front-end page (`STATIC_DIR`).
    pub static_dir: PathBuf,
    /// Activity generation settings (`TIMESTAMP_STYLE`, `HEART_RATE_POLICY`).
    pub generator: GeneratorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("./static"),
            generator: GeneratorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_or("PORT", &lookup, defaults.port);
        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let generator = GeneratorConfig {
            timestamps: parse_or::<TimestampStyle>(
                "TIMESTAMP_STYLE",
                &lookup,
                defaults.generator.timestamps,
            ),
            heart_rate: parse_or::<HeartRatePolicy>(
                "HEART_RATE_POLICY",
                &lookup,
                defaults.generator.heart_rate,
            ),
            ..defaults.generator
        };

        Self {
            host,
            port,
            static_dir,
            generator,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring {key}={raw}: {e}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.static_dir, PathBuf::from("./static"));
        assert_eq!(config.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("STATIC_DIR", "/srv/oval"),
            ("TIMESTAMP_STYLE", "utc"),
            ("HEART_RATE_POLICY", "linear"),
        ]));

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.static_dir, PathBuf::from("/srv/oval"));
        assert_eq!(config.generator.timestamps, TimestampStyle::Utc);
        assert_eq!(config.generator.heart_rate, HeartRatePolicy::linear());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("TIMESTAMP_STYLE", "martian"),
        ]));

        assert_eq!(config.port, 5000);
        assert_eq!(config.generator.timestamps, TimestampStyle::Naive);
    }
}
