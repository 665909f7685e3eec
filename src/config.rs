use crate::errors::ConfigError;
use crate::models::ClaimRules;
use crate::storage::DEFAULT_DATA_PATH;
use std::{env, path::PathBuf, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Mock,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub api_base: Option<String>,
    pub backend: BackendMode,
    pub rules: ClaimRules,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ClaimRules::default();

        let port = parse_var(&lookup, "PORT", "port number")?.unwrap_or(8080);
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let api_base = lookup("API_BASE")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty());

        let backend = match lookup("ECONOMY_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("mock") => BackendMode::Mock,
            Some("http") => BackendMode::Http,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "ECONOMY_BACKEND",
                    kind: "backend (mock or http)",
                    value: other.to_string(),
                });
            }
        };
        if backend == BackendMode::Http && api_base.is_none() {
            return Err(ConfigError::MissingApiBase);
        }

        let cooldown_secs =
            parse_var(&lookup, "DAILY_COOLDOWN_SECS", "number of seconds")?.unwrap_or(defaults.cooldown_secs);
        if cooldown_secs == 0 {
            return Err(ConfigError::ZeroCooldown);
        }
        let reward = parse_var(&lookup, "DAILY_REWARD", "reward amount")?.unwrap_or(defaults.reward);

        Ok(Self {
            port,
            data_path,
            api_base,
            backend,
            rules: ClaimRules {
                cooldown_secs,
                reward,
            },
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    kind: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, kind, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.data_path, PathBuf::from("data/state.json"));
        assert_eq!(settings.api_base, None);
        assert_eq!(settings.backend, BackendMode::Mock);
        assert_eq!(settings.rules, ClaimRules { cooldown_secs: 86_400, reward: 100 });
    }

    #[test]
    fn api_base_is_normalized() {
        let normalized = settings(&[("API_BASE", " http://localhost:9000/ ")]).unwrap();
        assert_eq!(normalized.api_base.as_deref(), Some("http://localhost:9000"));

        let blank = settings(&[("API_BASE", "  ")]).unwrap();
        assert_eq!(blank.api_base, None);
    }

    #[test]
    fn http_backend_requires_api_base() {
        assert_eq!(
            settings(&[("ECONOMY_BACKEND", "http")]),
            Err(ConfigError::MissingApiBase)
        );
        let settings = settings(&[("ECONOMY_BACKEND", "http"), ("API_BASE", "http://x")]).unwrap();
        assert_eq!(settings.backend, BackendMode::Http);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            settings(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            settings(&[("ECONOMY_BACKEND", "grpc")]),
            Err(ConfigError::Invalid { name: "ECONOMY_BACKEND", .. })
        ));
        assert_eq!(
            settings(&[("DAILY_COOLDOWN_SECS", "0")]),
            Err(ConfigError::ZeroCooldown)
        );
    }

    #[test]
    fn claim_rules_are_configurable() {
        let settings = settings(&[("DAILY_COOLDOWN_SECS", "3600"), ("DAILY_REWARD", "5")]).unwrap();
        assert_eq!(settings.rules, ClaimRules { cooldown_secs: 3600, reward: 5 });
    }
}
