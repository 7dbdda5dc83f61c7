use std::{env, path::PathBuf};

use tracing::info;

use crate::domain::Error;

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost:5004";
pub const DEFAULT_STORE_PATH: &str = "wallet_store.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub service_base_url: String,
    pub store_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `load` reads the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_base_url =
            try_load(&lookup, "WALLET_SERVICE_BASE_URL", DEFAULT_SERVICE_BASE_URL);
        if !(service_base_url.starts_with("http://") || service_base_url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "WALLET_SERVICE_BASE_URL must be an http(s) URL, got {service_base_url}"
            )));
        }

        Ok(Self {
            service_base_url: service_base_url.trim_end_matches('/').to_string(),
            store_path: try_load(&lookup, "WALLET_STORE_PATH", DEFAULT_STORE_PATH).into(),
        })
    }

    pub fn endpoints(&self) -> Endpoints<'_> {
        Endpoints {
            base: &self.service_base_url,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

fn try_load<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(value) if !value.is_empty() => value,
        _ => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

/// Remote endpoints the auth and payment collaborators talk to, all hung off
/// the one configured base address.
#[derive(Debug, Clone, Copy)]
pub struct Endpoints<'a> {
    base: &'a str,
}

impl Endpoints<'_> {
    pub fn login(&self) -> String {
        format!("{}/api/merchants/login", self.base)
    }

    pub fn register(&self) -> String {
        format!("{}/api/merchants/register", self.base)
    }

    pub fn payment_initiate(&self) -> String {
        format!("{}/api/payment/initiate", self.base)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.endpoints().login(),
            "http://localhost:5004/api/merchants/login"
        );
    }

    #[test]
    fn one_base_for_every_endpoint() {
        let config = Config::from_lookup(lookup(&[
            ("WALLET_SERVICE_BASE_URL", "https://pay.example.test:3001/"),
            ("WALLET_STORE_PATH", "/tmp/w.json"),
        ]))
        .unwrap();

        let endpoints = config.endpoints();
        assert_eq!(
            endpoints.register(),
            "https://pay.example.test:3001/api/merchants/register"
        );
        assert_eq!(
            endpoints.payment_initiate(),
            "https://pay.example.test:3001/api/payment/initiate"
        );
        assert_eq!(config.store_path, PathBuf::from("/tmp/w.json"));
    }

    #[test]
    fn rejects_non_http_base() {
        let err = Config::from_lookup(lookup(&[("WALLET_SERVICE_BASE_URL", "localhost:5004")]));
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
