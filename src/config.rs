use std::env;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use thiserror::Error;

use crate::domain::money::check_amount;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
    /// Used when no service fee is stored in `platform_settings`.
    pub default_service_fee: Option<BigDecimal>,
}

fn parse<T: FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: format!("'{}': {}", raw, e),
    })
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match lookup("PORT") {
            Some(raw) => parse("PORT", raw)?,
            None => 8080,
        };
        let pool_size: u32 = match lookup("DB_POOL_SIZE") {
            Some(raw) => parse("DB_POOL_SIZE", raw)?,
            None => 10,
        };
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_POOL_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }
        let default_service_fee = match lookup("DEFAULT_SERVICE_FEE") {
            Some(raw) => {
                let fee: BigDecimal = parse("DEFAULT_SERVICE_FEE", raw)?;
                if fee < BigDecimal::zero() {
                    return Err(ConfigError::Invalid {
                        name: "DEFAULT_SERVICE_FEE",
                        reason: "must not be negative".to_string(),
                    });
                }
                check_amount("DEFAULT_SERVICE_FEE", &fee).map_err(|e| ConfigError::Invalid {
                    name: "DEFAULT_SERVICE_FEE",
                    reason: e.to_string(),
                })?;
                Some(fee)
            }
            None => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            pool_size,
            default_service_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/market")]).expect("valid");
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.pool_size, 10);
        assert_eq!(cfg.default_service_fee, None);
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = config(&[("DATABASE_URL", "x"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = config(&[("DATABASE_URL", "x"), ("DEFAULT_SERVICE_FEE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DEFAULT_SERVICE_FEE", .. }));

        let err = config(&[("DATABASE_URL", "x"), ("DEFAULT_SERVICE_FEE", "0.125")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DEFAULT_SERVICE_FEE", .. }));

        let err = config(&[("DATABASE_URL", "x"), ("DB_POOL_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DB_POOL_SIZE", .. }));
    }

    #[test]
    fn service_fee_default_is_parsed_as_decimal() {
        let cfg = config(&[("DATABASE_URL", "x"), ("DEFAULT_SERVICE_FEE", "1.50")]).expect("valid");
        assert_eq!(cfg.default_service_fee, Some(BigDecimal::from_str("1.5").expect("dec")));
    }
}
