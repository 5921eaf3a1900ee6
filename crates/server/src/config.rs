use database::services::enrollment::RegistrationRules;
use models::policy::{PassMark, PrerequisitePolicy};
use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_addr: SocketAddr,
    pub rules: RegistrationRules,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let bind_addr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;
        let policy = parse_or(&lookup, "PREREQUISITE_POLICY", Some(PrerequisitePolicy::default()))?;
        let pass_mark = parse_or(&lookup, "PASS_MARK", Some(PassMark::default().0))?;

        if !(0.0..=100.0).contains(&pass_mark) {
            return Err(ConfigError::Invalid {
                name: "PASS_MARK",
                value: pass_mark.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            bind_addr,
            rules: RegistrationRules {
                policy,
                pass_mark: PassMark(pass_mark),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => default.ok_or(ConfigError::Missing(name)),
    }
}
