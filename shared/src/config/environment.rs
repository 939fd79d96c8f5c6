//! Deployment environment and log settings derived from it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Crates whose events the configured filter raises above the baseline
pub const LOG_TARGETS: [&str; 2] = ["ea_core", "ea_infra"];

/// Variables consulted, in order, to pick the environment
const ENVIRONMENT_VARS: [&str; 2] = ["EDUAUTH_ENV", "ENVIRONMENT"];

/// Where the token service is deployed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Read the environment from `EDUAUTH_ENV` or `ENVIRONMENT`
    ///
    /// Unknown values fall back to development.
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Optional TOML overlay read by the settings loader
    pub fn config_file(&self) -> &'static str {
        match self {
            Environment::Development => "config.development.toml",
            Environment::Staging => "config.staging.toml",
            Environment::Production => "config.production.toml",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Subscriber settings consumed by `ea_infra::telemetry`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `ea_core=debug,ea_infra=debug,info`
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colors, ignored by the json format
    #[serde(default)]
    pub colored: bool,

    /// Emit file and line for each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Token events at `debug` locally, `info` in staging and production
    ///
    /// Dependencies (redis, config) stay at the baseline level.
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: target_directive("debug", "info"),
                format: LogFormat::Pretty,
                colored: true,
                source_location: true,
            },
            Environment::Staging => Self {
                level: target_directive("info", "info"),
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            },
            Environment::Production => Self {
                level: target_directive("info", "warn"),
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            },
        }
    }
}

fn target_directive(crate_level: &str, baseline: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, crate_level))
        .collect();
    directives.push(baseline.to_string());
    directives.join(",")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_aliases_and_unknown_values() {
        assert_eq!(" PROD ".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("test".parse::<Environment>(), Ok(Environment::Staging));
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_round_trips_through_display() {
        for env in [Environment::Development, Environment::Staging, Environment::Production] {
            assert_eq!(env.to_string().parse::<Environment>(), Ok(env));
        }
    }

    #[test]
    fn test_production_keeps_token_events_at_info() {
        let log = LoggingConfig::for_environment(Environment::Production);

        assert_eq!(log.level, "ea_core=info,ea_infra=info,warn");
        assert_eq!(log.format, LogFormat::Json);
        assert!(!log.colored);
    }

    #[test]
    fn test_default_logging_is_development() {
        let log = LoggingConfig::default();

        assert_eq!(log.level, "ea_core=debug,ea_infra=debug,info");
        assert!(log.source_location);
    }
}
