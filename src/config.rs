use std::env;

use chrono::NaiveTime;

/// What to do when the code lookup itself fails (store unreachable, permission denied...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Treat the code as valid and let the redemption through.
    Open,
    /// Surface the error to the caller.
    Closed,
}

impl std::str::FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(FailurePolicy::Open),
            "closed" => Ok(FailurePolicy::Closed),
            _ => Err(anyhow::anyhow!("Unknown failure policy: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
    pub cleanup_schedule_enabled: bool,
    /// UTC wall-clock time at which the daily cleanup fires.
    pub cleanup_time: NaiveTime,
    pub redemption_failure_policy: FailurePolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".into())
                .parse()?,
            jwt_secret: required("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .trim_end_matches('/')
                .to_string(),
            cleanup_schedule_enabled: parse_bool(
                &env::var("CLEANUP_SCHEDULE_ENABLED").unwrap_or_else(|_| "true".into()),
            )?,
            cleanup_time: parse_time(
                &env::var("CLEANUP_TIME").unwrap_or_else(|_| "00:05".into()),
            )?,
            redemption_failure_policy: env::var("REDEMPTION_FAILURE_POLICY")
                .unwrap_or_else(|_| "closed".into())
                .parse()?,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}

fn parse_bool(v: &str) -> anyhow::Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!("Invalid boolean value: {v}")),
    }
}

fn parse_time(v: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(v.trim(), "%H:%M")
        .map_err(|e| anyhow::anyhow!("Invalid HH:MM time '{v}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_policy_parses_case_insensitively() {
        assert_eq!("open".parse::<FailurePolicy>().unwrap(), FailurePolicy::Open);
        assert_eq!(" Closed ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Closed);
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn cleanup_time_is_hh_mm() {
        assert_eq!(parse_time("00:05").unwrap(), NaiveTime::from_hms_opt(0, 5, 0).unwrap());
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("midnight").is_err());
    }

    #[test]
    fn booleans() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
