//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Maximum sane UTC offset (14 hours, either direction)
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// JWT secret for customer and staff sessions
    pub jwt_secret: String,
    /// Environment: development | staging | production
    pub environment: String,
    /// Fixed UTC offset of the deployment region, in minutes.
    /// Defaults to -180 (Montevideo, UTC-3).
    pub local_utc_offset_minutes: i32,
    /// No-show sweep interval in seconds
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Parse and range-check the deployment UTC offset
    fn parse_utc_offset(raw: Option<String>) -> Result<i32, BoxError> {
        let minutes: i32 = match raw {
            Some(v) => v
                .parse()
                .map_err(|_| format!("LOCAL_UTC_OFFSET_MINUTES is not a number: {v}"))?,
            None => -180,
        };
        if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(format!("LOCAL_UTC_OFFSET_MINUTES out of range: {minutes}").into());
        }
        Ok(minutes)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let local_utc_offset_minutes =
            Self::parse_utc_offset(std::env::var("LOCAL_UTC_OFFSET_MINUTES").ok())?;

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            environment,
            local_utc_offset_minutes,
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_offset_defaults_to_montevideo() {
        assert_eq!(Config::parse_utc_offset(None).unwrap(), -180);
    }

    #[test]
    fn test_utc_offset_parses_both_signs() {
        assert_eq!(Config::parse_utc_offset(Some("330".into())).unwrap(), 330);
        assert_eq!(Config::parse_utc_offset(Some("-180".into())).unwrap(), -180);
        assert_eq!(Config::parse_utc_offset(Some("0".into())).unwrap(), 0);
    }

    #[test]
    fn test_utc_offset_rejects_out_of_range() {
        assert!(Config::parse_utc_offset(Some("900".into())).is_err());
        assert!(Config::parse_utc_offset(Some("-900".into())).is_err());
        assert!(Config::parse_utc_offset(Some("840".into())).is_ok());
        assert!(Config::parse_utc_offset(Some("-840".into())).is_ok());
    }

    #[test]
    fn test_utc_offset_rejects_garbage() {
        assert!(Config::parse_utc_offset(Some("three".into())).is_err());
        assert!(Config::parse_utc_offset(Some("".into())).is_err());
    }
}
