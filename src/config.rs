use anyhow::Context;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Fixed offset for week windows. `None` follows the host time zone.
    pub utc_offset: Option<UtcOffset>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "geouser".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "geouser-clients".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let utc_offset = std::env::var("APP_UTC_OFFSET")
            .ok()
            .map(|raw| parse_utc_offset(&raw))
            .transpose()?;
        Ok(Self {
            database_url,
            jwt,
            utc_offset,
        })
    }
}

/// Parses offsets written as `+HH:MM` / `-HH:MM`; `Z` and `UTC` mean zero.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid APP_UTC_OFFSET {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_offsets() {
        assert_eq!(parse_utc_offset("+02:00").unwrap().whole_hours(), 2);
        let west = parse_utc_offset("-05:30").unwrap();
        assert_eq!(west.whole_hours(), -5);
        assert_eq!(west.minutes_past_hour(), -30);
    }

    #[test]
    fn utc_aliases() {
        assert_eq!(parse_utc_offset("Z").unwrap(), UtcOffset::UTC);
        assert_eq!(parse_utc_offset(" utc ").unwrap(), UtcOffset::UTC);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_utc_offset("two hours").is_err());
        assert!(parse_utc_offset("02:00").is_err());
    }
}
