use std::{fmt::Display, str::FromStr};

use tracing::info;

use crate::{
    Error, Result,
    identity::VisibleIdRange,
    participant::ParticipantId,
    registration::VideoBounds,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_address: String,
    pub moderator_id: ParticipantId,
    pub visible_ids: VisibleIdRange,
    pub video_bounds: VideoBounds,
    pub search_limit: u32,
}

impl Config {
    /// Reads the process environment, after `.env` if there is one.
    pub fn load() -> Result<Self> {
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Config {
            database_url: try_load(&lookup, "DATABASE_URL", "sqlite://introbot.db?mode=rwc")?,
            max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "16")?,
            bind_address: try_load(&lookup, "BIND_ADDRESS", "0.0.0.0:8080")?,
            moderator_id: ParticipantId(require(&lookup, "MODERATOR_ID")?),
            visible_ids: VisibleIdRange {
                min: try_load(&lookup, "VISIBLE_ID_MIN", "10000")?,
                max: try_load(&lookup, "VISIBLE_ID_MAX", "99999")?,
            },
            video_bounds: VideoBounds {
                min_secs: try_load(&lookup, "VIDEO_MIN_SECONDS", "7")?,
                max_secs: try_load(&lookup, "VIDEO_MAX_SECONDS", "20")?,
            },
            search_limit: try_load(&lookup, "SEARCH_LIMIT", "10")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults everywhere, for embedding and tests.
    pub fn with_moderator(moderator_id: ParticipantId) -> Self {
        Config {
            database_url: "sqlite::memory:".to_owned(),
            max_connections: 1,
            bind_address: "127.0.0.1:8080".to_owned(),
            moderator_id,
            visible_ids: VisibleIdRange::default(),
            video_bounds: VideoBounds::default(),
            search_limit: 10,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.visible_ids.min > self.visible_ids.max {
            return Err(Error::Config("VISIBLE_ID_MIN is above VISIBLE_ID_MAX".to_owned()));
        }
        if self.video_bounds.min_secs > self.video_bounds.max_secs {
            return Err(Error::Config("VIDEO_MIN_SECONDS is above VIDEO_MAX_SECONDS".to_owned()));
        }
        if self.max_connections == 0 || self.search_limit == 0 {
            return Err(Error::Config(
                "DATABASE_MAX_CONNECTIONS and SEARCH_LIMIT must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

fn try_load<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {key} value {value:?}: {e}")))
}

fn require<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<T>
where
    T::Err: Display,
{
    let value = lookup(key).ok_or_else(|| Error::Config(format!("{key} must be set")))?;
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {key} value {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_fill_everything_but_the_moderator() {
        let config = load(&[("MODERATOR_ID", "777")]).unwrap();
        assert_eq!(config.moderator_id, ParticipantId(777));
        assert_eq!(config.visible_ids, VisibleIdRange { min: 10000, max: 99999 });
        assert_eq!(config.video_bounds, VideoBounds { min_secs: 7, max_secs: 20 });
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.search_limit, 10);
    }

    #[test]
    fn moderator_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("MODERATOR_ID")), "{err:?}");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(load(&[("MODERATOR_ID", "x")]).is_err());
        assert!(load(&[("MODERATOR_ID", "1"), ("SEARCH_LIMIT", "-3")]).is_err());
        assert!(load(&[("MODERATOR_ID", "1"), ("VISIBLE_ID_MIN", "500"), ("VISIBLE_ID_MAX", "100")]).is_err());
        assert!(load(&[("MODERATOR_ID", "1"), ("VIDEO_MIN_SECONDS", "30")]).is_err());
    }
}
