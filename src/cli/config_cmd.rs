//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::{Resolution, VideoCodec};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;

    store.save(&config).await?;
    let stored = config_value(&config, key).unwrap_or_default();
    presenter.success(&format!("{} = {}", key, stored));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Current value of a key, formatted for display
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "resolution" => config.resolution.clone(),
        "frame_rate" => config.frame_rate.map(|fps| fps.to_string()),
        "hdr" => config.hdr.map(|b| b.to_string()),
        "codec" => config.codec.clone(),
        "stabilization" => config.stabilization.map(|b| b.to_string()),
        "output_dir" => config.output_dir.clone(),
        "notify" => config.notify.map(|b| b.to_string()),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}

/// Validate a value and store it in canonical form
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };
    let boolean = || parse_bool(value).map_err(|_| invalid(BOOL_HINT.to_string()));

    match key {
        "resolution" => {
            let resolution = value
                .parse::<Resolution>()
                .map_err(|e| invalid(e.to_string()))?;
            config.resolution = Some(resolution.as_str().to_string());
        }
        "frame_rate" => {
            let fps = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|fps| *fps > 0)
                .ok_or_else(|| invalid("Value must be a positive integer".to_string()))?;
            config.frame_rate = Some(fps);
        }
        "hdr" => config.hdr = Some(boolean()?),
        "codec" => {
            let codec = value
                .parse::<VideoCodec>()
                .map_err(|e| invalid(e.to_string()))?;
            config.codec = Some(codec.as_str().to_string());
        }
        "stabilization" => config.stabilization = Some(boolean()?),
        "output_dir" => {
            let dir = value.trim();
            if dir.is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            config.output_dir = Some(dir.to_string());
        }
        "notify" => config.notify = Some(boolean()?),
        "log_level" => {
            let level = value
                .trim()
                .parse::<tracing::Level>()
                .map_err(|_| invalid("Valid levels: error, warn, info, debug, trace".to_string()))?;
            config.log_level = Some(level.as_str().to_lowercase());
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

const BOOL_HINT: &str = "Value must be 'true' or 'false'";

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("NO"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn values_are_stored_canonically() {
        let mut config = AppConfig::empty();
        apply_config_value(&mut config, "resolution", "UHD").unwrap();
        apply_config_value(&mut config, "codec", "h265").unwrap();
        apply_config_value(&mut config, "log_level", "DEBUG").unwrap();

        assert_eq!(config.resolution.as_deref(), Some("4k"));
        assert_eq!(config.codec.as_deref(), Some("hevc"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AppConfig::empty();
        for (key, value) in [
            ("resolution", "8k"),
            ("frame_rate", "0"),
            ("frame_rate", "fast"),
            ("hdr", "maybe"),
            ("codec", "vp9"),
            ("output_dir", "  "),
            ("log_level", "loud"),
        ] {
            let err = apply_config_value(&mut config, key, value).unwrap_err();
            assert!(
                matches!(err, ConfigError::ValidationError { key: ref k, .. } if k == key),
                "{key}={value}"
            );
        }
        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn booleans_and_numbers_round_trip_for_display() {
        let mut config = AppConfig::empty();
        apply_config_value(&mut config, "frame_rate", "60").unwrap();
        apply_config_value(&mut config, "stabilization", "no").unwrap();

        assert_eq!(config_value(&config, "frame_rate").as_deref(), Some("60"));
        assert_eq!(config_value(&config, "stabilization").as_deref(), Some("false"));
        assert_eq!(config_value(&config, "notify"), None);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(check_key("api_key").is_err());
        assert!(check_key("codec").is_ok());
    }
}
