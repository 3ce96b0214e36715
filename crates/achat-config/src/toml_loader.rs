//! TOML config file loading and creation.

use std::io;
use std::path::{Path, PathBuf};

use achat_common::ConfigError;
use tracing::{info, warn};

use crate::schema::AchatConfig;
use crate::validation;

/// Read and parse `path`.
///
/// A file that parses but fails validation is not fatal: the problems are
/// logged and the built-in defaults are used instead.
pub fn load_from_path(path: &Path) -> Result<AchatConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(io_error("read", path, e)),
    };

    let config: AchatConfig = toml::from_str(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    match validation::validate(&config) {
        Ok(()) => {
            info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        Err(e) => {
            warn!(path = %path.display(), "ignoring invalid config, using defaults: {e}");
            Ok(AchatConfig::default())
        }
    }
}

/// Like [`load_from_path`] on [`default_config_path`], except that a
/// missing file is written out with commented defaults instead of failing.
pub fn load_default() -> Result<AchatConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(AchatConfig::default())
        }
        other => other,
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("achat").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no config directory on this platform".into()))
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_error("create", dir, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("write", path, e))?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}

fn io_error(action: &str, path: &Path, err: io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot {action} {}: {err}", path.display()))
}

fn default_config_toml() -> &'static str {
    r##"# achat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[endpoint]
# url = "ws://localhost:5012/ds-ws"
# connect_timeout_secs = 15   # 1-120

[identity]
# user_uuid = "user_uuid"
# from = "achat"
# pid = "GoWeaviateDeepseek"

[transcript]
# max_messages = 1000         # 1-100000

[notifications]
# locale = "zh-CN"            # en, zh-CN

[notifications.strings]
# "notification.network-error" = "Server unreachable"

[logging]
# level = "achat=info"
"##
}
