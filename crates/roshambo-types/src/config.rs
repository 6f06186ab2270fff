use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Result, RoshamboError};

/// How match data is laid out on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreLayout {
    /// Separate stats and history workbooks keyed by username.
    #[default]
    PerUser,
    /// One two-sheet workbook without a username column.
    Single,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_dir: String,
    #[serde(default)]
    pub layout: StoreLayout,
    pub stats_file: String,
    pub history_file: String,
    pub workbook_file: String,
    pub users_file: String,
}

impl StoreConfig {
    pub fn stats_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.stats_file)
    }

    pub fn history_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.history_file)
    }

    pub fn workbook_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.workbook_file)
    }

    pub fn users_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.users_file)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
            layout: StoreLayout::PerUser,
            stats_file: "stats.json".into(),
            history_file: "history.json".into(),
            workbook_file: "rps_data.json".into(),
            users_file: "users.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub require_login: bool,
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            require_login: true,
            history_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsConfig {
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            log_file: Some("roshambo.log".into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoshamboConfig {
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub ops: OpsConfig,
}

impl RoshamboConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            RoshamboError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            RoshamboError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        let files = [
            ("store.stats_file", &self.store.stats_file),
            ("store.history_file", &self.store.history_file),
            ("store.workbook_file", &self.store.workbook_file),
            ("store.users_file", &self.store.users_file),
        ];
        for (name, value) in files {
            if value.trim().is_empty() {
                return Err(RoshamboError::Configuration(format!(
                    "{name} must not be empty"
                )));
            }
        }
        if self.session.history_limit == 0 {
            return Err(RoshamboError::Configuration(
                "session.history_limit must be greater than zero".into(),
            ));
        }
        if self.session.require_login && self.store.layout == StoreLayout::Single {
            return Err(RoshamboError::Configuration(
                "session.require_login needs the per-user store layout".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_roshambo_config_from_file() {
        let temp_path = std::env::temp_dir().join("roshambo-config-test.toml");
        let config = RoshamboConfig {
            store: StoreConfig {
                data_dir: "var/rps".into(),
                layout: StoreLayout::Single,
                ..StoreConfig::default()
            },
            session: SessionConfig {
                require_login: false,
                history_limit: 20,
            },
            ops: OpsConfig {
                log_level: "debug".into(),
                log_file: None,
            },
        };

        let doc = toml::to_string(&config).expect("serialize config");
        fs::write(&temp_path, doc).expect("write temp config");

        let loaded = RoshamboConfig::from_file(&temp_path).expect("load config");
        assert_eq!(loaded.store.layout, StoreLayout::Single);
        assert_eq!(loaded.session.history_limit, 20);
        assert_eq!(loaded.store.workbook_path(), Path::new("var/rps/rps_data.json"));
        assert!(loaded.ops.log_file.is_none());
        fs::remove_file(&temp_path).expect("cleanup temp config");
    }

    #[test]
    fn layout_defaults_to_per_user() {
        let doc = r#"
            [store]
            data_dir = "data"
            stats_file = "stats.json"
            history_file = "history.json"
            workbook_file = "rps_data.json"
            users_file = "users.json"

            [session]
            require_login = true
            history_limit = 50

            [ops]
            log_level = "info"
        "#;
        let config: RoshamboConfig = toml::from_str(doc).expect("parse config");
        assert_eq!(config.store.layout, StoreLayout::PerUser);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_configuration_rules() {
        let mut config = RoshamboConfig::default();
        assert!(config.validate().is_ok());

        config.session.history_limit = 0;
        assert!(config.validate().is_err());
        config.session.history_limit = 50;

        config.store.users_file = " ".into();
        assert!(config.validate().is_err());
        config.store.users_file = "users.json".into();

        config.store.layout = StoreLayout::Single;
        assert!(config.validate().is_err());
        config.session.require_login = false;
        assert!(config.validate().is_ok());
    }
}
