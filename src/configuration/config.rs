#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::ModelName;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    BackendHealthCheckTimeout,
    ConfigFile,
    Model,
    PollInterval,
    RequestTimeout,
    Username,
}

impl ConfigKey {
    fn is_numeric(&self) -> bool {
        return matches!(
            self,
            ConfigKey::BackendHealthCheckTimeout
                | ConfigKey::PollInterval
                | ConfigKey::RequestTimeout
        );
    }
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    /// Numeric keys are validated on load, `default` only covers keys that
    /// were never loaded.
    pub fn get_u64(key: ConfigKey) -> u64 {
        if let Ok(val) = Config::get(key).parse::<u64>() {
            return val;
        }

        return Config::default(key).parse::<u64>().unwrap_or_default();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    fn config_path() -> path::PathBuf {
        #[cfg(not(target_os = "macos"))]
        let config_dir = dirs::config_dir();
        #[cfg(target_os = "macos")]
        let config_dir = dirs::home_dir().map(|e| return e.join(".config"));

        return config_dir
            .unwrap_or_else(|| return path::PathBuf::from("."))
            .join("docmind/config.toml");
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Username {
            let mut user = env::var("USER").unwrap_or_else(|_| return "".to_string());
            if user.is_empty() {
                user = "User".to_string();
            }

            return user;
        }

        let default_model = ModelName::default().to_string();
        let config_path = Config::config_path().to_string_lossy().to_string();

        let res = match key {
            ConfigKey::ApiURL => "http://localhost:8000",
            ConfigKey::BackendHealthCheckTimeout => "1000",
            ConfigKey::Model => &default_model,
            ConfigKey::PollInterval => "10",
            ConfigKey::RequestTimeout => "120000",

            // Special
            ConfigKey::ConfigFile => &config_path,
            ConfigKey::Username => "",
        };

        return res.to_string();
    }

    fn validate(cmd: &Command, source: &str, key: ConfigKey, val: &str) -> Result<()> {
        if key.is_numeric() && val.parse::<u64>().map_or(true, |e| return e == 0) {
            bail!(format!(
                "{source} has an invalid value for key '{key}': {val}\nExpected a positive number"
            ));
        }

        let key_str = key.to_string();
        let possible_values = cmd
            .get_arguments()
            .find(|e| return e.get_long() == Some(key_str.as_str()))
            .map(|arg| {
                return arg
                    .get_possible_values()
                    .iter()
                    .map(|e| return e.get_name().to_string())
                    .collect::<Vec<String>>();
            })
            .unwrap_or_default();

        if !possible_values.is_empty() && !possible_values.contains(&val.to_string()) {
            bail!(format!(
                "{source} has an invalid value for key '{key}': {val}\nPossible values are: {}",
                possible_values.join(", ")
            ));
        }

        return Ok(());
    }

    /// Layers defaults, then the TOML config file, then CLI arguments and
    /// environment variables. Nothing is stored unless every layer is valid.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let mut values = HashMap::new();
        for key in ConfigKey::iter() {
            values.insert(key, Config::default(key));
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        let val_str = val_int.to_string();
                        Config::validate(&cmd, "config.toml", key, &val_str)?;
                        values.insert(key, val_str);
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::validate(&cmd, "config.toml", key, val_str)?;
                        values.insert(key, val_str.to_string());
                    }
                }
            }
        }
        values.insert(ConfigKey::ConfigFile, config_file);

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::validate(&cmd, "Command line or environment", key, val)?;
                    values.insert(key, val.to_string());
                }
            }
        }

        for (key, val) in values {
            Config::set(key, &val);
        }

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            model = Config::get(ConfigKey::Model),
            poll_interval = Config::get(ConfigKey::PollInterval),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            username = Config::get(ConfigKey::Username),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                if key == ConfigKey::Username {
                    return Some(
                        "# Your user name displayed in all chat bubbles.\n# username = \"\""
                            .to_string(),
                    );
                }

                let key_str = key.to_string();
                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key_str.as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
