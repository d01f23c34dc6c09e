#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
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

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, Hash, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    PollInterval,
    RequestTimeout,
    ServerURL,
}

impl ConfigKey {
    fn is_numeric(&self) -> bool {
        return *self == ConfigKey::PollInterval || *self == ConfigKey::RequestTimeout;
    }
}

fn validate(key: ConfigKey, val: &str) -> Result<()> {
    if !key.is_numeric() {
        return Ok(());
    }

    if !matches!(val.parse::<u64>(), Ok(num) if num > 0) {
        bail!(format!(
            "Invalid value for '{key}': {val}\nExpected a whole number greater than zero."
        ));
    }

    return Ok(());
}

fn matched_value(matches: &ArgMatches, key: ConfigKey) -> Option<String> {
    if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
        return Some(val.to_string());
    }
    if let Ok(Some(val)) = matches.try_get_one::<u64>(&key.to_string()) {
        return Some(val.to_string());
    }

    return None;
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn get_u64(key: ConfigKey) -> Result<u64> {
        let val = Config::get(key);
        validate(key, &val)?;

        return Ok(val.parse::<u64>()?);
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let config_path = dirs::config_dir()
            .unwrap_or_else(|| return path::PathBuf::from("."))
            .join("octavio-dash/config.toml");

        let res = match key {
            ConfigKey::PollInterval => "30",
            ConfigKey::RequestTimeout => "10000",
            ConfigKey::ServerURL => "http://octavio-server.mit.edu:5001",

            // Special
            ConfigKey::ConfigFile => return config_path.to_string_lossy().to_string(),
        };

        return res.to_string();
    }

    /// Resolves every key from defaults, then the config file, then command
    /// line and environment. Nothing is written to the active config unless
    /// every source validates.
    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let mut staged: HashMap<ConfigKey, String> = ConfigKey::iter()
            .map(|key| return (key, Config::default(key)))
            .collect();

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Some(arg_config_file) = matched_value(matches, ConfigKey::ConfigFile) {
                config_file = arg_config_file;
            }
        }
        staged.insert(ConfigKey::ConfigFile, config_file.to_string());

        let config_path = path::PathBuf::from(config_file);
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
                        validate(key, &val_str)?;
                        staged.insert(key, val_str);
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if let Err(err) = validate(key, val_str) {
                            bail!(format!("config.toml has an invalid value. {err}"));
                        }
                        staged.insert(key, val_str.to_string());
                    } else {
                        bail!(format!("config.toml has an invalid type for key '{key}'"));
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Some(val) = matched_value(matches, key) {
                    if val.is_empty() {
                        continue;
                    }
                    validate(key, &val)?;
                    staged.insert(key, val);
                }
            }
        }

        if let Some(url) = staged.get_mut(&ConfigKey::ServerURL) {
            *url = url.trim_end_matches('/').to_string();
        }

        for (key, val) in staged.iter() {
            Config::set(*key, val);
        }

        tracing::debug!(
            server_url = Config::get(ConfigKey::ServerURL),
            poll_interval = Config::get(ConfigKey::PollInterval),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            config_file = Config::get(ConfigKey::ConfigFile),
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

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if key.is_numeric() {
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
