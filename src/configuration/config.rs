#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiKey,
    ConfigFile,
    GeminiURL,
    Username,
}

/// Directory holding `config.toml`.
pub fn config_dir() -> path::PathBuf {
    #[cfg(not(target_os = "macos"))]
    let base = dirs::config_dir();
    #[cfg(target_os = "macos")]
    let base = dirs::home_dir().map(|home| return home.join(".config"));

    return base.unwrap_or_else(env::temp_dir).join("aok");
}

/// Directory the debug log is written to, overridable with `AOK_LOG_DIR`.
pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("AOK_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("aok");
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ApiKey => return "".to_string(),
            ConfigKey::ConfigFile => {
                return config_dir()
                    .join("config.toml")
                    .to_string_lossy()
                    .to_string();
            }
            ConfigKey::GeminiURL => return DEFAULT_GEMINI_URL.to_string(),
            ConfigKey::Username => {
                let user = env::var("USER").unwrap_or_else(|_| return "".to_string());
                if user.is_empty() {
                    return "User".to_string();
                }

                return user;
            }
        }
    }

    fn arg_value(clap_arg_matches: &[&ArgMatches], key: ConfigKey) -> Option<String> {
        return clap_arg_matches
            .iter()
            .filter_map(|matches| {
                return matches
                    .try_get_one::<String>(&key.to_string())
                    .ok()
                    .flatten();
            })
            .filter(|val| return !val.is_empty())
            .last()
            .cloned();
    }

    async fn apply_file(config_path: &path::Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let doc = fs::read_to_string(config_path)
            .await?
            .parse::<toml_edit::Document>()?;

        for key in ConfigKey::iter().filter(|key| return *key != ConfigKey::ConfigFile) {
            let val = doc.get(&key.to_string()).and_then(|item| return item.as_str());
            if let Some(val) = val.filter(|val| return !val.is_empty()) {
                Config::set(key, val);
            }
        }

        return Ok(());
    }

    /// Layers defaults, then the TOML config file, then CLI args and env vars.
    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key));
        }

        let config_path = path::PathBuf::from(
            Config::arg_value(&clap_arg_matches, ConfigKey::ConfigFile)
                .unwrap_or_else(|| return Config::default(ConfigKey::ConfigFile)),
        );
        Config::apply_file(&config_path).await?;

        for key in ConfigKey::iter() {
            if let Some(val) = Config::arg_value(&clap_arg_matches, key) {
                Config::set(key, &val);
            }
        }

        let api_key_set = !Config::get(ConfigKey::ApiKey).is_empty();
        tracing::debug!(
            username = Config::get(ConfigKey::Username),
            gemini_url = Config::get(ConfigKey::GeminiURL),
            api_key_set = api_key_set,
            config_file = %config_path.display(),
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

                let help = arg.get_help()?.to_string();
                let description = help.split("[default:").next().unwrap_or("").trim();

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
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
