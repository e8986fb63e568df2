use std::fs::File;

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use catalog_client::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

pub const APP_NAME: &str = "catalog-tui";

/// User settings, read from `config.json` in the XDG config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend, including the `/api` prefix
    pub api_base: String,

    /// Where downloaded materials are saved
    pub download_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            download_dir: None,
        }
    }
}

impl Config {
    /// Load the config file, or the defaults if there isn't one
    pub fn load() -> Result<Self> {
        let Some(path) = BaseDirectories::with_prefix(APP_NAME)?.find_config_file("config.json")
        else {
            return Ok(Self::default());
        };

        let file = File::open(&path).context("error opening config file")?;
        let config = serde_json::from_reader(&file).context("error deserialising config file")?;

        Ok(config)
    }

    /// The configured download directory, or one in the XDG data directory
    pub fn download_dir(&self) -> Result<Utf8PathBuf> {
        if let Some(d) = &self.download_dir {
            return Ok(d.into());
        }

        let path = BaseDirectories::with_prefix(APP_NAME)?
            .get_data_home()
            .join("downloads");
        Utf8PathBuf::from_path_buf(path)
            .map_err(|p| anyhow!("download directory {} isn't valid UTF-8", p.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_keys_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"download_dir":"/srv/notes"}"#).unwrap();
        assert_eq!(
            config,
            Config {
                api_base: DEFAULT_API_BASE.to_string(),
                download_dir: Some("/srv/notes".to_string()),
            }
        );
        assert_eq!(config.download_dir().unwrap(), Utf8PathBuf::from("/srv/notes"));
    }
}
