use std::collections::HashMap;

use crate::error::{ Error, ErrorKind, Result };

use config::{ ConfigBuilder, builder::DefaultState };
use serde::{ Serialize, Deserialize };

pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub www: WwwConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("HUEPRINT").prefix_separator("_").separator("__"));

        Self::build(builder, std::env::var("PORT").ok(), std::env::var("API_KEY").ok())
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("www.bind_host", "0.0.0.0")?
            .set_default("www.bind_port", 3000_i64)?
            .set_default("www.workers", 4_i64)?
            .set_default("www.base_url", "http://localhost:{port}")?
            .set_default("www.api_key", "")?
            .set_default("www.max_upload_size", DEFAULT_MAX_UPLOAD_SIZE as i64)?)
    }

    fn build(builder: ConfigBuilder<DefaultState>, port: Option<String>, api_key: Option<String>) -> Result<Self> {
        let mut cfg: Config = builder.build()?.try_deserialize()?;

        if let Some(port) = port {
            cfg.www.bind_port = port.parse()
                                    .map_err(|err| Error::from(ErrorKind::ConfigurationParse, err))?;
        }
        if let Some(api_key) = api_key {
            cfg.www.api_key = api_key;
        }
        cfg.www.format_base_url()?;

        Ok(cfg)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        if pretty {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(serde_json::to_string(self)?)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub file: Option<std::path::PathBuf>,
    pub level: log::LevelFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WwwConfig {
    pub bind_host: String,
    pub bind_port: u16,
    pub base_url: String,
    pub workers: usize,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub max_upload_size: usize,
}

impl WwwConfig {
    pub fn format_base_url(&mut self) -> Result<()> {
        let mut args = HashMap::new();
        args.insert("port".to_string(), format!("{}", self.bind_port));

        self.base_url = strfmt::strfmt(&self.base_url, &args).map_err(|err| Error::from(ErrorKind::ParseWwwBaseUrl, err))?;
        Ok(())
    }

    /// The service refuses to start without a secret; the client tool does
    /// not need one.
    pub fn require_api_key(&self) -> Result<&str> {
        if self.api_key.is_empty() {
            return Err(Error::new(ErrorKind::MissingApiKey));
        }
        Ok(&self.api_key)
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url.trim_end_matches('/'))
    }
}
