use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use serde_yaml;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::lookup::{DEFAULT_GRAPH_URL, DEFAULT_GRAPH_VERSION};
use crate::overrides::OverrideTable;
use crate::resolver::ResolverConfig;

const PRODUCTION: &str = "production";
const FALLBACK_CONFIG: &str = include_str!("../config.example.yaml");

#[derive(Parser, Debug)]
#[command(name = "fb-resolver")]
#[command(about = "Resolves facebook profile references to numeric ids", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fb-resolver")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    pub environment: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub dev_mode: bool,
}

/// Only a literal `true` (bool or string) turns a flag on. Anything else,
/// including `1`, `yes` or an empty substitution, reads as off.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_yaml::Value::Bool(b) => b,
        serde_yaml::Value::String(s) => s == "true",
        _ => false,
    })
}

fn default_port() -> u16 {
    3000
}

impl Default for App {
    fn default() -> Self {
        App {
            port: default_port(),
            environment: String::new(),
            dev_mode: false,
        }
    }
}

impl App {
    pub fn get_port(&self) -> u16 {
        return self.port;
    }

    /// Dev mode never applies to production deployments, whatever the flag says.
    pub fn dev_mode_enabled(&self) -> bool {
        self.dev_mode && self.environment != PRODUCTION
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Facebook {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_secret: String,
    #[serde(default = "default_graph_url")]
    graph_url: String,
    #[serde(default = "default_graph_version")]
    graph_version: String,
    #[serde(default = "default_timeout")]
    timeout_seconds: u64,
}

fn default_graph_url() -> String {
    DEFAULT_GRAPH_URL.to_string()
}

fn default_graph_version() -> String {
    DEFAULT_GRAPH_VERSION.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for Facebook {
    fn default() -> Self {
        Facebook {
            app_id: String::new(),
            app_secret: String::new(),
            graph_url: default_graph_url(),
            graph_version: default_graph_version(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Facebook {
    pub fn get_graph_url(&self) -> &str {
        return &self.graph_url;
    }

    pub fn get_graph_version(&self) -> &str {
        return &self.graph_version;
    }

    pub fn get_timeout_seconds(&self) -> u64 {
        return self.timeout_seconds.max(1);
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub facebook: Facebook,
    #[serde(default)]
    pub overrides: Option<BTreeMap<String, String>>,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    /// Config used when no file is present. Environment variables are still
    /// substituted into it.
    pub fn from_env() -> Result<Config> {
        Config::from_yaml(FALLBACK_CONFIG)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            app_id: self.facebook.app_id.clone(),
            app_secret: self.facebook.app_secret.clone(),
            dev_mode_enabled: self.app.dev_mode_enabled(),
        }
    }

    /// The configured override map, or the builtin table when none is set.
    pub fn override_table(&self) -> Result<OverrideTable> {
        match &self.overrides {
            Some(entries) => Ok(OverrideTable::from_entries(entries.iter().map(|(k, v)| (k.as_str(), v)))?),
            None => Ok(OverrideTable::builtin()),
        }
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(var = var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
