use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Which engine binding backs the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineConfig {
    /// Local `typst` binary.
    Cli {
        binary: PathBuf,
        font_path: Option<PathBuf>,
    },
    /// HTTP compile service.
    Remote { base_url: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub engine: EngineConfig,
    /// Bring the engine up in the background at startup.
    pub engine_warmup: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let engine = match lookup("TYPST_ENGINE").as_deref().unwrap_or("cli") {
            "cli" => EngineConfig::Cli {
                binary: PathBuf::from(lookup("TYPST_BIN").unwrap_or_else(|| "typst".to_string())),
                font_path: lookup("TYPST_FONT_PATH").map(PathBuf::from),
            },
            "remote" => EngineConfig::Remote {
                base_url: lookup("TYPST_SERVICE_URL").context(
                    "Required environment variable 'TYPST_SERVICE_URL' is not set (TYPST_ENGINE=remote)",
                )?,
            },
            other => bail!("TYPST_ENGINE must be 'cli' or 'remote', got '{other}'"),
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            engine,
            engine_warmup: lookup("ENGINE_WARMUP")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("ENGINE_WARMUP must be true or false")?
                .unwrap_or(true),
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.engine_warmup);
        assert_eq!(
            config.engine,
            EngineConfig::Cli {
                binary: PathBuf::from("typst"),
                font_path: None
            }
        );
    }

    #[test]
    fn test_remote_engine_requires_url() {
        assert!(config_from(&[("TYPST_ENGINE", "remote")]).is_err());

        let config = config_from(&[
            ("TYPST_ENGINE", "remote"),
            ("TYPST_SERVICE_URL", "http://typst:3000"),
        ])
        .unwrap();
        assert_eq!(
            config.engine,
            EngineConfig::Remote {
                base_url: "http://typst:3000".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("TYPST_ENGINE", "wasm")]).is_err());
        assert!(config_from(&[("ENGINE_WARMUP", "maybe")]).is_err());
    }

    #[test]
    fn test_cli_engine_options() {
        let config = config_from(&[
            ("TYPST_BIN", "/opt/typst/bin/typst"),
            ("TYPST_FONT_PATH", "/usr/share/fonts"),
            ("ENGINE_WARMUP", "off"),
        ])
        .unwrap();
        assert!(!config.engine_warmup);
        assert_eq!(
            config.engine,
            EngineConfig::Cli {
                binary: PathBuf::from("/opt/typst/bin/typst"),
                font_path: Some(PathBuf::from("/usr/share/fonts")),
            }
        );
    }
}
