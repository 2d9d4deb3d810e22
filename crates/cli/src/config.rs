//! CLI configuration from environment variables.
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use model_content::ConfigLoader;
use model_core::RenderConfig;

/// Render settings supplied through the environment.
///
/// Command-line flags take precedence over everything here.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub render_config: Option<PathBuf>,
    pub auto_companion: Option<bool>,
    pub indent_width: Option<usize>,
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CTLFILE_RENDER_CONFIG` - Path to a TOML render config
    /// - `CTLFILE_AUTO` - Render auto-companion lines (`true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`)
    /// - `CTLFILE_INDENT` - Spaces per open scenario block (default: 4)
    pub fn from_env() -> Self {
        Self {
            render_config: env::var_os("CTLFILE_RENDER_CONFIG").map(PathBuf::from),
            auto_companion: read_env_bool("CTLFILE_AUTO"),
            indent_width: read_env("CTLFILE_INDENT"),
        }
    }

    /// Loads the TOML config if one is set, then applies the overrides.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.render_config {
            Some(path) => ConfigLoader::load(path)?,
            None => RenderConfig::default(),
        };
        if let Some(auto) = self.auto_companion {
            config.auto_companion = auto;
        }
        if let Some(width) = self.indent_width {
            config.indent_width = width;
        }
        Ok(config)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = CliConfig {
            render_config: None,
            auto_companion: Some(true),
            indent_width: Some(2),
        };
        let render = config.render_config().unwrap();
        assert!(render.auto_companion);
        assert_eq!(render.indent_width, 2);
        assert_eq!(render.auto_categories, vec!["ecf"]);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let config = CliConfig {
            render_config: Some(PathBuf::from("/nonexistent/render.toml")),
            ..CliConfig::default()
        };
        assert!(config.render_config().is_err());
    }

    #[test]
    fn boolean_settings_accept_common_spellings() {
        for value in ["true", "TRUE", "1", "yes", "On"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["false", "False", "0", "no", "off"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }
}
