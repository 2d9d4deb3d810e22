//! Render configuration loader.

use std::path::Path;

use model_core::RenderConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for render configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`RenderConfig`] from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<RenderConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RenderConfig> {
        let config: RenderConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse render config TOML: {}", e))?;
        tracing::debug!(
            "Render config: indent {}, auto companion {}",
            config.indent_width,
            config.auto_companion
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ConfigLoader::parse("auto_companion = true\nindent_width = 2\n").unwrap();
        assert!(config.auto_companion);
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.auto_categories, vec!["ecf"]);
        assert_eq!(config.line_ending, "\n");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = ConfigLoader::parse("indent_width = \"wide\"").unwrap_err();
        assert!(err.to_string().contains("render config"));
    }
}
