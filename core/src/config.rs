//! TOML configuration.
//!
//! ```toml
//! [layout]
//! node_width = 250
//! gutter = 50
//! level_height = 150
//!
//! [editor]
//! question_option_labels = ["Option 1", "Option 2"]
//! callout_button_label = "Go back"
//! infocard_button_label = "Continue"
//! undo_depth = 100
//! ```
//!
//! Every key is optional; missing keys take the values above.

use crate::edit::EditorConfig;
use crate::error::ConfigError;
use crate::layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CARDPATH_CONFIG";

/// File looked up in the working directory when [`CONFIG_ENV`] is unset.
pub const CONFIG_FILE: &str = "cardpath.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardpathConfig {
    pub layout: LayoutConfig,
    pub editor: EditorConfig,
}

impl CardpathConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from an explicit path. A missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// `$CARDPATH_CONFIG`, else `./cardpath.toml`, else defaults.
    ///
    /// A file that exists but cannot be read or parsed falls back to the
    /// defaults with a warning rather than failing the caller.
    pub fn discover() -> Self {
        let candidate = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(CONFIG_FILE);
                local.is_file().then_some(local)
            });

        match candidate {
            Some(path) => Self::load(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Falling back to default config");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CardpathConfig::default();
        assert_eq!(config.layout.node_width, 250.0);
        assert_eq!(config.layout.gutter, 50.0);
        assert_eq!(config.layout.level_height, 150.0);
        assert_eq!(config.editor.undo_depth, 100);
        assert_eq!(config.editor.defaults.callout_button_label, "Go back");
        assert_eq!(config.editor.defaults.infocard_button_label, "Continue");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = CardpathConfig::from_toml_str(
            r#"
            [layout]
            gutter = 10.0

            [editor]
            infocard_button_label = "Next"
            undo_depth = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.gutter, 10.0);
        assert_eq!(config.layout.node_width, 250.0);
        assert_eq!(config.editor.defaults.infocard_button_label, "Next");
        assert_eq!(config.editor.defaults.callout_button_label, "Go back");
        assert_eq!(config.editor.undo_depth, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\nquestion_option_labels = [\"Yes\", \"No\"]").unwrap();
        let config = CardpathConfig::load(file.path()).unwrap();
        assert_eq!(config.editor.defaults.option_label(0), "Yes");
        assert_eq!(config.editor.defaults.option_label(2), "Option 3");
    }

    #[test]
    fn test_load_errors() {
        let err = CardpathConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        let err = CardpathConfig::from_toml_str("[layout]\ngutter = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
