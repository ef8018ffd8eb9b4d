//! Playground configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file is
//! a valid configuration.
//!
//! ```toml
//! [editor]
//! indent_unit = 2
//! separator = " "
//!
//! [engine]
//! command = ["subml", "--worker"]
//! library_dir = "lib"
//! tutorial = "tutorial.typ"
//!
//! [[abbreviation]]
//! token = "top"
//! replacement = "⊤"
//! ```

use std::path::{Path, PathBuf};

use rhizome_glyph_abbrev::{AbbreviationRule, SEPARATOR, SymbolTable, SymbolTableError};
use rhizome_glyph_editor::Keymap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const MAX_INDENT_UNIT: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid abbreviation: {0}")]
    Symbols(#[from] SymbolTableError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of one indent, in separators.
    pub indent_unit: usize,
    /// Key that inserts whitespace and triggers expansion.
    pub separator: char,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_unit: 2,
            separator: SEPARATOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interpreter command line. Empty selects the built-in echo engine.
    pub command: Vec<String>,
    /// Directory example files are loaded from.
    pub library_dir: PathBuf,
    /// File loaded into the editor at start, relative to `library_dir`.
    pub tutorial: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            library_dir: PathBuf::from("lib"),
            tutorial: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub editor: EditorConfig,
    pub engine: EngineConfig,
    /// Extra or overriding abbreviation rules.
    #[serde(rename = "abbreviation")]
    pub abbreviations: Vec<AbbreviationRule>,
}

impl PlaygroundConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;

        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let indent = self.editor.indent_unit;
        if !(1..=MAX_INDENT_UNIT).contains(&indent) {
            return Err(ConfigError::Invalid(format!(
                "indent_unit must be between 1 and {MAX_INDENT_UNIT}, got {indent}"
            )));
        }

        let separator = self.editor.separator;
        if matches!(separator, rhizome_glyph_abbrev::ESCAPE | '\n' | '\t') {
            return Err(ConfigError::Invalid(format!(
                "{separator:?} cannot be used as the separator"
            )));
        }
        if let Some(rule) = self
            .abbreviations
            .iter()
            .find(|rule| rule.token.contains(separator))
        {
            return Err(ConfigError::Invalid(format!(
                "abbreviation token '{}' contains the separator",
                rule.token
            )));
        }

        self.symbol_table()?;
        Ok(())
    }

    /// Built-in symbols with this config's abbreviations layered on top.
    pub fn symbol_table(&self) -> Result<SymbolTable, ConfigError> {
        Ok(SymbolTable::builtin().with_overrides(self.abbreviations.iter().cloned())?)
    }

    pub fn keymap(&self) -> Result<Keymap, ConfigError> {
        Ok(Keymap::new(self.symbol_table()?)
            .with_separator(self.editor.separator)
            .with_indent_unit(self.editor.indent_unit))
    }

    /// Resolve a file name against the library directory.
    pub fn library_path(&self, name: &str) -> PathBuf {
        self.engine.library_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlaygroundConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlaygroundConfig::default());
        assert_eq!(config.editor.indent_unit, 2);
        assert_eq!(config.editor.separator, ' ');
        assert!(config.engine.command.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = PlaygroundConfig::from_toml_str(
            r#"
[editor]
indent_unit = 4

[engine]
command = ["subml", "--worker"]
library_dir = "examples/lib"
tutorial = "tutorial.typ"

[[abbreviation]]
token = "top"
replacement = "⊤"
"#,
        )
        .unwrap();

        assert_eq!(config.editor.indent_unit, 4);
        assert_eq!(config.engine.command, vec!["subml", "--worker"]);
        assert_eq!(config.engine.tutorial.as_deref(), Some("tutorial.typ"));
        assert_eq!(
            config.library_path("nat.typ"),
            PathBuf::from("examples/lib/nat.typ")
        );

        let keymap = config.keymap().unwrap();
        assert_eq!(keymap.indent_unit(), 4);
        assert_eq!(keymap.symbols().lookup("top").unwrap().replacement, "⊤");
        assert!(keymap.symbols().lookup("forall").is_some());
    }

    #[test]
    fn test_invalid_indent_unit() {
        let err = PlaygroundConfig::from_toml_str("[editor]\nindent_unit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_invalid_separator() {
        let err = PlaygroundConfig::from_toml_str("[editor]\nseparator = '\\'").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        // Tab is the indent key.
        let err = PlaygroundConfig::from_toml_str("[editor]\nseparator = \"\\t\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_invalid_abbreviation() {
        let err = PlaygroundConfig::from_toml_str(
            "[[abbreviation]]\ntoken = \"a\\\\b\"\nreplacement = \"x\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Symbols(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = PlaygroundConfig::from_toml_str("[editor\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\nindent_unit = 8").unwrap();

        let config = PlaygroundConfig::load(file.path()).unwrap();
        assert_eq!(config.editor.indent_unit, 8);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlaygroundConfig::load(&dir.path().join("glyph.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
