//! Configuration file schema for symscan.
//!
//! A config file narrows what gets scanned and how results are shown:
//!
//! ```yaml
//! version: "1"
//! excluded_paths: ["**/node_modules/**"]
//! extensions:
//!   ".h": c
//! kinds: [function, class]
//! format: json
//! ```

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::language::Language;
use crate::report::OutputFormat;
use crate::symbol::SymbolKind;

/// Config file names looked for, in order, when none is given.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["symscan.yaml", ".symscan.yaml"];

/// Errors loading or validating a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Top-level config definition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// Glob patterns for paths to skip (e.g., "**/vendor/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Extension to language overrides, with or without the leading dot
    #[serde(default)]
    pub extensions: BTreeMap<String, Language>,
    /// Kinds to report; empty means all
    #[serde(default)]
    pub kinds: Vec<SymbolKind>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the config at `explicit`, or the one discovered in `dir`, or
    /// the defaults when there is none.
    pub fn load(
        explicit: Option<&Path>,
        dir: &Path,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(dir),
        };
        match path {
            Some(path) => {
                let config = Self::parse_file(&path)?;
                tracing::info!(path = %path.display(), "loaded config");
                Ok((config, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Check that every exclusion pattern compiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exclusions().map(|_| ())
    }

    /// Compile `excluded_paths` into one matcher.
    pub fn exclusions(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Glob {
            pattern: self.excluded_paths.join(", "),
            source,
        })
    }

    /// Language for a file, honouring extension overrides first.
    pub fn language_for(&self, path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        let configured = self
            .extensions
            .iter()
            .find(|(key, _)| key.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            .map(|(_, lang)| *lang);
        configured.or_else(|| Language::from_extension(&ext).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1"
excluded_paths:
  - "**/node_modules/**"
extensions:
  ".h": c
  inc: cpp
kinds: [function, class]
format: json
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "1");
        assert_eq!(config.excluded_paths.len(), 1);
        assert_eq!(config.extensions.get(".h"), Some(&Language::C));
        assert_eq!(config.kinds, vec![SymbolKind::Function, SymbolKind::Class]);
        assert_eq!(config.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.excluded_paths.is_empty());
        assert!(config.kinds.is_empty());
        assert!(config.format.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_language_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("extensions:\n  \".x\": cobol\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_language_for() {
        let config = Config {
            extensions: BTreeMap::from([(".h".to_string(), Language::C)]),
            ..Config::default()
        };
        assert_eq!(config.language_for(Path::new("src/lib.h")), Some(Language::C));
        assert_eq!(config.language_for(Path::new("src/LIB.H")), Some(Language::C));
        assert_eq!(config.language_for(Path::new("main.go")), Some(Language::Go));
        assert_eq!(config.language_for(Path::new("README.md")), None);
        assert_eq!(config.language_for(Path::new("Makefile")), None);

        assert_eq!(
            Config::default().language_for(Path::new("lib.h")),
            Some(Language::Cpp)
        );
    }

    #[test]
    fn test_exclusions() {
        let config = Config {
            excluded_paths: vec!["**/node_modules/**".to_string(), "**/*.min.js".to_string()],
            ..Config::default()
        };
        let set = config.exclusions().unwrap();
        assert!(set.is_match("web/node_modules/react/index.js"));
        assert!(set.is_match("dist/app.min.js"));
        assert!(!set.is_match("src/app.js"));
    }

    #[test]
    fn test_invalid_glob() {
        let config = Config {
            excluded_paths: vec!["src/[".to_string()],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Glob { .. }));
        assert!(err.to_string().contains("src/["));
    }

    #[test]
    fn test_discover_and_load() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::discover(dir.path()).is_none());

        let (config, path) = Config::load(None, dir.path()).unwrap();
        assert!(path.is_none());
        assert!(config.kinds.is_empty());

        let file = dir.path().join(".symscan.yaml");
        fs::write(&file, "kinds: [import]\n").unwrap();
        assert_eq!(Config::discover(dir.path()), Some(file.clone()));

        let (config, path) = Config::load(None, dir.path()).unwrap();
        assert_eq!(path, Some(file));
        assert_eq!(config.kinds, vec![SymbolKind::Import]);
    }

    #[test]
    fn test_parse_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Config::parse_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, "kinds: [widget]\n").unwrap();
        let err = Config::parse_file(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }
}
