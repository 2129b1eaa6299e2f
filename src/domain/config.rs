use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for conversions.
///
/// Controls the attributes written to new XML documents and the layout of
/// generated outlines and XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Schema location written to the `xsi:noNamespaceSchemaLocation`
    /// attribute of new documents.
    pub schema_location: String,

    /// Width of the field that a case name or step text is padded to before
    /// its trailing tag block.
    ///
    /// For example, with a width of 10 an automated case is written as
    /// `*** Login      :AUTO:`.
    tag_column: usize,

    /// Number of spaces per nesting level in generated XML.
    indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_location: default_schema_location(),
            tag_column: default_tag_column(),
            indent: default_indent(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the padding width for names followed by a tag block.
    #[must_use]
    pub const fn tag_column(&self) -> usize {
        self.tag_column
    }

    /// Sets the padding width for names followed by a tag block.
    pub const fn set_tag_column(&mut self, width: usize) {
        self.tag_column = width;
    }

    /// Returns the number of spaces per XML nesting level.
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }
}

/// Errors that can occur when loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this configuration.
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },
    /// The configuration could not be serialized.
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    /// The configuration file could not be written.
    #[error("failed to write config file {}", .path.display())]
    Write {
        /// The file that was written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn default_schema_location() -> String {
    "/srv/mer/sdks/sdk/usr/share/test-definition/testdefinition-tm_terms.xsd".to_string()
}

const fn default_tag_column() -> usize {
    50
}

const fn default_indent() -> usize {
    2
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_schema_location")]
        schema_location: String,

        /// Padding width before a trailing tag block.
        #[serde(default = "default_tag_column")]
        tag_column: usize,

        #[serde(default = "default_indent")]
        indent: usize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                schema_location,
                tag_column,
                indent,
            } => Self {
                schema_location,
                tag_column,
                indent,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            schema_location: config.schema_location,
            tag_column: config.tag_column,
            indent: config.indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nschema_location = \"/tmp/schema.xsd\"\ntag_column = 40\nindent = 4\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.schema_location, "/tmp/schema.xsd");
        assert_eq!(config.tag_column(), 40);
        assert_eq!(config.indent(), 4);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().starts_with("failed to read config file"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ntag_column = \"wide\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("testdef.toml");

        let mut config = Config::default();
        config.set_tag_column(60);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
