//! A single YAML configuration layer
//!
//! The document represents one parsed configuration file. Several documents
//! (the files given on the command line and everything they include) are
//! merged by the [`ConfigComposer`](super::ConfigComposer) into one
//! [`EffectiveConfig`](super::EffectiveConfig).

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::{Error, Result};

/// One configuration file, as written.
///
/// Path-valued lists are kept as raw strings here; they are resolved against
/// the directory of the file declaring them when layers are merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    /// Fully qualified board name
    #[serde(default)]
    pub fqbn: Option<String>,

    /// Extra compiler flags, appended across layers
    #[serde(default)]
    pub cflags: Vec<String>,

    /// Command run by the `debug` rule
    #[serde(default)]
    pub debug_command: Option<String>,

    /// Serial monitor speed; YAML integers are accepted as well as strings
    #[serde(default, deserialize_with = "scalar_text")]
    pub baudrate: Option<String>,

    /// Library directories passed to the compiler
    #[serde(default)]
    pub libs: Vec<String>,

    /// Extra directories scanned for the qmake project
    #[serde(default)]
    pub qmake_dirs: Vec<String>,

    /// Directories excluded from the qmake scan
    #[serde(default)]
    pub qmake_exclude_dirs: Vec<String>,

    /// Further configuration files to merge
    #[serde(default)]
    pub configs: Vec<String>,

    /// Anything else; reported as a warning and otherwise ignored
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl ConfigDocument {
    /// Parse a document from YAML content.
    ///
    /// An empty document is an empty layer. `path` is only used for error
    /// reporting.
    ///
    /// # Example
    ///
    /// ```
    /// use genmake_core::config::ConfigDocument;
    /// use std::path::Path;
    ///
    /// let document = ConfigDocument::parse(
    ///     "fqbn: arduino:avr:uno\nbaudrate: 9600\n",
    ///     Path::new("board.yaml"),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(document.fqbn.as_deref(), Some("arduino:avr:uno"));
    /// assert_eq!(document.baudrate.as_deref(), Some("9600"));
    /// ```
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let document: Option<Self> =
            serde_yaml::from_str(content).map_err(|e| Error::config_parse(path, e.to_string()))?;
        Ok(document.unwrap_or_default())
    }

    /// Read and parse the document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::config_io(path, e))?;
        Self::parse(&content, path)
    }
}

fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar, found {other:?}"
        ))),
    }
}
