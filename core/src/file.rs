//! Option tables stored as YAML or JSON files.
//!
//! Only the built-in [`Handler`](crate::Handler) variants can be stored;
//! custom handlers exist only in code.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! program: sort
//! options:
//!   - short: n
//!     help: Compare according to numerical value
//!     handler: { action: set_flag, key: numeric }
//!   - short: k
//!     long: key
//!     takes_value: true
//!     help: Sort via a key; `KEYDEF` gives location and type
//!     handler: { action: set_string, key: key }
//!   - repeatable: true
//!     handler: { action: append, key: files }
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::OptionDescriptor;
use crate::error::{LoadError, Result};
use crate::table::OptionTable;

/// Current table file format version.
pub const TABLE_FILE_VERSION: &str = "1.0";

/// Serialized form of an option table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFile {
    /// File format version (e.g. `"1.0"`).
    #[serde(default = "default_version")]
    pub version: String,
    /// Program the table belongs to, used in messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Descriptors in table order.
    #[serde(default)]
    pub options: Vec<OptionDescriptor>,
}

fn default_version() -> String {
    TABLE_FILE_VERSION.to_string()
}

/// On-disk encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

impl TableFile {
    pub fn new(options: Vec<OptionDescriptor>) -> Self {
        Self {
            version: default_version(),
            program: None,
            options,
        }
    }

    /// Loads a table file; `.yaml`/`.yml` files are read as YAML, anything
    /// else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](LoadError::Io) if the file cannot be read, or
    /// [`Json`](LoadError::Json) / [`Yaml`](LoadError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let file: Self = match Format::for_path(path) {
            Format::Yaml => serde_yaml::from_reader(reader)?,
            Format::Json => serde_json::from_reader(reader)?,
        };
        debug!(path = %path.display(), options = file.options.len(), "Loaded table file");
        Ok(file)
    }

    /// Saves the table, choosing the format by extension as [`load`](Self::load) does.
    ///
    /// # Errors
    ///
    /// Returns [`CustomHandler`](LoadError::CustomHandler) if any option
    /// uses a custom handler, otherwise I/O or serialization errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(option) = self
            .options
            .iter()
            .find(|option| option.handler.as_ref().is_some_and(|h| !h.is_serializable()))
        {
            return Err(LoadError::CustomHandler(option.display_name()));
        }

        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match Format::for_path(path) {
            Format::Yaml => serde_yaml::to_writer(writer, self)?,
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    /// Validates and indexes the options.
    ///
    /// # Errors
    ///
    /// Returns [`Config`](LoadError::Config) if the options are not a valid table.
    pub fn build(&self) -> Result<OptionTable> {
        Ok(OptionTable::build(self.options.clone())?)
    }

    /// Name for messages: the declared program, or `"program"`.
    pub fn program_name(&self) -> &str {
        self.program.as_deref().unwrap_or("program")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Handler, HandlerError, Values};

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
program: sort
options:
  - short: n
    help: Compare numerically
    handler: { action: set_flag, key: numeric }
  - short: k
    long: key
    takes_value: true
    help: Sort via `KEYDEF`
    handler: { action: set_string, key: key }
  - repeatable: true
    handler: { action: append, key: files }
"#
    }

    #[test]
    fn test_load_yaml_and_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sort.yaml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let file = TableFile::load(&path).unwrap();
        assert_eq!(file.program_name(), "sort");
        assert_eq!(file.options.len(), 3);

        let table = file.build().unwrap();
        let mut values = Values::default();
        table.parse(&["-nk2", "a", "b"], &mut values).unwrap();
        assert!(values.flag("numeric"));
        assert_eq!(values.string("key"), Some("2"));
        assert_eq!(values.list("files"), ["a", "b"]);
    }

    #[test]
    fn test_save_and_reload_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let file: TableFile = serde_yaml::from_str(sample_yaml()).unwrap();

        file.save(&path).unwrap();
        let reloaded = TableFile::load(&path).unwrap();

        assert_eq!(reloaded.version, "1.0");
        assert_eq!(reloaded.options.len(), 3);
        assert_eq!(reloaded.options[1].long_name(), Some("key"));
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let file: TableFile = serde_json::from_str("{}").unwrap();

        assert_eq!(file.version, TABLE_FILE_VERSION);
        assert_eq!(file.program_name(), "program");
        assert!(file.build().unwrap().rejects_arguments());
    }

    #[test]
    fn test_build_reports_config_error() {
        let file = TableFile::new(vec![OptionDescriptor::flag(Some('v'), None)]);
        assert!(matches!(file.build(), Err(LoadError::Config(_))));
    }

    #[test]
    fn test_save_refuses_custom_handler() {
        let dir = tempfile::tempdir().unwrap();
        let file = TableFile::new(vec![
            OptionDescriptor::flag(Some('x'), None).with_handler(Handler::custom(
                |_: &mut Values, _: &str| -> std::result::Result<(), HandlerError> { Ok(()) },
            )),
        ]);

        let err = file.save(dir.path().join("table.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::CustomHandler(ref name) if name == "-x"));
    }
}
