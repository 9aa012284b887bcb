//! Option table validation and indexing.
//!
//! [`OptionTable::build`] checks the structural invariants of a descriptor
//! list once, before any argument is looked at, and builds the short and
//! long indexes the scanner works from. A table that fails validation is a
//! programming error in the host program; it is reported as a
//! [`ConfigError`], distinct from the [`ParseError`](crate::ParseError)s
//! caused by user input.
//!
//! # Examples
//!
//! ```
//! use optable_core::*;
//!
//! let table = OptionTable::build(vec![
//!     OptionDescriptor::flag(Some('v'), Some("verbose"))
//!         .with_handler(Handler::set_flag("verbose")),
//! ])
//! .unwrap();
//! assert!(table.by_short('v').is_some());
//! assert!(table.by_long("verbose").is_some());
//!
//! // Invalid: two options share `-v`
//! let err = OptionTable::build(vec![
//!     OptionDescriptor::flag(Some('v'), None).with_handler(Handler::set_flag("a")),
//!     OptionDescriptor::flag(Some('v'), None).with_handler(Handler::set_flag("b")),
//! ])
//! .unwrap_err();
//! assert_eq!(err, ConfigError::DuplicateShort('v'));
//! ```

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::descriptor::{LONE_DASH, OptionDescriptor};
use crate::handler::Handler;

/// Message of the synthesized default handler.
pub const NO_ARGUMENTS_MESSAGE: &str = "additional arguments not allowed";

/// Option table validation errors.
///
/// Each variant describes a mistake in the table itself, never in the
/// arguments being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A descriptor has no handler.
    #[error("option without handler at index {index}: {name}")]
    MissingHandler { index: usize, name: String },
    /// More than one descriptor has neither short nor long name.
    #[error("multiple default handlers (at index {first} and {second})")]
    MultipleDefaults { first: usize, second: usize },
    /// Two descriptors share a short name.
    #[error("multiple definitions for short option '{0}'")]
    DuplicateShort(char),
    /// Two descriptors share a long name.
    #[error("multiple definitions for long option \"{0}\"")]
    DuplicateLong(String),
    /// The lone-dash descriptor also has a long name.
    #[error("long name \"{0}\" defined for lone dash")]
    LoneDashWithLongName(String),
    /// The lone-dash descriptor takes a value.
    #[error("lone dash cannot take a value")]
    LoneDashTakesValue,
    /// Short name is not a printable ASCII character.
    #[error("invalid short option name {0:?}")]
    InvalidShortName(char),
    /// Long name contains `=` or starts with `-`, so it could never match.
    #[error("invalid long option name \"{0}\"")]
    InvalidLongName(String),
}

/// A validated, indexed option table.
///
/// Immutable once built; it can be shared freely between threads and
/// reused for any number of parses.
#[derive(Debug, Clone)]
pub struct OptionTable {
    /// Supplied options, followed by the synthesized default handler when
    /// the table has none.
    options: Vec<OptionDescriptor>,
    /// One handler per entry of `options`.
    handlers: Vec<Handler>,
    /// Number of options supplied by the caller.
    supplied: usize,
    short: HashMap<char, usize>,
    long: HashMap<String, usize>,
    default: usize,
}

impl OptionTable {
    /// Validates and indexes `options`.
    ///
    /// Validation stops at the first violated invariant. When no default
    /// handler is present one is synthesized that rejects every non-option
    /// argument with [`NO_ARGUMENTS_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first problem found.
    pub fn build(mut options: Vec<OptionDescriptor>) -> Result<Self, ConfigError> {
        let mut handlers = Vec::with_capacity(options.len() + 1);
        let mut short = HashMap::new();
        let mut long = HashMap::new();
        let mut default = None;

        for (index, option) in options.iter().enumerate() {
            let Some(handler) = &option.handler else {
                return Err(ConfigError::MissingHandler {
                    index,
                    name: option.display_name(),
                });
            };
            handlers.push(handler.clone());

            if option.is_default() {
                if let Some(first) = default {
                    return Err(ConfigError::MultipleDefaults {
                        first,
                        second: index,
                    });
                }
                default = Some(index);
            }

            if let Some(c) = option.short_name() {
                if !c.is_ascii_graphic() {
                    return Err(ConfigError::InvalidShortName(c));
                }
                if c == LONE_DASH {
                    if let Some(name) = option.long_name() {
                        return Err(ConfigError::LoneDashWithLongName(name.to_string()));
                    }
                    if option.takes_value {
                        return Err(ConfigError::LoneDashTakesValue);
                    }
                }
                if short.insert(c, index).is_some() {
                    return Err(ConfigError::DuplicateShort(c));
                }
            }

            if let Some(name) = option.long_name() {
                if name.contains('=') || name.starts_with('-') {
                    return Err(ConfigError::InvalidLongName(name.to_string()));
                }
                if long.insert(name.to_string(), index).is_some() {
                    return Err(ConfigError::DuplicateLong(name.to_string()));
                }
            }
        }

        let supplied = options.len();
        let default = match default {
            Some(index) => index,
            None => {
                let rejecting = Handler::reject(NO_ARGUMENTS_MESSAGE);
                handlers.push(rejecting.clone());
                options.push(
                    OptionDescriptor::arguments()
                        .repeatable()
                        .with_handler(rejecting),
                );
                supplied
            }
        };

        debug!(
            options = supplied,
            short = short.len(),
            long = long.len(),
            synthesized_default = default == supplied,
            "Built option table"
        );

        Ok(Self {
            options,
            handlers,
            supplied,
            short,
            long,
            default,
        })
    }

    /// Like [`build`](Self::build), for programs that treat an invalid
    /// table as a bug.
    ///
    /// # Panics
    ///
    /// Panics with the [`ConfigError`] message if validation fails.
    #[track_caller]
    pub fn new(options: Vec<OptionDescriptor>) -> Self {
        match Self::build(options) {
            Ok(table) => table,
            Err(err) => panic!("invalid option table: {err}"),
        }
    }

    /// The descriptors as supplied, in order.
    pub fn descriptors(&self) -> &[OptionDescriptor] {
        &self.options[..self.supplied]
    }

    pub fn by_short(&self, c: char) -> Option<&OptionDescriptor> {
        self.short_id(c).map(|id| self.option(id))
    }

    pub fn by_long(&self, name: &str) -> Option<&OptionDescriptor> {
        self.long_id(name).map(|id| self.option(id))
    }

    /// The descriptor receiving non-option arguments, synthesized if the
    /// table has none.
    pub fn default_option(&self) -> &OptionDescriptor {
        self.option(self.default)
    }

    /// Returns `true` if the default handler was synthesized.
    pub fn rejects_arguments(&self) -> bool {
        self.default == self.supplied
    }

    /// Renders usage text for this table; see [`format_usage`](crate::format_usage).
    pub fn usage(&self) -> String {
        crate::usage::format_usage(self.descriptors())
    }

    pub(crate) fn short_id(&self, c: char) -> Option<usize> {
        self.short.get(&c).copied()
    }

    pub(crate) fn long_id(&self, name: &str) -> Option<usize> {
        self.long.get(name).copied()
    }

    pub(crate) fn default_id(&self) -> usize {
        self.default
    }

    pub(crate) fn option(&self, id: usize) -> &OptionDescriptor {
        &self.options[id]
    }

    pub(crate) fn handler(&self, id: usize) -> &Handler {
        &self.handlers[id]
    }
}
