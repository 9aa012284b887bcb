//! Table-driven, GNU/POSIX-style command-line option parsing.
//!
//! A program describes its options as a list of [`OptionDescriptor`]s, each
//! carrying a [`Handler`]. [`OptionTable::build`] validates the list once;
//! [`scan`] then walks the arguments and dispatches every option and every
//! non-option argument to its handler:
//!
//! - [`OptionDescriptor`] — one option: short and/or long name, whether it
//!   takes a value, whether it may repeat, help text and handler.
//! - [`Handler`] / [`OptionHandler`] — what happens when an option is seen;
//!   built-in handlers write into a [`Values`] store.
//! - [`OptionTable`] — the validated, indexed table. Invalid tables are
//!   reported as [`ConfigError`].
//! - [`scan`] — the argument scanner. Bad arguments are reported as
//!   [`ParseError`].
//! - [`format_usage`] — help text for a table.
//! - [`TableFile`] — tables stored as YAML or JSON.
//!
//! Supported syntax: `-v`, bundles like `-nvr`, `-k2` and `-k 2`,
//! `--verbose`, `--key=2` and `--key 2`, a lone `-`, and `--` to end option
//! processing. Abbreviated long names and optional values are not
//! supported.
//!
//! # Example
//!
//! ```
//! use optable_core::*;
//!
//! let table = OptionTable::build(vec![
//!     OptionDescriptor::flag(Some('h'), Some("help"))
//!         .with_help("Print help")
//!         .with_handler(Handler::set_flag("help")),
//!     OptionDescriptor::with_value(Some('o'), None)
//!         .with_help("Write output to `FILE`")
//!         .with_handler(Handler::set_string("output")),
//!     OptionDescriptor::lone_dash().with_handler(Handler::set_flag("stdin")),
//!     OptionDescriptor::arguments()
//!         .repeatable()
//!         .with_handler(Handler::append("inputs")),
//! ])
//! .unwrap();
//!
//! let mut values = Values::default();
//! let rest = table
//!     .parse(&["-ofoo.txt", "a.c", "-", "b.c", "--", "-c"], &mut values)
//!     .unwrap();
//!
//! assert_eq!(values.string("output"), Some("foo.txt"));
//! assert!(values.flag("stdin"));
//! assert_eq!(values.list("inputs"), ["a.c", "b.c"]);
//! assert_eq!(rest, ["-c"]);
//!
//! let err = table.parse(&["--bogus"], &mut Values::default()).unwrap_err();
//! assert!(matches!(err, ParseError::UnknownOption(_)));
//! assert!(table.usage().contains("  -o file\n"));
//! ```

mod descriptor;
mod error;
mod file;
mod handler;
mod scan;
mod table;
mod usage;

pub use descriptor::{ARGUMENT_NAME, LONE_DASH, OptionDescriptor};
pub use error::LoadError;
pub use file::{TABLE_FILE_VERSION, TableFile};
pub use handler::{CustomHandler, Handler, HandlerError, OptionHandler, Rejection, Values};
pub use scan::{ParseError, scan};
pub use table::{ConfigError, NO_ARGUMENTS_MESSAGE, OptionTable};
pub use usage::{DEFAULT_VALUE_LABEL, format_usage, value_label, write_usage};
