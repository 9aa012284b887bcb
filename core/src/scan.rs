//! Argument scanning.
//!
//! [`scan`] walks an argument list once, left to right, classifying each
//! token against an [`OptionTable`] and dispatching it to the matching
//! handler:
//!
//! - `--` ends option processing; everything after it is returned verbatim.
//! - `--name` / `--name=value` is a long option. A value-taking option
//!   without `=value` consumes the next argument.
//! - `-` alone is the lone-dash sentinel, if the table defines one.
//! - `-abc` is a bundle of short options. Letters are consumed while they
//!   name options; the first letter that does not starts the attached value
//!   of the bundle's value-taking option. So with `-k` taking a value,
//!   `-nk2` is `-n -k 2` but `-nk2r` gives `-k` the value `2r`.
//! - Anything else goes to the default handler.
//!
//! Optional values (an option that may or may not take one) are not
//! supported: an option either always takes a value or never does.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, trace};

use crate::descriptor::{LONE_DASH, OptionDescriptor};
use crate::handler::{HandlerError, OptionHandler, Values};
use crate::table::OptionTable;

/// Errors caused by the arguments being parsed.
///
/// Scanning stops at the first error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The argument names no option in the table (`--bogus`, `-z`, `-`).
    #[error("unknown option \"{0}\"")]
    UnknownOption(String),
    /// `--name=value` given for an option that takes no value.
    #[error("option \"{0}\" does not take a value")]
    UnexpectedValue(String),
    /// A value-taking option is the last argument.
    #[error("missing value for option \"{0}\"")]
    MissingValue(String),
    /// Two value-taking short options in one bundle.
    #[error("options \"{first}\" and \"{second}\" compete for a value")]
    ConflictingValue { first: String, second: String },
    /// A non-repeatable option or argument occurred again.
    ///
    /// Holds a subject such as `option "-v"` or `argument "b"`.
    #[error("repeated but unrepeatable {0}")]
    RepeatedOption(String),
    /// A handler rejected a syntactically valid option or argument.
    #[error("rejected {subject}: {source}")]
    Rejected {
        /// `option "--port"` or `argument "file.txt"`.
        subject: String,
        #[source]
        source: HandlerError,
    },
}

/// Parses `args` against `table`, writing handler results into `values`.
///
/// Returns the arguments following a `--` terminator, in their original
/// order; empty if there was no terminator.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered. Handlers for options
/// before the failing one have already run.
///
/// # Examples
///
/// ```
/// use optable_core::*;
///
/// let table = OptionTable::build(vec![
///     OptionDescriptor::flag(Some('n'), None).with_handler(Handler::set_flag("numeric")),
///     OptionDescriptor::flag(Some('r'), None).with_handler(Handler::set_flag("reverse")),
///     OptionDescriptor::with_value(Some('k'), Some("key")).with_handler(Handler::set_string("key")),
///     OptionDescriptor::arguments().repeatable().with_handler(Handler::append("files")),
/// ])
/// .unwrap();
///
/// let mut values = Values::default();
/// let rest = scan(&table, &["-nrk2", "a.txt", "--", "-b"], &mut values).unwrap();
///
/// assert!(values.flag("numeric"));
/// assert!(values.flag("reverse"));
/// assert_eq!(values.string("key"), Some("2"));
/// assert_eq!(values.list("files"), ["a.txt"]);
/// assert_eq!(rest, ["-b"]);
/// ```
pub fn scan<S: AsRef<str>>(
    table: &OptionTable,
    args: &[S],
    values: &mut Values,
) -> Result<Vec<String>, ParseError> {
    debug!(args = args.len(), "Scanning arguments");
    ParseState::new(table, args, values).run()
}

impl OptionTable {
    /// Parses `args` against this table; see [`scan`].
    pub fn parse<S: AsRef<str>>(
        &self,
        args: &[S],
        values: &mut Values,
    ) -> Result<Vec<String>, ParseError> {
        scan(self, args, values)
    }
}

/// State of one scan; dropped when it returns.
struct ParseState<'a, 'v, S> {
    table: &'a OptionTable,
    args: &'a [S],
    cursor: usize,
    handled: HashSet<usize>,
    values: &'v mut Values,
}

impl<'a, 'v, S: AsRef<str>> ParseState<'a, 'v, S> {
    fn new(table: &'a OptionTable, args: &'a [S], values: &'v mut Values) -> Self {
        Self {
            table,
            args,
            cursor: 0,
            handled: HashSet::new(),
            values,
        }
    }

    fn run(mut self) -> Result<Vec<String>, ParseError> {
        while let Some(token) = self.next_arg() {
            trace!(token, cursor = self.cursor, "Classifying argument");
            if token == "--" {
                let leftover: Vec<String> = self.args[self.cursor..]
                    .iter()
                    .map(|arg| arg.as_ref().to_string())
                    .collect();
                debug!(leftover = leftover.len(), "Reached terminator");
                return Ok(leftover);
            }

            if let Some(body) = token.strip_prefix("--") {
                self.long_option(body)?;
            } else if token == "-" {
                self.lone_dash()?;
            } else if let Some(bundle) = token.strip_prefix('-') {
                self.short_bundle(bundle)?;
            } else {
                self.dispatch(self.table.default_id(), token)?;
            }
        }
        Ok(Vec::new())
    }

    fn next_arg(&mut self) -> Option<&'a str> {
        let args: &'a [S] = self.args;
        let arg = args.get(self.cursor)?;
        self.cursor += 1;
        Some(arg.as_ref())
    }

    fn long_option(&mut self, body: &'a str) -> Result<(), ParseError> {
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        if name.is_empty() {
            return Err(ParseError::UnknownOption(format!("--{body}")));
        }
        let id = self
            .table
            .long_id(name)
            .ok_or_else(|| ParseError::UnknownOption(format!("--{name}")))?;
        let option = self.table.option(id);

        let value = match (option.takes_value, attached) {
            (false, Some(_)) => {
                return Err(ParseError::UnexpectedValue(option.display_name()));
            }
            (false, None) => "",
            (true, Some(value)) => value,
            (true, None) => self
                .next_arg()
                .ok_or_else(|| ParseError::MissingValue(option.display_name()))?,
        };
        self.dispatch(id, value)
    }

    fn lone_dash(&mut self) -> Result<(), ParseError> {
        match self.table.short_id(LONE_DASH) {
            Some(id) => self.dispatch(id, ""),
            None => Err(ParseError::UnknownOption(LONE_DASH.to_string())),
        }
    }

    fn short_bundle(&mut self, bundle: &'a str) -> Result<(), ParseError> {
        let mut pending: Option<usize> = None;
        // First letter that is not an option, and the text from it onward.
        let mut attached: Option<(char, &'a str)> = None;

        for (offset, letter) in bundle.char_indices() {
            // `-` only names the lone dash when it stands alone.
            let id = match self.table.short_id(letter) {
                Some(id) if letter != LONE_DASH => id,
                _ if offset == 0 => {
                    return Err(ParseError::UnknownOption(format!("-{letter}")));
                }
                _ => {
                    attached = Some((letter, &bundle[offset..]));
                    break;
                }
            };

            let option = self.table.option(id);
            if option.takes_value {
                if let Some(first) = pending {
                    if first == id && !option.repeatable {
                        return Err(ParseError::RepeatedOption(subject(option, "")));
                    }
                    return Err(ParseError::ConflictingValue {
                        first: self.table.option(first).display_name(),
                        second: option.display_name(),
                    });
                }
                pending = Some(id);
            } else {
                self.dispatch(id, "")?;
            }
        }

        match (pending, attached) {
            (Some(id), Some((_, value))) => self.dispatch(id, value),
            (Some(id), None) => {
                let value = self.next_arg().ok_or_else(|| {
                    ParseError::MissingValue(self.table.option(id).display_name())
                })?;
                self.dispatch(id, value)
            }
            // Trailing text with no option to take it as a value.
            (None, Some((letter, _))) => Err(ParseError::UnknownOption(format!("-{letter}"))),
            (None, None) => Ok(()),
        }
    }

    fn dispatch(&mut self, id: usize, value: &str) -> Result<(), ParseError> {
        let option = self.table.option(id);
        if !self.handled.insert(id) && !option.repeatable {
            return Err(ParseError::RepeatedOption(subject(option, value)));
        }

        debug!(option = %option.display_name(), value, "Dispatching");
        self.table
            .handler(id)
            .handle(self.values, value)
            .map_err(|source| ParseError::Rejected {
                subject: subject(option, value),
                source,
            })
    }
}

fn subject(option: &OptionDescriptor, value: &str) -> String {
    if option.is_default() {
        format!("argument \"{value}\"")
    } else {
        format!("option \"{}\"", option.display_name())
    }
}
