//! Option descriptors: the rows of an option table.
//!
//! A descriptor names an option by an optional short letter (`-v`) and/or an
//! optional long name (`--verbose`), says whether it consumes a value and
//! whether it may be repeated, and carries the handler invoked for each
//! occurrence. Descriptors are plain data and serialize with [`serde`], so
//! whole tables can live in YAML or JSON files.

use serde::{Deserialize, Serialize};

use crate::handler::Handler;

/// Short name of the lone-dash sentinel option (the bare `-` argument).
pub const LONE_DASH: char = '-';

/// Name used for the default handler in messages and usage text.
pub const ARGUMENT_NAME: &str = "ARG";

/// One row of an option table.
///
/// A descriptor with neither a short nor a long name is the *default
/// handler*: it receives every non-option argument. A descriptor whose short
/// name is [`LONE_DASH`] receives the bare `-` argument.
///
/// # Examples
///
/// ```
/// use optable_core::{Handler, OptionDescriptor};
///
/// let verbose = OptionDescriptor::flag(Some('v'), Some("verbose"))
///     .with_help("Enable verbose output")
///     .with_handler(Handler::set_flag("verbose"));
/// assert_eq!(verbose.display_name(), "--verbose");
/// assert!(!verbose.takes_value);
///
/// let key = OptionDescriptor::with_value(Some('k'), None)
///     .with_handler(Handler::set_string("key"));
/// assert_eq!(key.display_name(), "-k");
/// assert!(key.takes_value);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Short form without the dash (e.g. `'v'`). `'\0'` counts as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Long form without the dashes (e.g. `"verbose"`). Empty counts as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Whether the option consumes an attached or following value.
    #[serde(default)]
    pub takes_value: bool,
    /// Whether the option may occur more than once.
    #[serde(default)]
    pub repeatable: bool,
    /// Help text for usage output. A backtick-quoted word names the value.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    /// Invoked once per occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<Handler>,
}

impl OptionDescriptor {
    /// Creates an option that takes no value.
    pub fn flag(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            short,
            long: long.map(String::from),
            ..Default::default()
        }
    }

    /// Creates an option that takes a value.
    pub fn with_value(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            short,
            long: long.map(String::from),
            takes_value: true,
            ..Default::default()
        }
    }

    /// Creates the default handler for non-option arguments.
    ///
    /// Like every other option it is not repeatable unless
    /// [`repeatable`](Self::repeatable) is called.
    pub fn arguments() -> Self {
        Self::default()
    }

    /// Creates the lone-dash sentinel.
    pub fn lone_dash() -> Self {
        Self::flag(Some(LONE_DASH), None)
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Marks as allowing multiple occurrences.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Short name, treating `'\0'` as absent.
    pub fn short_name(&self) -> Option<char> {
        self.short.filter(|c| *c != '\0')
    }

    /// Long name, treating the empty string as absent.
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns `true` for the default handler (no short and no long name).
    pub fn is_default(&self) -> bool {
        self.short_name().is_none() && self.long_name().is_none()
    }

    pub fn is_lone_dash(&self) -> bool {
        self.short_name() == Some(LONE_DASH)
    }

    /// Name as typed on a command line, long form preferred.
    ///
    /// # Examples
    ///
    /// ```
    /// use optable_core::OptionDescriptor;
    ///
    /// assert_eq!(OptionDescriptor::flag(Some('n'), Some("numeric")).display_name(), "--numeric");
    /// assert_eq!(OptionDescriptor::flag(Some('n'), None).display_name(), "-n");
    /// assert_eq!(OptionDescriptor::lone_dash().display_name(), "-");
    /// assert_eq!(OptionDescriptor::arguments().display_name(), "ARG");
    /// ```
    pub fn display_name(&self) -> String {
        if let Some(long) = self.long_name() {
            format!("--{long}")
        } else if self.is_lone_dash() {
            LONE_DASH.to_string()
        } else if let Some(short) = self.short_name() {
            format!("-{short}")
        } else {
            ARGUMENT_NAME.to_string()
        }
    }

    /// Checks if this option is named by `s` (`-v`, `--verbose` or `-`).
    pub fn matches(&self, s: &str) -> bool {
        if let Some(long) = s.strip_prefix("--") {
            return !long.is_empty() && self.long_name() == Some(long);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('-'), None, None) => self.is_lone_dash(),
            (Some('-'), Some(c), None) => c != LONE_DASH && self.short_name() == Some(c),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_names_are_normalized() {
        let option = OptionDescriptor {
            short: Some('\0'),
            long: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(option.short_name(), None);
        assert_eq!(option.long_name(), None);
        assert!(option.is_default());
    }

    #[test]
    fn test_option_matches() {
        let option = OptionDescriptor::flag(Some('v'), Some("verbose"));

        assert!(option.matches("-v"));
        assert!(option.matches("--verbose"));
        assert!(!option.matches("-x"));
        assert!(!option.matches("--"));
        assert!(!option.matches("-vv"));

        assert!(OptionDescriptor::lone_dash().matches("-"));
        assert!(!option.matches("-"));
    }

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let yaml = r#"
short: o
long: output
takes_value: true
help: "Write to `FILE`"
handler: { action: set_string, key: output }
"#;
        let option: OptionDescriptor = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(option.short_name(), Some('o'));
        assert_eq!(option.long_name(), Some("output"));
        assert!(option.takes_value);
        assert!(!option.repeatable);
        assert!(matches!(option.handler, Some(Handler::SetString { .. })));
    }
}
