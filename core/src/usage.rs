//! Usage text rendering.
//!
//! Each documented option becomes two lines: its names, then its help text
//! indented below. No wrapping is done.
//!
//! ```text
//!   -o, --output file
//!       Write results to `FILE`
//! ```

use std::io;
use std::sync::LazyLock;

use regex::Regex;

use crate::descriptor::OptionDescriptor;

/// Value label used when the help text has no backtick-quoted word.
pub const DEFAULT_VALUE_LABEL: &str = "value";

static VALUE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("static regex must compile"));

/// Display name of an option's value: the first backtick-quoted part of
/// its help text, lower-cased, or [`DEFAULT_VALUE_LABEL`].
///
/// # Examples
///
/// ```
/// use optable_core::value_label;
///
/// assert_eq!(value_label("Listen on `PORT`"), "port");
/// assert_eq!(value_label("Listen port"), "value");
/// ```
pub fn value_label(help: &str) -> String {
    VALUE_LABEL_RE
        .captures(help)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| DEFAULT_VALUE_LABEL.to_string())
}

/// Renders usage text for `options`, preserving their order.
///
/// Options without help text and the default handler are skipped.
///
/// # Examples
///
/// ```
/// use optable_core::*;
///
/// let options = vec![
///     OptionDescriptor::flag(Some('v'), Some("verbose"))
///         .with_help("Enable verbose output")
///         .with_handler(Handler::set_flag("verbose")),
///     OptionDescriptor::with_value(None, Some("port"))
///         .with_help("Listen on `PORT`")
///         .with_handler(Handler::set_string("port")),
/// ];
///
/// assert_eq!(
///     format_usage(&options),
///     "  -v, --verbose\n      Enable verbose output\n  --port port\n      Listen on `PORT`\n"
/// );
/// ```
pub fn format_usage(options: &[OptionDescriptor]) -> String {
    let mut out = String::new();
    for option in options {
        if option.help.is_empty() || option.is_default() {
            continue;
        }

        let mut names = Vec::with_capacity(2);
        if let Some(short) = option.short_name() {
            names.push(if option.is_lone_dash() {
                short.to_string()
            } else {
                format!("-{short}")
            });
        }
        if let Some(long) = option.long_name() {
            names.push(format!("--{long}"));
        }

        out.push_str("  ");
        out.push_str(&names.join(", "));
        if option.takes_value {
            out.push(' ');
            out.push_str(&value_label(&option.help));
        }
        out.push('\n');
        out.push_str("      ");
        out.push_str(&option.help);
        out.push('\n');
    }
    out
}

/// Writes [`format_usage`] output to `sink`.
///
/// # Errors
///
/// Only errors from the sink itself.
pub fn write_usage<W: io::Write>(mut sink: W, options: &[OptionDescriptor]) -> io::Result<()> {
    sink.write_all(format_usage(options).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;

    #[test]
    fn test_format_usage_forms() {
        let options = vec![
            OptionDescriptor::flag(Some('n'), None)
                .with_help("Compare numerically")
                .with_handler(Handler::set_flag("numeric")),
            OptionDescriptor::with_value(Some('o'), Some("output"))
                .with_help("Write to `FILE` instead of stdout")
                .with_handler(Handler::set_string("output")),
            OptionDescriptor::with_value(Some('k'), None)
                .with_help("Sort key")
                .with_handler(Handler::set_string("key")),
            OptionDescriptor::lone_dash()
                .with_help("Read names from stdin")
                .with_handler(Handler::set_flag("stdin")),
        ];

        let expected = concat!(
            "  -n\n",
            "      Compare numerically\n",
            "  -o, --output file\n",
            "      Write to `FILE` instead of stdout\n",
            "  -k value\n",
            "      Sort key\n",
            "  -\n",
            "      Read names from stdin\n",
        );
        assert_eq!(format_usage(&options), expected);
    }

    #[test]
    fn test_format_usage_skips_undocumented_and_default() {
        let options = vec![
            OptionDescriptor::flag(Some('q'), None).with_handler(Handler::set_flag("quiet")),
            OptionDescriptor::arguments()
                .with_help("Input files")
                .with_handler(Handler::append("files")),
        ];

        assert_eq!(format_usage(&options), "");
    }

    #[test]
    fn test_value_label_uses_first_quoted_word() {
        assert_eq!(value_label("From `Src` to `DEST`"), "src");
        assert_eq!(value_label("Unclosed `quote"), DEFAULT_VALUE_LABEL);
        assert_eq!(value_label("Empty `` quote"), DEFAULT_VALUE_LABEL);
    }

    #[test]
    fn test_write_usage_writes_to_sink() {
        let options = vec![
            OptionDescriptor::flag(None, Some("all"))
                .with_help("Show all")
                .with_handler(Handler::set_flag("all")),
        ];
        let mut buf = Vec::new();
        write_usage(&mut buf, &options).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "  --all\n      Show all\n");
    }
}
