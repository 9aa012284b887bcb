//! Option handlers and the value store they write into.
//!
//! A handler is anything implementing [`OptionHandler`]: it receives the
//! option's value (an empty string for flags) together with the [`Values`]
//! store of the current parse, and either accepts or rejects it.
//!
//! Most tables only need the built-in [`Handler`] variants, which are plain
//! data and can be serialized into table files. Arbitrary logic (closures
//! included) is wrapped with [`Handler::custom`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by a handler that rejects its value.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Capability interface for option handlers.
///
/// Implemented by [`Handler`] and by any
/// `Fn(&mut Values, &str) -> Result<(), HandlerError>` closure that is
/// `Send + Sync`.
pub trait OptionHandler: Send + Sync {
    /// Handles one occurrence of an option with the given value.
    fn handle(&self, values: &mut Values, value: &str) -> Result<(), HandlerError>;
}

impl<F> OptionHandler for F
where
    F: Fn(&mut Values, &str) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, values: &mut Values, value: &str) -> Result<(), HandlerError> {
        self(values, value)
    }
}

/// Error produced by [`Handler::Reject`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Rejection(pub String);

/// Shared wrapper around a user-supplied [`OptionHandler`].
#[derive(Clone)]
pub struct CustomHandler(Arc<dyn OptionHandler>);

impl CustomHandler {
    pub fn new(handler: impl OptionHandler + 'static) -> Self {
        Self(Arc::new(handler))
    }
}

impl fmt::Debug for CustomHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomHandler(..)")
    }
}

/// Built-in handler variants.
///
/// Every variant except [`Custom`](Handler::Custom) is data and
/// round-trips through JSON and YAML table files, tagged by `action`:
///
/// ```yaml
/// handler: { action: set_string, key: output }
/// ```
///
/// # Examples
///
/// ```
/// use optable_core::{Handler, OptionHandler, Values};
///
/// let mut values = Values::default();
/// Handler::set_flag("verbose").handle(&mut values, "").unwrap();
/// Handler::set_string("output").handle(&mut values, "out.txt").unwrap();
///
/// assert!(values.flag("verbose"));
/// assert_eq!(values.string("output"), Some("out.txt"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Handler {
    /// Sets boolean `key` to true. Always succeeds.
    SetFlag { key: String },
    /// Stores the value under `key`, replacing any earlier value. Always succeeds.
    SetString { key: String },
    /// Appends the value to list `key`.
    Append { key: String },
    /// Increments counter `key`.
    Count { key: String },
    /// Always fails with `message`.
    Reject { message: String },
    /// User-supplied logic; not serializable.
    #[serde(skip)]
    Custom(CustomHandler),
}

impl Handler {
    pub fn set_flag(key: impl Into<String>) -> Self {
        Self::SetFlag { key: key.into() }
    }

    pub fn set_string(key: impl Into<String>) -> Self {
        Self::SetString { key: key.into() }
    }

    pub fn append(key: impl Into<String>) -> Self {
        Self::Append { key: key.into() }
    }

    pub fn count(key: impl Into<String>) -> Self {
        Self::Count { key: key.into() }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self::Reject {
            message: message.into(),
        }
    }

    /// Wraps a closure or other [`OptionHandler`].
    ///
    /// # Examples
    ///
    /// ```
    /// use optable_core::{Handler, HandlerError, OptionHandler, Values};
    ///
    /// let port = Handler::custom(|values: &mut Values, value: &str| -> Result<(), HandlerError> {
    ///     let port: u16 = value.parse()?;
    ///     values.set_string("port", port.to_string());
    ///     Ok(())
    /// });
    ///
    /// let mut values = Values::default();
    /// assert!(port.handle(&mut values, "8080").is_ok());
    /// assert!(port.handle(&mut values, "http").is_err());
    /// assert_eq!(values.string("port"), Some("8080"));
    /// ```
    pub fn custom(handler: impl OptionHandler + 'static) -> Self {
        Self::Custom(CustomHandler::new(handler))
    }

    /// Returns `true` for variants that can be written to a table file.
    pub fn is_serializable(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl OptionHandler for Handler {
    fn handle(&self, values: &mut Values, value: &str) -> Result<(), HandlerError> {
        match self {
            Self::SetFlag { key } => values.set_flag(key),
            Self::SetString { key } => values.set_string(key, value),
            Self::Append { key } => values.append(key, value),
            Self::Count { key } => values.increment(key),
            Self::Reject { message } => return Err(Rejection(message.clone()).into()),
            Self::Custom(custom) => return custom.0.handle(values, value),
        }
        Ok(())
    }
}

/// Values collected by handlers during a parse.
///
/// Replaces the per-program globals a handler would otherwise write to;
/// each parse gets its own store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Values {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub strings: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lists: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counts: BTreeMap<String, usize>,
}

impl Values {
    /// Returns `true` if flag `key` has been set.
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Returns list `key`, empty if nothing was appended.
    pub fn list(&self, key: &str) -> &[String] {
        self.lists.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn set_flag(&mut self, key: &str) {
        self.flags.insert(key.to_string(), true);
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.strings.insert(key.to_string(), value.into());
    }

    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.lists
            .entry(key.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn increment(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_default() += 1;
    }

    /// Returns `true` if no handler has written anything.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
            && self.strings.is_empty()
            && self.lists.is_empty()
            && self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_handlers_write_values() {
        let mut values = Values::default();

        Handler::set_flag("verbose").handle(&mut values, "").unwrap();
        Handler::set_string("output").handle(&mut values, "a.txt").unwrap();
        Handler::set_string("output").handle(&mut values, "b.txt").unwrap();
        Handler::append("input").handle(&mut values, "x").unwrap();
        Handler::append("input").handle(&mut values, "y").unwrap();
        Handler::count("debug").handle(&mut values, "").unwrap();
        Handler::count("debug").handle(&mut values, "").unwrap();

        assert!(values.flag("verbose"));
        assert!(!values.flag("quiet"));
        assert_eq!(values.string("output"), Some("b.txt"));
        assert_eq!(values.list("input"), ["x", "y"]);
        assert!(values.list("missing").is_empty());
        assert_eq!(values.count("debug"), 2);
    }

    #[test]
    fn test_reject_handler_fails_with_message() {
        let mut values = Values::default();
        let err = Handler::reject("not here")
            .handle(&mut values, "value")
            .unwrap_err();

        assert_eq!(err.to_string(), "not here");
        assert!(values.is_empty());
    }

    #[test]
    fn test_handler_serializes_with_action_tag() {
        let json = serde_json::to_value(Handler::set_string("output")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "action": "set_string", "key": "output" })
        );

        let parsed: Handler = serde_yaml::from_str("{ action: count, key: verbose }").unwrap();
        assert!(matches!(parsed, Handler::Count { ref key } if key == "verbose"));
    }

    #[test]
    fn test_custom_handler_is_not_serializable() {
        let handler = Handler::custom(|_: &mut Values, _: &str| -> Result<(), HandlerError> {
            Ok(())
        });

        assert!(!handler.is_serializable());
        assert!(serde_json::to_string(&handler).is_err());
        assert_eq!(format!("{handler:?}"), "Custom(CustomHandler(..))");
    }
}
